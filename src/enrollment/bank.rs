//! Bank Account Details
//!
//! Extra identity and bank fields a student must supply when the chosen
//! class is not a direct-admission class.

use serde::{Deserialize, Serialize};

/// Name of one bank-detail field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankField {
    BankName,
    BankBranchName,
    BankAccountNo,
    IfsCode,
    AbcId,
    AnnualIncome,
    NoOfSibling,
    SiblingWardNo,
    PanNo,
    FatherDob,
    MotherDob,
    Udise,
}

impl BankField {
    pub const ALL: [BankField; 12] = [
        BankField::BankName,
        BankField::BankBranchName,
        BankField::BankAccountNo,
        BankField::IfsCode,
        BankField::AbcId,
        BankField::AnnualIncome,
        BankField::NoOfSibling,
        BankField::SiblingWardNo,
        BankField::PanNo,
        BankField::FatherDob,
        BankField::MotherDob,
        BankField::Udise,
    ];

    /// Key used in the enrollment payload.
    pub fn wire_name(self) -> &'static str {
        match self {
            BankField::BankName => "BankName",
            BankField::BankBranchName => "BankBranchName",
            BankField::BankAccountNo => "BankAccountNo",
            BankField::IfsCode => "IFSCODE",
            BankField::AbcId => "ABCID",
            BankField::AnnualIncome => "AnnualIncome",
            BankField::NoOfSibling => "NoOfSibling",
            BankField::SiblingWardNo => "SiblingWardNo",
            BankField::PanNo => "PANNO",
            BankField::FatherDob => "FatherDoB",
            BankField::MotherDob => "MotherDoB",
            BankField::Udise => "UDISE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BankField::BankName => "Bank name",
            BankField::BankBranchName => "Branch name",
            BankField::BankAccountNo => "Account number",
            BankField::IfsCode => "IFSC code",
            BankField::AbcId => "ABC ID",
            BankField::AnnualIncome => "Annual family income",
            BankField::NoOfSibling => "Number of siblings",
            BankField::SiblingWardNo => "Sibling ward number",
            BankField::PanNo => "PAN number",
            BankField::FatherDob => "Father's date of birth",
            BankField::MotherDob => "Mother's date of birth",
            BankField::Udise => "UDISE number",
        }
    }
}

impl std::fmt::Display for BankField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// All-empty at mount, edited one field at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BankAccountDetails {
    pub bank_name: String,
    pub bank_branch_name: String,
    pub bank_account_no: String,
    #[serde(rename = "IFSCODE")]
    pub ifs_code: String,
    #[serde(rename = "ABCID")]
    pub abc_id: String,
    pub annual_income: String,
    pub no_of_sibling: String,
    pub sibling_ward_no: String,
    #[serde(rename = "PANNO")]
    pub pan_no: String,
    #[serde(rename = "FatherDoB")]
    pub father_dob: String,
    #[serde(rename = "MotherDoB")]
    pub mother_dob: String,
    #[serde(rename = "UDISE")]
    pub udise: String,
}

impl BankAccountDetails {
    pub fn get(&self, field: BankField) -> &str {
        match field {
            BankField::BankName => &self.bank_name,
            BankField::BankBranchName => &self.bank_branch_name,
            BankField::BankAccountNo => &self.bank_account_no,
            BankField::IfsCode => &self.ifs_code,
            BankField::AbcId => &self.abc_id,
            BankField::AnnualIncome => &self.annual_income,
            BankField::NoOfSibling => &self.no_of_sibling,
            BankField::SiblingWardNo => &self.sibling_ward_no,
            BankField::PanNo => &self.pan_no,
            BankField::FatherDob => &self.father_dob,
            BankField::MotherDob => &self.mother_dob,
            BankField::Udise => &self.udise,
        }
    }

    pub fn set(&mut self, field: BankField, value: impl Into<String>) {
        let slot = match field {
            BankField::BankName => &mut self.bank_name,
            BankField::BankBranchName => &mut self.bank_branch_name,
            BankField::BankAccountNo => &mut self.bank_account_no,
            BankField::IfsCode => &mut self.ifs_code,
            BankField::AbcId => &mut self.abc_id,
            BankField::AnnualIncome => &mut self.annual_income,
            BankField::NoOfSibling => &mut self.no_of_sibling,
            BankField::SiblingWardNo => &mut self.sibling_ward_no,
            BankField::PanNo => &mut self.pan_no,
            BankField::FatherDob => &mut self.father_dob,
            BankField::MotherDob => &mut self.mother_dob,
            BankField::Udise => &mut self.udise,
        };
        *slot = value.into();
    }

    /// Fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<BankField> {
        BankField::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        BankField::ALL.iter().all(|f| !self.get(*f).trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

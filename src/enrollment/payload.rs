//! Enrollment Submission Payload
//!
//! Shape of the save request. Bank keys are only present for non-direct
//! classes; in that branch the institute/section/course/class keys go out
//! as strings and `AnnualIncome` as a number.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Number, Value};

use super::{BankAccountDetails, MeritMaster};
use crate::error::PayloadError;
use crate::selection::{SelectionCache, SelectionLevel};

/// A key as it goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl WireId {
    /// Numeric when the key is an integer, text otherwise.
    pub fn natural(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(n) => WireId::Number(n),
            Err(_) => WireId::Text(value.trim().to_string()),
        }
    }

    pub fn text(value: &str) -> Self {
        WireId::Text(value.trim().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentSubmissionPayload {
    #[serde(rename = "MeritAdmissionEnrollment")]
    pub enrollment: MeritAdmissionEnrollment,
    #[serde(rename = "SubjectPaperMarks")]
    pub subject_paper_marks: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeritAdmissionEnrollment {
    #[serde(rename = "MeritEnrollMentID")]
    pub merit_enrollment_id: i64,
    #[serde(rename = "MeritStudentInfoID")]
    pub merit_student_info_id: i64,
    #[serde(rename = "EnrollMentDate")]
    pub enrollment_date: String,
    #[serde(rename = "CCode")]
    pub ccode: WireId,
    #[serde(rename = "SectionID")]
    pub section_id: WireId,
    #[serde(rename = "CourseID")]
    pub course_id: WireId,
    #[serde(rename = "ClassID")]
    pub class_id: WireId,
    #[serde(rename = "MeritFormStatusId")]
    pub merit_form_status_id: i64,
    #[serde(rename = "PaperLanguageMediumID")]
    pub paper_language_medium_id: WireId,
    #[serde(rename = "Taluka")]
    pub taluka: String,
    #[serde(flatten)]
    pub bank: Option<BankSection>,
}

/// Bank and family fields sent for non-direct classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankSection {
    #[serde(rename = "UDISE")]
    pub udise: String,
    #[serde(rename = "AnnualIncome")]
    pub annual_income: Number,
    #[serde(rename = "NoOfSibling")]
    pub no_of_sibling: String,
    #[serde(rename = "SiblingWardNo")]
    pub sibling_ward_no: String,
    #[serde(rename = "ABCID")]
    pub abc_id: String,
    #[serde(rename = "IFSCODE")]
    pub ifs_code: String,
    #[serde(rename = "PANNO")]
    pub pan_no: String,
    #[serde(rename = "BankAccountNo")]
    pub bank_account_no: String,
    #[serde(rename = "BankName")]
    pub bank_name: String,
    #[serde(rename = "BankBranchName")]
    pub bank_branch_name: String,
    #[serde(rename = "FatherDoB")]
    pub father_dob: String,
    #[serde(rename = "MotherDoB")]
    pub mother_dob: String,
}

impl BankSection {
    fn from_details(bank: &BankAccountDetails) -> Result<Self, PayloadError> {
        Ok(Self {
            udise: bank.udise.trim().to_string(),
            annual_income: parse_income(&bank.annual_income)?,
            no_of_sibling: bank.no_of_sibling.trim().to_string(),
            sibling_ward_no: bank.sibling_ward_no.trim().to_string(),
            abc_id: bank.abc_id.trim().to_string(),
            ifs_code: bank.ifs_code.trim().to_string(),
            pan_no: bank.pan_no.trim().to_string(),
            bank_account_no: bank.bank_account_no.trim().to_string(),
            bank_name: bank.bank_name.trim().to_string(),
            bank_branch_name: bank.bank_branch_name.trim().to_string(),
            father_dob: bank.father_dob.trim().to_string(),
            mother_dob: bank.mother_dob.trim().to_string(),
        })
    }
}

fn parse_income(raw: &str) -> Result<Number, PayloadError> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Number::from(n));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| PayloadError::InvalidAnnualIncome(raw.to_string()))
}

impl EnrollmentSubmissionPayload {
    /// Assemble the save request from the current workflow state.
    pub fn build(
        merit: Option<&MeritMaster>,
        selections: &SelectionCache,
        bank: &BankAccountDetails,
        now: DateTime<Utc>,
    ) -> Result<Self, PayloadError> {
        let merit = merit.ok_or(PayloadError::MeritNotLoaded)?;
        let required = |level: SelectionLevel| {
            selections
                .value(level)
                .ok_or(PayloadError::MissingSelection(level.label()))
        };

        let taluka = required(SelectionLevel::Taluka)?;
        let ccode = selections
            .value(SelectionLevel::Institute)
            .or_else(|| Some(merit.ccode.as_str()).filter(|c| !c.trim().is_empty()))
            .ok_or(PayloadError::MissingSelection(SelectionLevel::Institute.label()))?;
        let section = required(SelectionLevel::Section)?;
        let course = required(SelectionLevel::Course)?;
        let class = required(SelectionLevel::Class)?;
        let medium = required(SelectionLevel::Medium)?;

        let direct = selections
            .class_is_direct()
            .ok_or(PayloadError::AdmissionModeUnknown)?;

        let (bank, key): (Option<BankSection>, fn(&str) -> WireId) = if direct {
            (None, WireId::natural)
        } else {
            (Some(BankSection::from_details(bank)?), WireId::text)
        };

        Ok(Self {
            enrollment: MeritAdmissionEnrollment {
                merit_enrollment_id: 0,
                merit_student_info_id: merit.merit_student_info_id,
                enrollment_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                ccode: key(ccode),
                section_id: key(section),
                course_id: key(course),
                class_id: key(class),
                merit_form_status_id: merit.merit_form_status_id,
                paper_language_medium_id: WireId::natural(medium),
                taluka: taluka.to_string(),
                bank,
            },
            subject_paper_marks: Vec::new(),
        })
    }
}

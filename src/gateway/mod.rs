//! Remote Data Gateway
//!
//! The eCampus REST backend seen from the client: one async trait covering
//! every call the enrollment screen makes, the `{ResponseCode, Message,
//! ResponseData}` envelope, and the row shapes the server returns.

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::enrollment::{EnrollmentSubmissionPayload, MeritMaster};
use crate::error::GatewayError;

/// `ResponseCode` value the backend uses for success.
pub const SUCCESS_CODE: i64 = 1;

/// Calls the enrollment workflow needs from the backend.
///
/// Implementations unwrap the response envelope: a non-success
/// `ResponseCode` comes back as [`GatewayError::Rejected`].
#[async_trait]
pub trait EnrollmentGateway: Send + Sync {
    async fn list_talukas(&self) -> Result<Vec<TalukaRow>, GatewayError>;

    async fn list_institutes(&self, taluka: &str) -> Result<Vec<InstituteRow>, GatewayError>;

    async fn list_sections(&self, ccode: &str) -> Result<Vec<SectionRow>, GatewayError>;

    async fn list_courses(&self, section_id: &str, ccode: &str) -> Result<Vec<CourseRow>, GatewayError>;

    async fn list_classes(
        &self,
        course_id: &str,
        ccode: &str,
        role_id: &str,
    ) -> Result<Vec<ClassRow>, GatewayError>;

    /// Admission mode and eligible mediums for a class, in one response.
    async fn class_details(
        &self,
        class_id: &str,
        ccode: &str,
        merit_student_info_id: i64,
    ) -> Result<ClassDetails, GatewayError>;

    /// The student's merit registration, owned by the student-profile service.
    async fn merit_master(&self, student_id: &str) -> Result<MeritMaster, GatewayError>;

    /// Returns the server's `ResponseData` on success.
    async fn submit_enrollment(&self, payload: &EnrollmentSubmissionPayload) -> Result<Value, GatewayError>;

    /// Base64-encoded PDF receipt rendered by the server.
    async fn enrollment_receipt(&self, merit_student_info_id: i64) -> Result<String, GatewayError>;
}

// ──────────────────────────────────────────────────────────────────────────────
// RESPONSE ENVELOPE
// ──────────────────────────────────────────────────────────────────────────────

/// Wrapper every backend response comes in.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(rename = "ResponseCode", deserialize_with = "response_code")]
    pub code: i64,
    #[serde(rename = "Message")]
    pub message: Option<String>,
    #[serde(rename = "ResponseData")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Data on success, `Rejected` otherwise. Success with no data is `Ok(None)`.
    pub fn into_result(self, success_code: i64) -> Result<Option<T>, GatewayError> {
        if self.code == success_code {
            Ok(self.data)
        } else {
            Err(GatewayError::Rejected {
                code: self.code,
                message: self.message.unwrap_or_default(),
            })
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// ROWS
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalukaRow {
    #[serde(rename = "Taluka")]
    pub taluka: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstituteRow {
    #[serde(rename = "CCode", deserialize_with = "flexible_id")]
    pub ccode: String,
    #[serde(rename = "InstituteName")]
    pub institute_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRow {
    #[serde(rename = "SectionID", deserialize_with = "flexible_id")]
    pub section_id: String,
    #[serde(rename = "SectionName")]
    pub section_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRow {
    #[serde(rename = "CourseID", deserialize_with = "flexible_id")]
    pub course_id: String,
    #[serde(rename = "CourseName")]
    pub course_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRow {
    #[serde(rename = "ClassID", deserialize_with = "flexible_id")]
    pub class_id: String,
    #[serde(rename = "ClassName")]
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediumRow {
    #[serde(rename = "PaperLanguageMediumID", deserialize_with = "flexible_id")]
    pub medium_id: String,
    #[serde(rename = "Medium")]
    pub medium: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDetails {
    #[serde(rename = "classIsDirect")]
    pub class_is_direct: bool,
    #[serde(default)]
    pub mediums: Vec<MediumRow>,
}

// The backend is inconsistent about whether keys are numbers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Int(n) => n.to_string(),
            RawId::Float(f) => f.to_string(),
            RawId::Text(s) => s.trim().to_string(),
        }
    }
}

pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawId::deserialize(deserializer)?.into_string())
}

/// Like `flexible_id`, but `null` decodes to an empty string.
pub(crate) fn flexible_opt_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?
        .map(RawId::into_string)
        .unwrap_or_default())
}

fn response_code<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawId::deserialize(deserializer)?.into_string();
    raw.parse::<i64>()
        .map_err(|_| serde::de::Error::custom(format!("invalid ResponseCode '{}'", raw)))
}

//! Merit Master
//!
//! The student's existing merit registration. Read-only here.

use serde::{Deserialize, Serialize};

use crate::gateway::flexible_opt_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeritMaster {
    #[serde(rename = "MeritStudentInfoID")]
    pub merit_student_info_id: i64,
    /// Institute the student registered with; used when no institute is chosen.
    #[serde(rename = "CCode", default, deserialize_with = "flexible_opt_id")]
    pub ccode: String,
    #[serde(rename = "MeritFormStatusId")]
    pub merit_form_status_id: i64,
}

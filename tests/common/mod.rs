#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use ecampus_enrollment::documents::encode_document;
use ecampus_enrollment::enrollment::EnrollmentSubmissionPayload;
use ecampus_enrollment::error::GatewayError;
use ecampus_enrollment::gateway::{
    ClassDetails, ClassRow, CourseRow, EnrollmentGateway, InstituteRow, MediumRow, SectionRow, TalukaRow,
};
use ecampus_enrollment::{BankField, EnrollmentWorkflow, MeritMaster, SelectionLevel};

pub const TINY_PDF: &[u8] = b"%PDF-1.4\n%%EOF\n";

/// In-memory backend with knobs for latency, failures and holds.
pub struct ScriptedGateway {
    pub class_is_direct: bool,
    pub merit_missing: bool,
    /// Per-CCode delay before section lists return.
    pub section_delay_ms: HashMap<String, u64>,
    pub failing_ccodes: HashSet<String>,
    pub submit_delay_ms: u64,
    /// Number of submissions rejected before one succeeds.
    pub submit_failures: usize,

    pub hold_sections: AtomicBool,
    pub sections_waiting: AtomicBool,
    pub release: Notify,

    pub institute_calls: AtomicUsize,
    pub section_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub last_payload: Mutex<Option<Value>>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self {
            class_is_direct: true,
            merit_missing: false,
            section_delay_ms: HashMap::new(),
            failing_ccodes: HashSet::new(),
            submit_delay_ms: 0,
            submit_failures: 0,
            hold_sections: AtomicBool::new(false),
            sections_waiting: AtomicBool::new(false),
            release: Notify::new(),
            institute_calls: AtomicUsize::new(0),
            section_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
        }
    }
}

impl ScriptedGateway {
    pub fn non_direct() -> Self {
        Self { class_is_direct: false, ..Default::default() }
    }
}

#[async_trait]
impl EnrollmentGateway for ScriptedGateway {
    async fn list_talukas(&self) -> Result<Vec<TalukaRow>, GatewayError> {
        Ok(["Pune", "Nashik"]
            .iter()
            .map(|t| TalukaRow { taluka: t.to_string() })
            .collect())
    }

    async fn list_institutes(&self, taluka: &str) -> Result<Vec<InstituteRow>, GatewayError> {
        self.institute_calls.fetch_add(1, Ordering::SeqCst);
        let rows: &[(&str, &str)] = match taluka {
            "Pune" => &[("106015", "Fergusson College"), ("106020", "Modern College"), ("106099", "Closed College")],
            "Nashik" => &[("205001", "HPT Arts College")],
            _ => &[],
        };
        Ok(rows
            .iter()
            .map(|(c, n)| InstituteRow { ccode: c.to_string(), institute_name: n.to_string() })
            .collect())
    }

    async fn list_sections(&self, ccode: &str) -> Result<Vec<SectionRow>, GatewayError> {
        self.section_calls.fetch_add(1, Ordering::SeqCst);

        if self.hold_sections.load(Ordering::SeqCst) {
            self.sections_waiting.store(true, Ordering::SeqCst);
            self.release.notified().await;
        }
        if let Some(ms) = self.section_delay_ms.get(ccode) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.failing_ccodes.contains(ccode) {
            return Err(GatewayError::Rejected { code: 0, message: format!("No sections for {}", ccode) });
        }

        let rows: &[(&str, &str)] = match ccode {
            "106015" => &[("8", "Junior College"), ("9", "Senior College")],
            "106020" => &[("12", "Vocational")],
            _ => &[],
        };
        Ok(rows
            .iter()
            .map(|(id, n)| SectionRow { section_id: id.to_string(), section_name: n.to_string() })
            .collect())
    }

    async fn list_courses(&self, _section_id: &str, _ccode: &str) -> Result<Vec<CourseRow>, GatewayError> {
        Ok(vec![
            CourseRow { course_id: "307".into(), course_name: "Science".into() },
            CourseRow { course_id: "308".into(), course_name: "Commerce".into() },
        ])
    }

    async fn list_classes(&self, course_id: &str, _ccode: &str, _role_id: &str) -> Result<Vec<ClassRow>, GatewayError> {
        let class_id = match course_id {
            "307" => "1510702",
            _ => "1510802",
        };
        Ok(vec![ClassRow { class_id: class_id.into(), class_name: "FYJC".into() }])
    }

    async fn class_details(&self, _class_id: &str, _ccode: &str, merit_id: i64) -> Result<ClassDetails, GatewayError> {
        assert_eq!(merit_id, 5521);
        Ok(ClassDetails {
            class_is_direct: self.class_is_direct,
            mediums: vec![
                MediumRow { medium_id: "2".into(), medium: "English".into() },
                MediumRow { medium_id: "3".into(), medium: "Marathi".into() },
            ],
        })
    }

    async fn merit_master(&self, _student_id: &str) -> Result<MeritMaster, GatewayError> {
        if self.merit_missing {
            return Err(GatewayError::Rejected { code: 0, message: "Merit form not found".into() });
        }
        Ok(MeritMaster { merit_student_info_id: 5521, ccode: "106015".into(), merit_form_status_id: 3 })
    }

    async fn submit_enrollment(&self, payload: &EnrollmentSubmissionPayload) -> Result<Value, GatewayError> {
        let call = self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(serde_json::to_value(payload).unwrap());

        if self.submit_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.submit_delay_ms)).await;
        }
        if call < self.submit_failures {
            return Err(GatewayError::Rejected { code: 0, message: "Seats are full".into() });
        }
        Ok(json!({ "MeritEnrollMentID": 9001 }))
    }

    async fn enrollment_receipt(&self, _merit_student_info_id: i64) -> Result<String, GatewayError> {
        Ok(encode_document(TINY_PDF))
    }
}

pub fn workflow(gateway: &Arc<ScriptedGateway>) -> EnrollmentWorkflow {
    EnrollmentWorkflow::new(gateway.clone(), "S-1001", "3")
}

/// Mount and walk the chain Pune / 106015 / 8 / 307 / 1510702.
pub async fn select_all(workflow: &EnrollmentWorkflow) {
    workflow.mount().await.unwrap();
    workflow.select(SelectionLevel::Taluka, "Pune").await;
    workflow.select(SelectionLevel::Institute, "106015").await;
    workflow.select(SelectionLevel::Section, "8").await;
    workflow.select(SelectionLevel::Course, "307").await;
    workflow.select(SelectionLevel::Class, "1510702").await;
}

pub async fn fill_bank(workflow: &EnrollmentWorkflow) {
    for field in BankField::ALL {
        workflow.update_bank_field(field, format!("{} value", field.wire_name())).await;
    }
    workflow.update_bank_field(BankField::AnnualIncome, "250000").await;
}

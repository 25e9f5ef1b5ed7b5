//! HTTP Gateway
//!
//! `reqwest` client for the eCampus REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{
    ApiEnvelope, ClassDetails, ClassRow, CourseRow, EnrollmentGateway, InstituteRow, SectionRow, TalukaRow,
};
use crate::config::GatewayConfig;
use crate::enrollment::{EnrollmentSubmissionPayload, MeritMaster};
use crate::error::GatewayError;

const TALUKAS: &str = "api/MeritAdmission/GetTalukaList";
const INSTITUTES: &str = "api/MeritAdmission/GetInstituteByTaluka";
const SECTIONS: &str = "api/MeritAdmission/GetSectionByInstitute";
const COURSES: &str = "api/MeritAdmission/GetCourseBySection";
const CLASSES: &str = "api/MeritAdmission/GetClassByCourse";
const CLASS_DETAILS: &str = "api/MeritAdmission/GetClassDetails";
const MERIT_MASTER: &str = "api/MeritStudent/GetMeritMaster";
const SUBMIT: &str = "api/MeritAdmission/SaveMeritEnrollment";
const RECEIPT: &str = "api/MeritAdmission/GetEnrollmentReceipt";

/// Gateway backed by the remote REST API.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    success_code: i64,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            success_code: config.success_code,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.api_token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<Option<T>, GatewayError> {
        debug!("Gateway call: {}", path);

        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Error statuses may still carry an envelope with the server's reason.
            let err = match serde_json::from_str::<ApiEnvelope<Value>>(&body) {
                Ok(envelope) if envelope.code != self.success_code => GatewayError::Rejected {
                    code: envelope.code,
                    message: envelope.message.unwrap_or_default(),
                },
                _ => GatewayError::Status { status: status.as_u16() },
            };
            warn!("Gateway call {} failed with HTTP {}: {}", path, status, err);
            return Err(err);
        }

        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))?;

        envelope.into_result(self.success_code).inspect_err(|e| {
            warn!("Gateway call {} rejected: {}", path, e);
        })
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>, GatewayError> {
        let request = self.client.get(self.url(path)).query(query);
        Ok(self.send::<Vec<T>>(request, path).await?.unwrap_or_default())
    }

    async fn get_one<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, GatewayError> {
        let request = self.client.get(self.url(path)).query(query);
        self.send(request, path).await?.ok_or(GatewayError::MissingData)
    }
}

#[async_trait]
impl EnrollmentGateway for HttpGateway {
    async fn list_talukas(&self) -> Result<Vec<TalukaRow>, GatewayError> {
        self.get_list(TALUKAS, &[]).await
    }

    async fn list_institutes(&self, taluka: &str) -> Result<Vec<InstituteRow>, GatewayError> {
        self.get_list(INSTITUTES, &[("Taluka", taluka)]).await
    }

    async fn list_sections(&self, ccode: &str) -> Result<Vec<SectionRow>, GatewayError> {
        self.get_list(SECTIONS, &[("CCode", ccode)]).await
    }

    async fn list_courses(&self, section_id: &str, ccode: &str) -> Result<Vec<CourseRow>, GatewayError> {
        self.get_list(COURSES, &[("SectionID", section_id), ("CCode", ccode)]).await
    }

    async fn list_classes(&self, course_id: &str, ccode: &str, role_id: &str) -> Result<Vec<ClassRow>, GatewayError> {
        self.get_list(CLASSES, &[("CourseID", course_id), ("CCode", ccode), ("RoleID", role_id)])
            .await
    }

    async fn class_details(
        &self,
        class_id: &str,
        ccode: &str,
        merit_student_info_id: i64,
    ) -> Result<ClassDetails, GatewayError> {
        let info_id = merit_student_info_id.to_string();
        self.get_one(
            CLASS_DETAILS,
            &[("ClassID", class_id), ("CCode", ccode), ("MeritStudentInfoID", &info_id)],
        )
        .await
    }

    async fn merit_master(&self, student_id: &str) -> Result<MeritMaster, GatewayError> {
        self.get_one(MERIT_MASTER, &[("StudentID", student_id)]).await
    }

    async fn submit_enrollment(&self, payload: &EnrollmentSubmissionPayload) -> Result<Value, GatewayError> {
        let request = self.client.post(self.url(SUBMIT)).json(payload);
        Ok(self.send::<Value>(request, SUBMIT).await?.unwrap_or(Value::Null))
    }

    async fn enrollment_receipt(&self, merit_student_info_id: i64) -> Result<String, GatewayError> {
        let request = self
            .client
            .post(self.url(RECEIPT))
            .json(&json!({ "MeritStudentInfoID": merit_student_info_id }));
        self.send(request, RECEIPT).await?.ok_or(GatewayError::MissingData)
    }
}

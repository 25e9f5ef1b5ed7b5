//! Enrollment Workflow
//!
//! Wires the selection cache, dependency resolver, bank details, validator
//! and submission coordinator together behind one handle the screen talks to.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::GatewayConfig;
use crate::documents;
use crate::enrollment::{
    validator, BankAccountDetails, BankField, EnrollmentSubmissionPayload, MeritMaster, SaveBlocker,
    SubmissionCoordinator, SubmissionState, SubmitOutcome,
};
use crate::error::{EnrollmentError, GatewayError, PayloadError};
use crate::gateway::EnrollmentGateway;
use crate::selection::{DependencyResolver, LevelState, Resolution, SelectionCache, SelectionLevel};

/// Everything the screen needs to render one frame.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub selections: SelectionCache,
    pub bank: BankAccountDetails,
    pub merit: Option<MeritMaster>,
    pub error: Option<String>,
    pub can_save: bool,
    pub blockers: Vec<SaveBlocker>,
}

pub struct EnrollmentWorkflow {
    gateway: Arc<dyn EnrollmentGateway>,
    cache: Arc<RwLock<SelectionCache>>,
    merit: Arc<RwLock<Option<MeritMaster>>>,
    bank: RwLock<BankAccountDetails>,
    resolver: DependencyResolver,
    submission: SubmissionCoordinator,
    student_id: String,
}

impl EnrollmentWorkflow {
    pub fn new(
        gateway: Arc<dyn EnrollmentGateway>,
        student_id: impl Into<String>,
        role_id: impl Into<String>,
    ) -> Self {
        let cache = Arc::new(RwLock::new(SelectionCache::new()));
        let merit = Arc::new(RwLock::new(None));
        let resolver = DependencyResolver::new(gateway.clone(), cache.clone(), merit.clone(), role_id);

        Self {
            submission: SubmissionCoordinator::new(gateway.clone()),
            gateway,
            cache,
            merit,
            bank: RwLock::new(BankAccountDetails::default()),
            resolver,
            student_id: student_id.into(),
        }
    }

    pub fn from_config(gateway: Arc<dyn EnrollmentGateway>, config: &GatewayConfig) -> Self {
        Self::new(gateway, config.student_id.clone(), config.role_id.clone())
    }

    /// Load the merit record and the Taluka list; reset bank details.
    ///
    /// A missing merit record is an error; a failed Taluka load lands in the
    /// workflow error slot like any other fetch failure.
    pub async fn mount(&self) -> Result<Resolution, GatewayError> {
        self.bank.write().await.clear();

        let merit = self.gateway.merit_master(&self.student_id).await?;
        info!("Merit record {} loaded", merit.merit_student_info_id);
        *self.merit.write().await = Some(merit);

        Ok(self.resolver.load_talukas().await)
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    /// Route a dropdown change to the matching resolver handler.
    pub async fn select(&self, level: SelectionLevel, value: &str) -> Resolution {
        self.resolver.on_change(level, value).await
    }

    pub async fn level(&self, level: SelectionLevel) -> LevelState {
        self.cache.read().await.level(level).clone()
    }

    pub async fn selections(&self) -> SelectionCache {
        self.cache.read().await.clone()
    }

    pub async fn class_is_direct(&self) -> Option<bool> {
        self.cache.read().await.class_is_direct()
    }

    pub async fn merit(&self) -> Option<MeritMaster> {
        self.merit.read().await.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.resolver.error().await
    }

    pub async fn bank_details(&self) -> BankAccountDetails {
        self.bank.read().await.clone()
    }

    pub async fn update_bank_field(&self, field: BankField, value: impl Into<String>) {
        self.bank.write().await.set(field, value);
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        let merit = self.merit().await;
        let selections = self.selections().await;
        let bank = self.bank_details().await;
        let blockers = validator::blockers(merit.as_ref(), &selections, &bank);

        WorkflowSnapshot {
            can_save: blockers.is_empty(),
            blockers,
            error: self.error().await,
            selections,
            bank,
            merit,
        }
    }

    pub async fn can_save(&self) -> bool {
        self.snapshot().await.can_save
    }

    pub async fn blockers(&self) -> Vec<SaveBlocker> {
        self.snapshot().await.blockers
    }

    /// Build the payload from current state and hand it to the coordinator.
    pub async fn submit(&self) -> SubmitOutcome {
        let snapshot = self.snapshot().await;
        if !snapshot.can_save {
            info!("Save blocked: {:?}", snapshot.blockers);
        }

        let payload = EnrollmentSubmissionPayload::build(
            snapshot.merit.as_ref(),
            &snapshot.selections,
            &snapshot.bank,
            Utc::now(),
        );
        self.submission.submit(snapshot.can_save, payload).await
    }

    pub async fn submission_state(&self) -> SubmissionState {
        self.submission.state().await
    }

    pub async fn is_submitting(&self) -> bool {
        self.submission.is_submitting().await
    }

    /// Message of the last failed submit, until `reset_submission`.
    pub async fn submission_error(&self) -> Option<String> {
        self.submission.last_error().await
    }

    pub async fn reset_submission(&self) {
        self.submission.reset().await;
    }

    /// Fetch the server-rendered receipt and write it to `path`.
    pub async fn download_receipt(&self, path: impl AsRef<Path>) -> Result<usize, EnrollmentError> {
        let info_id = self
            .merit()
            .await
            .map(|m| m.merit_student_info_id)
            .ok_or(PayloadError::MeritNotLoaded)?;

        let encoded = self.gateway.enrollment_receipt(info_id).await?;
        documents::save_pdf(&encoded, path).await.map_err(|e| {
            warn!("Receipt could not be saved: {}", e);
            EnrollmentError::from(e)
        })
    }
}

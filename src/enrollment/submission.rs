//! Submission Coordinator
//!
//! `Idle → Submitting → Success | Failed`. Only one submission may be in
//! flight; a second attempt while submitting (or after a success that has
//! not been reset) is a no-op.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::EnrollmentSubmissionPayload;
use crate::error::PayloadError;
use crate::gateway::EnrollmentGateway;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    /// Holds the server's `ResponseData`.
    Success(Value),
    Failed(String),
}

/// Result of one call to [`SubmissionCoordinator::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Value),
    Failed(String),
    /// A submission is in flight or already succeeded; nothing was sent.
    Ignored,
    /// The save predicate is false; nothing was sent.
    NotReady,
}

pub struct SubmissionCoordinator {
    gateway: Arc<dyn EnrollmentGateway>,
    state: Mutex<SubmissionState>,
}

impl SubmissionCoordinator {
    pub fn new(gateway: Arc<dyn EnrollmentGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub async fn state(&self) -> SubmissionState {
        self.state.lock().await.clone()
    }

    pub async fn is_submitting(&self) -> bool {
        matches!(*self.state.lock().await, SubmissionState::Submitting)
    }

    pub async fn last_error(&self) -> Option<String> {
        match &*self.state.lock().await {
            SubmissionState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Send `payload` if `ready` and nothing else is in flight.
    pub async fn submit(
        &self,
        ready: bool,
        payload: Result<EnrollmentSubmissionPayload, PayloadError>,
    ) -> SubmitOutcome {
        {
            let mut state = self.state.lock().await;
            match *state {
                SubmissionState::Submitting | SubmissionState::Success(_) => return SubmitOutcome::Ignored,
                SubmissionState::Idle | SubmissionState::Failed(_) => {}
            }
            if !ready {
                return SubmitOutcome::NotReady;
            }
            *state = SubmissionState::Submitting;
        }

        let attempt = Uuid::new_v4();
        info!(%attempt, "Submitting enrollment");

        let result = match payload {
            Ok(payload) => self.gateway.submit_enrollment(&payload).await.map_err(|e| e.user_message()),
            Err(e) => Err(e.to_string()),
        };

        let mut state = self.state.lock().await;
        match result {
            Ok(data) => {
                info!(%attempt, "Enrollment saved");
                *state = SubmissionState::Success(data.clone());
                SubmitOutcome::Submitted(data)
            }
            Err(message) => {
                warn!(%attempt, "Enrollment failed: {}", message);
                *state = SubmissionState::Failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Back to `Idle`, forgetting the last result. No effect while submitting.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        if !matches!(*state, SubmissionState::Submitting) {
            *state = SubmissionState::Idle;
        }
    }
}

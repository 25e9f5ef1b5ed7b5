//! eCampus Enrollment
//!
//! Client-side core of the eCampus course-enrollment screen:
//! - Six-level cascading selection (Taluka → Institute → Section → Course → Class → Medium)
//! - Downstream invalidation with stale-response guarding
//! - Conditional bank-detail validation
//! - Single-flight enrollment submission
//! - Receipt decoding and payment redirect matching

pub mod config;
pub mod documents;
pub mod enrollment;
pub mod error;
pub mod gateway;
pub mod payment;
pub mod selection;
pub mod telemetry;
pub mod workflow;

// Re-exports for convenience
pub use config::GatewayConfig;
pub use enrollment::{BankAccountDetails, BankField, MeritMaster, SubmissionState, SubmitOutcome};
pub use gateway::{EnrollmentGateway, HttpGateway};
pub use selection::{Resolution, SelectOption, SelectionLevel};
pub use workflow::EnrollmentWorkflow;

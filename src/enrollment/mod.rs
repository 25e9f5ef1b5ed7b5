//! Enrollment Module
//!
//! Everything downstream of the selections: bank details, the merit record,
//! the save predicate, the request payload and the submission state machine.

mod bank;
mod merit;
mod payload;
mod submission;
pub mod validator;

pub use bank::{BankAccountDetails, BankField};
pub use merit::MeritMaster;
pub use payload::{BankSection, EnrollmentSubmissionPayload, MeritAdmissionEnrollment, WireId};
pub use submission::{SubmissionCoordinator, SubmissionState, SubmitOutcome};
pub use validator::{can_save, SaveBlocker};

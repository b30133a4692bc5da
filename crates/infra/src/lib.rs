//! Infrastructure layer: configuration, HTTP adapters for the signing
//! service and the Hacienda reception API, and the submission workflow that
//! drives a DTE document through its lifecycle.

pub mod config;
pub mod external;
pub mod report;
pub mod submission;

pub use config::{ConfigError, DteConfig};
pub use external::{
    HaciendaClient, HttpSigner, ReceptionOutcome, ReceptionRequest, ReceptionService,
    SigningOutcome, SigningService,
};
pub use report::DteReport;
pub use submission::{DteEnvelope, Submission, SubmissionClient, SubmissionError};

//! Life Underwriting - Rules engine for life insurance proposals
//!
//! This library provides:
//! - Applicant intake from extraction payloads (JSON) and batch files (CSV)
//! - Extra Mortality Rating (EMR) scoring from BMI, family history, health
//!   conditions and habits
//! - Life and critical illness rider rating classes
//! - Accept / load / decline verdicts with advisory underwriting flags
//! - Life, Accident and CIR premium quotes
//! - Parallel batch underwriting over a shared rulebook

pub mod applicant;
pub mod batch;
pub mod error;
pub mod tables;
pub mod underwriting;

// Re-export commonly used types
pub use applicant::{Applicant, ApplicantRecord};
pub use batch::BatchUnderwriter;
pub use error::{ApplicantError, ApplicantResult};
pub use tables::{Rulebook, UnderwritingLimits};
pub use underwriting::{
    Flag, FlagSeverity, QuoteSummary, UnderwritingEngine, UnderwritingResult, Verdict,
};

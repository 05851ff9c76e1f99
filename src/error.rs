//! Input and rulebook errors
//!
//! The underwriting engine itself is total: any structurally valid
//! [`Applicant`](crate::Applicant) produces a result. Everything that can fail
//! happens before that point, while an applicant record or a custom rulebook is
//! read and validated.

use thiserror::Error;

/// Errors raised while building an applicant or a rulebook
#[derive(Debug, Error)]
pub enum ApplicantError {
    /// Required field is absent from the record
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Field is present but its value cannot be used for banding
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    /// Date of birth is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date of birth '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Health condition severity outside 0..=4
    #[error("Invalid severity {level} for {condition}: expected 0 to 4")]
    InvalidSeverity {
        condition: String,
        level: i64,
    },

    /// Unknown enumeration value in a CSV cell
    #[error("Unknown {kind} '{value}'")]
    UnknownVariant {
        kind: &'static str,
        value: String,
    },

    /// A batch row failed validation
    #[error("Row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<ApplicantError>,
    },

    /// Malformed JSON, including out-of-enum keys and values
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CSV row
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Custom rulebook failed validation
    #[error("Rulebook error: {0}")]
    Rulebook(String),
}

impl ApplicantError {
    /// Creates an invalid value error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ApplicantError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a rulebook validation error
    pub fn rulebook(message: impl Into<String>) -> Self {
        ApplicantError::Rulebook(message.into())
    }
}

/// Result alias for applicant intake and rulebook loading
pub type ApplicantResult<T> = Result<T, ApplicantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ApplicantError::MissingField("yearly_income");
        assert_eq!(err.to_string(), "Missing required field: yearly_income");

        let err = ApplicantError::invalid("height_cm", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid value for height_cm: must be greater than zero"
        );

        let err = ApplicantError::InvalidSeverity {
            condition: "diabetes".to_string(),
            level: 7,
        };
        assert_eq!(err.to_string(), "Invalid severity 7 for diabetes: expected 0 to 4");
    }
}

//! Top-level accept / load / decline decision

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tables::UnderwritingLimits;

/// Underwriting verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    StandardAcceptance,
    AcceptanceWithLoading,
    PolicyDeclined,
}

/// Decision category used to group verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionCategory {
    Standard,
    Loading,
    Decline,
}

impl Verdict {
    pub fn category(&self) -> DecisionCategory {
        match self {
            Verdict::StandardAcceptance => DecisionCategory::Standard,
            Verdict::AcceptanceWithLoading => DecisionCategory::Loading,
            Verdict::PolicyDeclined => DecisionCategory::Decline,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::StandardAcceptance => "Standard Acceptance",
            Verdict::AcceptanceWithLoading => "Acceptance with Loading",
            Verdict::PolicyDeclined => "Policy Declined",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decide from age and EMR alone
///
/// Decline rules are checked first, so an out-of-range age is declined
/// whatever the EMR.
pub fn decide(age: i32, emr: f64, limits: &UnderwritingLimits) -> Verdict {
    if age < limits.min_age || age > limits.max_age || emr > limits.max_ratable_emr {
        Verdict::PolicyDeclined
    } else if emr < limits.standard_emr_limit {
        Verdict::StandardAcceptance
    } else {
        Verdict::AcceptanceWithLoading
    }
}

//! Underwriting flags explaining exceptional conditions
//!
//! Each check runs independently and adds at most one flag (the severity-4
//! check adds one per condition). Flags are advisory: they never change the
//! verdict or stop premiums being computed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::emr::EmrBreakdown;
use super::report::format_currency;
use crate::applicant::{Applicant, HealthCondition};
use crate::tables::Rulebook;

/// Flag severity; ordering is display priority (`Decline` highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagSeverity {
    Info,
    Warning,
    ManualUw,
    Decline,
}

impl FlagSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagSeverity::Info => "INFO",
            FlagSeverity::Warning => "WARNING",
            FlagSeverity::ManualUw => "MANUAL_UW",
            FlagSeverity::Decline => "DECLINE",
        }
    }
}

impl fmt::Display for FlagSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which check raised a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "check", content = "condition")]
pub enum FlagKind {
    BelowMinimumAge,
    AboveMaximumAge,
    CirAgeLimit,
    Underweight,
    BmiOutsideTable,
    ConditionsExceedTable,
    SevereCondition(HealthCondition),
    EmrAboveRatableMaximum,
    CirEmrCeiling,
    FinancialLimitExceeded,
    MultipleRiskyOccupations,
}

impl FlagKind {
    pub fn severity(&self) -> FlagSeverity {
        match self {
            FlagKind::BelowMinimumAge
            | FlagKind::AboveMaximumAge
            | FlagKind::EmrAboveRatableMaximum => FlagSeverity::Decline,
            FlagKind::CirAgeLimit | FlagKind::CirEmrCeiling => FlagSeverity::Warning,
            FlagKind::Underweight
            | FlagKind::BmiOutsideTable
            | FlagKind::ConditionsExceedTable
            | FlagKind::SevereCondition(_)
            | FlagKind::FinancialLimitExceeded
            | FlagKind::MultipleRiskyOccupations => FlagSeverity::ManualUw,
        }
    }
}

/// One underwriting flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub kind: FlagKind,
    pub severity: FlagSeverity,
    pub message: String,
}

impl Flag {
    fn new(kind: FlagKind, message: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message,
        }
    }
}

/// Run every check and collect the flags in check order
pub fn generate(
    applicant: &Applicant,
    age: i32,
    bmi: f64,
    breakdown: &EmrBreakdown,
    rulebook: &Rulebook,
) -> Vec<Flag> {
    let limits = &rulebook.limits;
    let emr = breakdown.total();
    let mut flags = Vec::new();

    if age < limits.min_age {
        flags.push(Flag::new(
            FlagKind::BelowMinimumAge,
            format!("Age {} below minimum insurable age of {}.", age, limits.min_age),
        ));
    }
    if age > limits.max_age {
        flags.push(Flag::new(
            FlagKind::AboveMaximumAge,
            format!("Age {} exceeds maximum insurable age of {}.", age, limits.max_age),
        ));
    }
    if age > limits.cir_max_age && age <= limits.max_age {
        flags.push(Flag::new(
            FlagKind::CirAgeLimit,
            format!(
                "CIR unavailable above age {}; CIR will be declined.",
                limits.cir_max_age
            ),
        ));
    }
    if bmi < limits.underweight_bmi {
        flags.push(Flag::new(
            FlagKind::Underweight,
            format!(
                "BMI {:.1} below {} (underweight); manual medical review required.",
                bmi, limits.underweight_bmi
            ),
        ));
    }
    if bmi > limits.overweight_bmi {
        flags.push(Flag::new(
            FlagKind::BmiOutsideTable,
            format!(
                "BMI {:.1} above {}; not in standard table, manual review needed.",
                bmi, limits.overweight_bmi
            ),
        ));
    }
    if breakdown.active_conditions > limits.condition_table_coverage {
        flags.push(Flag::new(
            FlagKind::ConditionsExceedTable,
            format!(
                "{} conditions found. Table covers max {}; manual UW required.",
                breakdown.active_conditions, limits.condition_table_coverage
            ),
        ));
    }
    for (condition, severity) in &applicant.health_conditions {
        if severity.level() == 4 {
            flags.push(Flag::new(
                FlagKind::SevereCondition(*condition),
                format!(
                    "{} at Severity Level 4; medical officer review required.",
                    condition.label()
                ),
            ));
        }
    }
    if emr > limits.max_ratable_emr {
        flags.push(Flag::new(
            FlagKind::EmrAboveRatableMaximum,
            format!(
                "Total EMR {:.1} exceeds ratable maximum of {}.",
                emr, limits.max_ratable_emr
            ),
        ));
    }
    if emr > limits.cir_max_emr && applicant.cir_cover > 0.0 {
        flags.push(Flag::new(
            FlagKind::CirEmrCeiling,
            format!(
                "EMR {:.1} exceeds CIR ceiling of {}; CIR will be declined.",
                emr, limits.cir_max_emr
            ),
        ));
    }

    let multiple = rulebook.premium.financial_multiple(age);
    let ceiling = multiple * applicant.yearly_income;
    if applicant.base_cover > ceiling {
        flags.push(Flag::new(
            FlagKind::FinancialLimitExceeded,
            format!(
                "Life cover {} exceeds financial UW limit ({}× income = {}).",
                format_currency(applicant.base_cover),
                multiple,
                format_currency(ceiling)
            ),
        ));
    }
    if applicant.risky_occupations.len() > 1 {
        flags.push(Flag::new(
            FlagKind::MultipleRiskyOccupations,
            "Multiple risky occupations declared; manual review required.".to_string(),
        ));
    }

    flags
}

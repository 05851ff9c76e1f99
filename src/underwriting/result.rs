//! Underwriting result aggregate and its flat summary row

use serde::{Deserialize, Serialize};

use super::emr::EmrBreakdown;
use super::flags::{Flag, FlagSeverity};
use super::premium::{CirPremium, Premiums};
use super::rating::Ratings;
use super::verdict::{DecisionCategory, Verdict};

/// Complete result of underwriting one applicant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderwritingResult {
    /// Attained age on the reference date
    pub age: i32,

    /// BMI rounded to one decimal
    pub bmi: f64,

    /// Total EMR (sum of the breakdown)
    pub emr_total: f64,
    pub emr_breakdown: EmrBreakdown,

    pub ratings: Ratings,
    pub verdict: Verdict,
    pub category: DecisionCategory,

    /// Flags in generation order
    pub flags: Vec<Flag>,

    pub premiums: Premiums,

    /// Unrounded sum of every quoted premium
    pub grand_total: f64,
}

impl UnderwritingResult {
    /// Flags sorted by severity, highest first; ties keep generation order
    pub fn flags_by_priority(&self) -> Vec<&Flag> {
        let mut flags: Vec<&Flag> = self.flags.iter().collect();
        flags.sort_by(|a, b| b.severity.cmp(&a.severity));
        flags
    }

    pub fn count_flags(&self, severity: FlagSeverity) -> usize {
        self.flags.iter().filter(|f| f.severity == severity).count()
    }

    /// Flatten into one summary row
    pub fn summary(&self) -> QuoteSummary {
        let cir_premium = match &self.premiums.cir {
            CirPremium::Quoted(quote) => Some(quote.total.round()),
            _ => None,
        };

        QuoteSummary {
            name: None,
            age: self.age,
            bmi: self.bmi,
            emr_total: self.emr_total,
            life_class: self.ratings.life.as_ref().map(|c| c.label.clone()),
            life_factor: self.ratings.life_factor(),
            cir_class: self.ratings.cir.as_ref().map(|c| c.label.clone()),
            cir_factor: self.ratings.cir_factor(),
            verdict: self.verdict,
            decline_flags: self.count_flags(FlagSeverity::Decline),
            manual_uw_flags: self.count_flags(FlagSeverity::ManualUw),
            warning_flags: self.count_flags(FlagSeverity::Warning),
            life_premium: self.premiums.life.as_ref().map(|p| p.total.round()),
            accident_premium: self.premiums.accident.as_ref().map(|p| p.total.round()),
            cir_premium,
            cir_decline_reason: self.premiums.cir.decline_reason().map(|r| r.to_string()),
            grand_total: self.grand_total.round(),
        }
    }
}

/// One flat row per applicant, premiums rounded to whole units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub name: Option<String>,
    pub age: i32,
    pub bmi: f64,
    pub emr_total: f64,
    pub life_class: Option<String>,
    pub life_factor: u32,
    pub cir_class: Option<String>,
    pub cir_factor: u32,
    pub verdict: Verdict,
    pub decline_flags: usize,
    pub manual_uw_flags: usize,
    pub warning_flags: usize,
    pub life_premium: Option<f64>,
    pub accident_premium: Option<f64>,
    pub cir_premium: Option<f64>,
    pub cir_decline_reason: Option<String>,
    pub grand_total: f64,
}

//! Underwriting engine: one applicant in, one result out
//!
//! Stages run in a fixed order (biometrics, EMR, ratings, verdict, flags,
//! premiums). The engine keeps no state between calls, so one engine can be
//! shared across threads.

use chrono::NaiveDate;
use log::debug;

use super::biometrics::{age_on, bmi};
use super::emr::aggregate;
use super::flags::generate;
use super::premium::calculate;
use super::rating::classify;
use super::result::UnderwritingResult;
use super::verdict::decide;
use crate::applicant::Applicant;
use crate::tables::Rulebook;

/// Underwriting engine over a fixed rulebook
#[derive(Debug, Clone)]
pub struct UnderwritingEngine {
    rulebook: Rulebook,
}

impl UnderwritingEngine {
    /// Create an engine with the given rulebook
    pub fn new(rulebook: Rulebook) -> Self {
        Self { rulebook }
    }

    /// Engine over the reference tables
    pub fn standard() -> Self {
        Self::new(Rulebook::standard())
    }

    pub fn rulebook(&self) -> &Rulebook {
        &self.rulebook
    }

    /// Underwrite one applicant with ages taken on `as_of`
    pub fn underwrite(&self, applicant: &Applicant, as_of: NaiveDate) -> UnderwritingResult {
        let age = age_on(applicant.date_of_birth, as_of);
        let bmi = bmi(applicant.weight_kg, applicant.height_cm);
        debug!("biometrics: age {} bmi {:.1} (as of {})", age, bmi, as_of);

        let emr_breakdown = aggregate(applicant, bmi, &self.rulebook.emr);
        let emr_total = emr_breakdown.total();
        debug!(
            "emr: bmi {} family {} health {} habits {} total {}",
            emr_breakdown.bmi_points,
            emr_breakdown.family_adjustment,
            emr_breakdown.health_total,
            emr_breakdown.habit_total,
            emr_total
        );

        let ratings = classify(emr_total, &self.rulebook.rating);
        debug!(
            "ratings: life {:?} cir {:?}",
            ratings.life.as_ref().map(|c| c.label.as_str()),
            ratings.cir.as_ref().map(|c| c.label.as_str())
        );

        let verdict = decide(age, emr_total, &self.rulebook.limits);
        debug!("verdict: {}", verdict);

        let flags = generate(applicant, age, bmi, &emr_breakdown, &self.rulebook);
        debug!("flags: {} raised", flags.len());

        let premiums = calculate(applicant, age, emr_total, &ratings, &self.rulebook);
        let grand_total = premiums.grand_total();
        debug!("premiums: grand total {:.2}", grand_total);

        UnderwritingResult {
            age,
            bmi,
            emr_total,
            emr_breakdown,
            ratings,
            verdict,
            category: verdict.category(),
            flags,
            premiums,
            grand_total,
        }
    }
}

impl Default for UnderwritingEngine {
    fn default() -> Self {
        Self::standard()
    }
}

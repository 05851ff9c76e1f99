//! Underwriting rulebook: rate and band tables plus decision thresholds
//!
//! The rulebook is built once (from the reference tables or a JSON file) and
//! then only read. It is shared by every computation, including parallel
//! batch runs.

mod bands;
mod emr;
mod premium;
mod rating;

pub use bands::{Band, BandTable, SurchargeTable};
pub use emr::EmrTables;
pub use premium::{PremiumRates, PremiumTables};
pub use rating::{RatingClass, RatingTables};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

use crate::applicant::{Habit, HealthCondition, Occupation, ParentHealthStatus};
use crate::error::{ApplicantError, ApplicantResult};

/// Age, EMR and BMI thresholds used by the verdict, flags and premiums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingLimits {
    /// Youngest insurable age
    pub min_age: i32,
    /// Oldest insurable age
    pub max_age: i32,
    /// Oldest age at which the critical illness rider is offered
    pub cir_max_age: i32,
    /// EMR above which no Life rating applies
    pub max_ratable_emr: f64,
    /// EMR above which the critical illness rider is declined
    pub cir_max_emr: f64,
    /// EMR below which the case is accepted at standard rates
    pub standard_emr_limit: f64,
    /// BMI below which the case goes to manual review
    pub underweight_bmi: f64,
    /// BMI above which the case is outside the standard table
    pub overweight_bmi: f64,
    /// Number of simultaneous conditions the tables are calibrated for
    pub condition_table_coverage: usize,
    /// Life loading per unit of rating factor, as a share of base premium
    pub life_loading_rate: f64,
    /// CIR loading per unit of rating factor, as a share of base premium
    pub cir_loading_rate: f64,
}

impl Default for UnderwritingLimits {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 65,
            cir_max_age: 60,
            max_ratable_emr: 550.0,
            cir_max_emr: 100.0,
            standard_emr_limit: 20.0,
            underweight_bmi: 18.0,
            overweight_bmi: 38.0,
            condition_table_coverage: 3,
            life_loading_rate: 0.25,
            cir_loading_rate: 0.30,
        }
    }
}

/// Container for every table the engine reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rulebook {
    pub emr: EmrTables,
    pub rating: RatingTables,
    pub premium: PremiumTables,
    pub limits: UnderwritingLimits,
}

impl Rulebook {
    /// Reference actuarial rulebook
    pub fn standard() -> Self {
        Self {
            emr: EmrTables::standard(),
            rating: RatingTables::standard(),
            premium: PremiumTables::standard(),
            limits: UnderwritingLimits::default(),
        }
    }

    /// Parse and validate a rulebook from JSON text
    pub fn from_json_str(json: &str) -> ApplicantResult<Self> {
        let rulebook: Rulebook = serde_json::from_str(json)?;
        rulebook.validate()?;
        Ok(rulebook)
    }

    /// Load and validate a rulebook from a JSON file
    pub fn from_json_path(path: &Path) -> ApplicantResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject tables the engine cannot band against
    pub fn validate(&self) -> ApplicantResult<()> {
        require_keys("family_history", &self.emr.family_history, &ParentHealthStatus::ALL)?;
        require_keys("condition_points", &self.emr.condition_points, &HealthCondition::ALL)?;
        require_keys("habit_points", &self.emr.habit_points, &Habit::ALL)?;
        require_keys("occupation_loading", &self.premium.occupation_loading, &Occupation::ALL)?;

        if self.emr.bmi_points.is_empty() {
            return Err(ApplicantError::rulebook("BMI table is empty"));
        }
        if let Some(band) = self.emr.bmi_points.first_inverted() {
            return Err(ApplicantError::rulebook(format!(
                "BMI band [{}, {}] is inverted",
                band.lo, band.hi
            )));
        }
        for (name, table) in [("Life", &self.rating.life), ("CIR", &self.rating.cir)] {
            if let Some(band) = table.first_inverted() {
                return Err(ApplicantError::rulebook(format!(
                    "{} rating band [{}, {}] is inverted",
                    name, band.lo, band.hi
                )));
            }
        }
        if let Some(band) = self.premium.rates_by_age.first_inverted() {
            return Err(ApplicantError::rulebook(format!(
                "premium age band [{}, {}] is inverted",
                band.lo, band.hi
            )));
        }
        if let Some(band) = self.premium.financial_multiples.first_inverted() {
            return Err(ApplicantError::rulebook(format!(
                "financial multiple band [{}, {}] is inverted",
                band.lo, band.hi
            )));
        }
        let negative_rate = self.premium.rates_by_age.bands().iter().find(|b| {
            let r = &b.value;
            r.life < 0.0 || r.accident < 0.0 || r.cir.map_or(false, |c| c < 0.0)
        });
        if let Some(band) = negative_rate {
            return Err(ApplicantError::rulebook(format!(
                "premium rates for ages [{}, {}] must not be negative",
                band.lo, band.hi
            )));
        }
        if self.premium.occupation_loading.values().any(|v| *v < 0.0) {
            return Err(ApplicantError::rulebook("occupation loadings must not be negative"));
        }
        let limits = &self.limits;
        if limits.min_age > limits.max_age {
            return Err(ApplicantError::rulebook(format!(
                "min_age {} exceeds max_age {}",
                limits.min_age, limits.max_age
            )));
        }
        if limits.life_loading_rate < 0.0 || limits.cir_loading_rate < 0.0 {
            return Err(ApplicantError::rulebook("loading rates must not be negative"));
        }
        Ok(())
    }
}

/// Every variant must have its own entry; a missing key is not read as 0
fn require_keys<K: Ord + Debug, V>(table: &str, map: &BTreeMap<K, V>, keys: &[K]) -> ApplicantResult<()> {
    match keys.iter().find(|k| !map.contains_key(*k)) {
        Some(key) => Err(ApplicantError::rulebook(format!(
            "{} has no entry for {:?}",
            table, key
        ))),
        None => Ok(()),
    }
}

impl Default for Rulebook {
    fn default() -> Self {
        Self::standard()
    }
}

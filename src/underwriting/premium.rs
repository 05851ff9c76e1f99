//! Premium calculator for Life, Accident and the critical illness rider
//!
//! All rates are per mille of the relevant cover. Amounts are kept unrounded;
//! rounding happens only when a figure is displayed.

use serde::Serialize;
use std::fmt;

use super::rating::Ratings;
use crate::applicant::Applicant;
use crate::tables::Rulebook;

/// Life premium breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifePremium {
    /// Per-mille rate for the age band
    pub rate: f64,
    pub base: f64,
    /// Life rating factor (0 when no Life class applies)
    pub rating_factor: u32,
    pub loading: f64,
    /// Summed per-mille occupational extra
    pub occupational_rate: f64,
    pub occupational: f64,
    pub total: f64,
}

/// Accident premium breakdown; accident cover carries no rating loading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccidentPremium {
    pub rate: f64,
    pub base: f64,
    pub occupational_rate: f64,
    pub occupational: f64,
    pub total: f64,
}

/// Quoted critical illness rider premium
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CirQuote {
    pub rate: f64,
    pub base: f64,
    /// CIR rating factor (0 when no CIR class applies)
    pub rating_factor: u32,
    pub loading: f64,
    pub total: f64,
}

/// Why the critical illness rider was declined
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "code")]
pub enum CirDeclineReason {
    AboveAgeLimit { age: i32, limit: i32 },
    EmrAboveCeiling { emr: f64, ceiling: f64 },
    NoRateForAge { age: i32 },
}

impl fmt::Display for CirDeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CirDeclineReason::AboveAgeLimit { limit, .. } => {
                write!(f, "CIR not available above age {}", limit)
            }
            CirDeclineReason::EmrAboveCeiling { emr, ceiling } => {
                write!(f, "EMR {:.1} exceeds CIR max of {}", emr, ceiling)
            }
            CirDeclineReason::NoRateForAge { age } => {
                write!(f, "No CIR rate available for age {}", age)
            }
        }
    }
}

/// Outcome of the critical illness rider
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CirPremium {
    Quoted(CirQuote),
    Declined { reason: CirDeclineReason },
    /// The applicant is outside every premium band and the age limit does
    /// not apply (e.g. under the minimum age)
    NotQuoted,
}

impl CirPremium {
    /// Contribution to the grand total; 0 unless quoted
    pub fn total(&self) -> f64 {
        match self {
            CirPremium::Quoted(quote) => quote.total,
            _ => 0.0,
        }
    }

    pub fn is_declined(&self) -> bool {
        matches!(self, CirPremium::Declined { .. })
    }

    pub fn decline_reason(&self) -> Option<CirDeclineReason> {
        match self {
            CirPremium::Declined { reason } => Some(*reason),
            _ => None,
        }
    }
}

/// All three premiums for one applicant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Premiums {
    /// Absent when the age is outside every premium band
    pub life: Option<LifePremium>,
    pub accident: Option<AccidentPremium>,
    pub cir: CirPremium,
}

impl Premiums {
    /// Sum of the unrounded totals; a declined rider contributes 0
    pub fn grand_total(&self) -> f64 {
        self.life.as_ref().map_or(0.0, |p| p.total)
            + self.accident.as_ref().map_or(0.0, |p| p.total)
            + self.cir.total()
    }
}

fn per_mille(rate: f64, cover: f64) -> f64 {
    rate * (cover / 1000.0)
}

/// Rating loading on a base premium; factor 0 adds nothing even on an infinite base
fn rating_loading(loading_rate: f64, factor: u32, base: f64) -> f64 {
    if factor == 0 {
        0.0
    } else {
        loading_rate * f64::from(factor) * base
    }
}

/// Price every cover
///
/// Premiums are computed for declined cases too; only the rider has its own
/// eligibility gate. The age gate on the rider always wins, so an applicant
/// over the rider age limit gets an age-based decline even when no premium
/// band covers their age.
pub fn calculate(applicant: &Applicant, age: i32, emr: f64, ratings: &Ratings, rulebook: &Rulebook) -> Premiums {
    let limits = &rulebook.limits;

    let rates = if age >= limits.min_age && age <= limits.max_age {
        rulebook.premium.rates_for_age(age)
    } else {
        None
    };

    let rates = match rates {
        Some(rates) => rates,
        None => {
            let cir = if age > limits.cir_max_age {
                CirPremium::Declined {
                    reason: CirDeclineReason::AboveAgeLimit { age, limit: limits.cir_max_age },
                }
            } else {
                CirPremium::NotQuoted
            };
            return Premiums { life: None, accident: None, cir };
        }
    };

    let occupational_rate = rulebook.premium.occupational_rate(&applicant.risky_occupations);

    let life_base = per_mille(rates.life, applicant.base_cover);
    let life_factor = ratings.life_factor();
    let life_loading = rating_loading(limits.life_loading_rate, life_factor, life_base);
    let life_occupational = per_mille(occupational_rate, applicant.base_cover);
    let life = LifePremium {
        rate: rates.life,
        base: life_base,
        rating_factor: life_factor,
        loading: life_loading,
        occupational_rate,
        occupational: life_occupational,
        total: life_base + life_loading + life_occupational,
    };

    let accident_base = per_mille(rates.accident, applicant.accident_cover);
    let accident_occupational = per_mille(occupational_rate, applicant.accident_cover);
    let accident = AccidentPremium {
        rate: rates.accident,
        base: accident_base,
        occupational_rate,
        occupational: accident_occupational,
        total: accident_base + accident_occupational,
    };

    let cir = if age > limits.cir_max_age {
        CirPremium::Declined {
            reason: CirDeclineReason::AboveAgeLimit { age, limit: limits.cir_max_age },
        }
    } else if emr > limits.cir_max_emr {
        CirPremium::Declined {
            reason: CirDeclineReason::EmrAboveCeiling { emr, ceiling: limits.cir_max_emr },
        }
    } else {
        match rates.cir {
            Some(rate) => {
                let base = per_mille(rate, applicant.cir_cover);
                let factor = ratings.cir_factor();
                let loading = rating_loading(limits.cir_loading_rate, factor, base);
                CirPremium::Quoted(CirQuote {
                    rate,
                    base,
                    rating_factor: factor,
                    loading,
                    total: base + loading,
                })
            }
            None => CirPremium::Declined {
                reason: CirDeclineReason::NoRateForAge { age },
            },
        }
    };

    Premiums {
        life: Some(life),
        accident: Some(accident),
        cir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicant::{Occupation, ParentHealthStatus, SourceOfIncome};
    use crate::underwriting::rating::classify;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn applicant(occupations: &[Occupation]) -> Applicant {
        let mut builder = Applicant::builder()
            .date_of_birth(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap())
            .height_cm(175.0)
            .weight_kg(80.0)
            .yearly_income(2_000_000.0)
            .source_of_income(SourceOfIncome::Business)
            .covers(5_000_000.0, 1_000_000.0, 1_000_000.0)
            .parent_health_status(ParentHealthStatus::BothBelow65);
        for occupation in occupations {
            builder = builder.occupation(*occupation);
        }
        builder.build().unwrap()
    }

    fn quote(applicant: &Applicant, age: i32, emr: f64) -> Premiums {
        let rulebook = Rulebook::standard();
        let ratings = classify(emr, &rulebook.rating);
        calculate(applicant, age, emr, &ratings, &rulebook)
    }

    #[test]
    fn test_loaded_quote_with_occupation() {
        let premiums = quote(&applicant(&[Occupation::Pilot]), 45, 57.5);

        let life = premiums.life.as_ref().unwrap();
        assert_abs_diff_eq!(life.base, 22_500.0);
        assert_eq!(life.rating_factor, 2);
        assert_abs_diff_eq!(life.loading, 11_250.0);
        assert_abs_diff_eq!(life.occupational, 30_000.0);
        assert_abs_diff_eq!(life.total, 63_750.0);

        let accident = premiums.accident.as_ref().unwrap();
        assert_abs_diff_eq!(accident.base, 1_000.0);
        assert_abs_diff_eq!(accident.occupational, 6_000.0);
        assert_abs_diff_eq!(accident.total, 7_000.0);

        match &premiums.cir {
            CirPremium::Quoted(cir) => {
                assert_abs_diff_eq!(cir.base, 12_000.0);
                assert_eq!(cir.rating_factor, 2);
                assert_abs_diff_eq!(cir.loading, 7_200.0);
                assert_abs_diff_eq!(cir.total, 19_200.0);
            }
            other => panic!("expected quoted CIR, got {:?}", other),
        }

        assert_abs_diff_eq!(premiums.grand_total(), 63_750.0 + 7_000.0 + 19_200.0);
    }

    #[test]
    fn test_standard_case_has_no_loading() {
        let premiums = quote(&applicant(&[]), 30, -10.0);
        let life = premiums.life.unwrap();
        assert_eq!(life.rating_factor, 0);
        assert_eq!(life.loading, 0.0);
        assert_abs_diff_eq!(life.total, 7_500.0);
        assert_abs_diff_eq!(premiums.cir.total(), 3_000.0);
    }

    #[test]
    fn test_occupations_count_once_each() {
        let premiums = quote(&applicant(&[Occupation::Driver, Occupation::Driver, Occupation::OilGas]), 30, 0.0);
        let life = premiums.life.unwrap();
        assert_eq!(life.occupational_rate, 5.0);
        assert_abs_diff_eq!(life.occupational, 25_000.0);
    }

    #[test]
    fn test_cir_declined_above_age_limit() {
        let premiums = quote(&applicant(&[]), 62, 30.0);
        assert!(premiums.life.is_some());
        assert_eq!(
            premiums.cir.decline_reason(),
            Some(CirDeclineReason::AboveAgeLimit { age: 62, limit: 60 })
        );
        assert_eq!(
            premiums.cir.decline_reason().unwrap().to_string(),
            "CIR not available above age 60"
        );
        assert_eq!(premiums.cir.total(), 0.0);
    }

    #[test]
    fn test_cir_age_decline_outside_premium_bands() {
        let premiums = quote(&applicant(&[]), 67, 10.0);
        assert!(premiums.life.is_none());
        assert!(premiums.accident.is_none());
        assert!(matches!(
            premiums.cir.decline_reason(),
            Some(CirDeclineReason::AboveAgeLimit { .. })
        ));
        assert_eq!(premiums.grand_total(), 0.0);
    }

    #[test]
    fn test_cir_declined_above_emr_ceiling() {
        let premiums = quote(&applicant(&[]), 40, 100.5);
        assert_eq!(
            premiums.cir.decline_reason().unwrap().to_string(),
            "EMR 100.5 exceeds CIR max of 100"
        );
        // Life is still priced
        assert_eq!(premiums.life.unwrap().rating_factor, 4);
    }

    #[test]
    fn test_cir_at_emr_ceiling_is_quoted() {
        let premiums = quote(&applicant(&[]), 40, 100.0);
        match premiums.cir {
            CirPremium::Quoted(cir) => assert_eq!(cir.rating_factor, 4),
            other => panic!("expected quoted CIR, got {:?}", other),
        }
    }

    #[test]
    fn test_underage_is_not_quoted() {
        let premiums = quote(&applicant(&[]), 17, 0.0);
        assert!(premiums.life.is_none());
        assert_eq!(premiums.cir, CirPremium::NotQuoted);
        assert!(!premiums.cir.is_declined());
    }

    #[test]
    fn test_declined_verdict_still_priced() {
        let premiums = quote(&applicant(&[]), 40, 600.0);
        let life = premiums.life.unwrap();
        // no Life class above 550
        assert_eq!(life.rating_factor, 0);
        assert_abs_diff_eq!(life.total, 15_000.0);
        assert!(premiums.cir.is_declined());
    }

    #[test]
    fn test_age_limit_outranks_emr_ceiling() {
        let premiums = quote(&applicant(&[]), 62, 150.0);
        assert_eq!(
            premiums.cir.decline_reason(),
            Some(CirDeclineReason::AboveAgeLimit { age: 62, limit: 60 })
        );
    }

    #[test]
    fn test_cir_declined_without_rate_for_age() {
        let mut rulebook = Rulebook::standard();
        rulebook.limits.cir_max_age = 65;
        let ratings = classify(30.0, &rulebook.rating);
        let premiums = calculate(&applicant(&[]), 62, 30.0, &ratings, &rulebook);

        assert_eq!(
            premiums.cir.decline_reason(),
            Some(CirDeclineReason::NoRateForAge { age: 62 })
        );
        assert_eq!(
            premiums.cir.decline_reason().unwrap().to_string(),
            "No CIR rate available for age 62"
        );
        assert!(premiums.life.is_some());
    }

    #[test]
    fn test_huge_cover_without_rating_has_no_nan() {
        let applicant = Applicant::builder()
            .date_of_birth(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap())
            .height_cm(175.0)
            .weight_kg(80.0)
            .yearly_income(2_000_000.0)
            .source_of_income(SourceOfIncome::Business)
            .covers(1e308, 0.0, 0.0)
            .parent_health_status(ParentHealthStatus::BothAbove65)
            .occupation(Occupation::Pilot)
            .build()
            .unwrap();
        let premiums = quote(&applicant, 30, 0.0);
        let life = premiums.life.as_ref().unwrap();
        assert_eq!(life.loading, 0.0);
        assert!(!life.total.is_nan());
        assert!(!premiums.grand_total().is_nan());
    }
}

//! Premium rates, occupational loadings and financial limits

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::bands::{Band, BandTable};
use crate::applicant::Occupation;

/// Per-mille premium rates for one age band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumRates {
    pub life: f64,
    pub accident: f64,
    /// `None` where the rider is not offered at this age
    pub cir: Option<f64>,
}

impl PremiumRates {
    pub fn new(life: f64, accident: f64, cir: Option<f64>) -> Self {
        Self { life, accident, cir }
    }
}

/// Tables used by the premium calculator and the financial limit check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumTables {
    /// Per-mille rates by attained age
    pub rates_by_age: BandTable<i32, PremiumRates>,

    /// Per-mille extra rate for each risky occupation
    pub occupation_loading: BTreeMap<Occupation, f64>,

    /// Maximum life cover as a multiple of yearly income, by age
    pub financial_multiples: BandTable<i32, f64>,

    /// Multiple used when no age band matches
    pub default_financial_multiple: f64,
}

impl PremiumTables {
    pub fn standard() -> Self {
        Self {
            rates_by_age: BandTable::new(vec![
                Band::new(18, 35, PremiumRates::new(1.5, 1.0, Some(3.0))),
                Band::new(36, 40, PremiumRates::new(3.0, 1.0, Some(6.0))),
                Band::new(41, 45, PremiumRates::new(4.5, 1.0, Some(12.0))),
                Band::new(46, 50, PremiumRates::new(6.0, 1.0, Some(15.0))),
                Band::new(51, 55, PremiumRates::new(7.5, 1.5, Some(20.0))),
                Band::new(56, 60, PremiumRates::new(9.0, 1.5, Some(25.0))),
                Band::new(61, 65, PremiumRates::new(10.5, 1.5, None)),
            ]),
            occupation_loading: BTreeMap::from([
                (Occupation::Athlete, 2.0),
                (Occupation::Pilot, 6.0),
                (Occupation::Driver, 2.0),
                (Occupation::MerchantNavy, 3.0),
                (Occupation::OilGas, 3.0),
            ]),
            financial_multiples: BandTable::new(vec![
                Band::new(0, 35, 25.0),
                Band::new(36, 45, 20.0),
                Band::new(46, 50, 15.0),
                Band::new(51, 55, 15.0),
                Band::new(56, 999, 10.0),
            ]),
            default_financial_multiple: 10.0,
        }
    }

    /// Rates for an attained age, if the age is quotable
    pub fn rates_for_age(&self, age: i32) -> Option<&PremiumRates> {
        self.rates_by_age.lookup(age)
    }

    /// Summed per-mille extra rate; each occupation counts once
    pub fn occupational_rate(&self, occupations: &BTreeSet<Occupation>) -> f64 {
        occupations
            .iter()
            .filter_map(|o| self.occupation_loading.get(o))
            .sum()
    }

    /// Income multiple capping life cover at this age
    pub fn financial_multiple(&self, age: i32) -> f64 {
        self.financial_multiples
            .lookup(age)
            .copied()
            .unwrap_or(self.default_financial_multiple)
    }
}

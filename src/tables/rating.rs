//! Life and CIR rating bands over EMR

use serde::{Deserialize, Serialize};

use super::bands::{Band, BandTable};

/// A labelled rating class with its multiplicative loading factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingClass {
    pub label: String,
    pub factor: u32,
}

impl RatingClass {
    pub fn new(label: impl Into<String>, factor: u32) -> Self {
        Self {
            label: label.into(),
            factor,
        }
    }
}

/// Rating bands for Life and for the critical illness rider
///
/// Life bands deliberately leave gaps (36-39, 61-64, ...): an EMR in a gap has
/// no Life class. CIR bands stop at 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingTables {
    pub life: BandTable<f64, RatingClass>,
    pub cir: BandTable<f64, RatingClass>,
}

impl RatingTables {
    pub fn standard() -> Self {
        Self {
            life: BandTable::new(vec![
                Band::new(20.0, 35.0, RatingClass::new("I", 1)),
                Band::new(40.0, 60.0, RatingClass::new("II", 2)),
                Band::new(65.0, 85.0, RatingClass::new("III", 3)),
                Band::new(90.0, 120.0, RatingClass::new("IV", 4)),
                Band::new(125.0, 170.0, RatingClass::new("V", 6)),
                Band::new(175.0, 225.0, RatingClass::new("VI", 8)),
                Band::new(230.0, 275.0, RatingClass::new("VII", 10)),
                Band::new(280.0, 350.0, RatingClass::new("VIII", 12)),
                Band::new(355.0, 450.0, RatingClass::new("IX", 16)),
                Band::new(455.0, 550.0, RatingClass::new("X", 20)),
            ]),
            cir: BandTable::new(vec![
                Band::new(0.0, 20.0, RatingClass::new("Std", 0)),
                Band::new(21.0, 35.0, RatingClass::new("I", 1)),
                Band::new(36.0, 60.0, RatingClass::new("II", 2)),
                Band::new(61.0, 75.0, RatingClass::new("III", 3)),
                Band::new(76.0, 100.0, RatingClass::new("IV", 4)),
            ]),
        }
    }
}

//! Rating classifier: EMR to Life and CIR rating classes

use serde::Serialize;

use crate::tables::{RatingClass, RatingTables};

/// Life and CIR classes for one EMR score, each absent when no band matches
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ratings {
    pub life: Option<RatingClass>,
    pub cir: Option<RatingClass>,
}

impl Ratings {
    /// Life loading factor; 0 when the EMR has no Life class
    pub fn life_factor(&self) -> u32 {
        self.life.as_ref().map_or(0, |c| c.factor)
    }

    /// CIR loading factor; 0 when the EMR has no CIR class
    pub fn cir_factor(&self) -> u32 {
        self.cir.as_ref().map_or(0, |c| c.factor)
    }
}

/// Classify an EMR against both band tables independently
pub fn classify(emr: f64, tables: &RatingTables) -> Ratings {
    Ratings {
        life: tables.life.lookup(emr).cloned(),
        cir: tables.cir.lookup(emr).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_life_bands() {
        let ratings = classify(-10.0, &RatingTables::standard());
        assert!(ratings.life.is_none());
        assert!(ratings.cir.is_none());
        assert_eq!(ratings.life_factor(), 0);
    }

    #[test]
    fn test_standard_cir_is_not_absent() {
        let ratings = classify(10.0, &RatingTables::standard());
        assert!(ratings.life.is_none());
        let cir = ratings.cir.expect("EMR 10 has a CIR class");
        assert_eq!(cir.label, "Std");
        assert_eq!(cir.factor, 0);
    }

    #[test]
    fn test_class_two() {
        let ratings = classify(57.5, &RatingTables::standard());
        assert_eq!(ratings.life, Some(RatingClass::new("II", 2)));
        assert_eq!(ratings.cir, Some(RatingClass::new("II", 2)));
        assert_eq!(ratings.life_factor(), 2);
        assert_eq!(ratings.cir_factor(), 2);
    }

    #[test]
    fn test_life_gap_with_cir_class() {
        let ratings = classify(37.5, &RatingTables::standard());
        assert!(ratings.life.is_none());
        assert_eq!(ratings.cir_factor(), 2);
    }

    #[test]
    fn test_above_cir_ceiling() {
        let ratings = classify(150.0, &RatingTables::standard());
        assert_eq!(ratings.life_factor(), 6);
        assert!(ratings.cir.is_none());
    }
}

//! Point tables feeding the Extra Mortality Rating
//!
//! Points are signed: family history can reduce the score. The standard values
//! below are the reference rulebook; a custom rulebook may replace any of them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::bands::{Band, BandTable, SurchargeTable};
use crate::applicant::{Habit, HabitFrequency, HealthCondition, ParentHealthStatus, Severity};

/// Tables used by the EMR aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmrTables {
    /// BMI bands with integer bounds
    pub bmi_points: BandTable<f64, f64>,

    /// Exact adjustment by parent survival status
    pub family_history: BTreeMap<ParentHealthStatus, f64>,

    /// Points for severity levels 1 to 4, per condition
    pub condition_points: BTreeMap<HealthCondition, [f64; 4]>,

    /// Extra points when several conditions are present together
    pub comorbidity: SurchargeTable,

    /// Points for occasionally / moderate / high, per habit
    pub habit_points: BTreeMap<Habit, [f64; 3]>,

    /// Extra points when several habits are practised together
    pub habit_coexistence: SurchargeTable,
}

impl EmrTables {
    /// Reference point tables
    pub fn standard() -> Self {
        Self {
            bmi_points: BandTable::new(vec![
                Band::new(0.0, 18.0, 10.0),
                Band::new(19.0, 23.0, 0.0),
                Band::new(24.0, 28.0, 5.0),
                Band::new(29.0, 33.0, 10.0),
                Band::new(34.0, 38.0, 15.0),
                Band::new(39.0, 9999.0, 20.0),
            ]),
            family_history: BTreeMap::from([
                (ParentHealthStatus::BothAbove65, -10.0),
                (ParentHealthStatus::OneAbove65, -5.0),
                (ParentHealthStatus::BothBelow65, 10.0),
            ]),
            condition_points: BTreeMap::from([
                (HealthCondition::Thyroid, [2.5, 5.0, 7.5, 10.0]),
                (HealthCondition::Asthma, [5.0, 7.5, 10.0, 12.5]),
                (HealthCondition::Hypertension, [5.0, 7.5, 10.0, 15.0]),
                (HealthCondition::Diabetes, [10.0, 15.0, 20.0, 25.0]),
                (HealthCondition::GutDisorder, [5.0, 10.0, 15.0, 20.0]),
            ]),
            comorbidity: SurchargeTable::new(vec![(2, 20.0), (3, 40.0)]),
            habit_points: BTreeMap::from([
                (Habit::Smoking, [5.0, 10.0, 15.0]),
                (Habit::Alcohol, [5.0, 10.0, 15.0]),
                (Habit::Tobacco, [5.0, 10.0, 15.0]),
            ]),
            habit_coexistence: SurchargeTable::new(vec![(2, 20.0), (3, 40.0)]),
        }
    }

    /// Points for a BMI value
    ///
    /// BMI is fractional but the bands have integer bounds, so values between
    /// two bands (e.g. 23.5) take the next band up: a BMI belongs to the first
    /// band whose upper bound it does not exceed. This differs from the
    /// reference rules, where every gap value fell through to 20 points.
    pub fn bmi_points(&self, bmi: f64) -> f64 {
        self.bmi_points.lookup_ceiling(bmi).copied().unwrap_or(0.0)
    }

    /// Family-history adjustment; a status missing from the table adds nothing
    pub fn family_adjustment(&self, status: ParentHealthStatus) -> f64 {
        self.family_history.get(&status).copied().unwrap_or(0.0)
    }

    /// Points for one condition at a given severity (0 when absent)
    pub fn condition_points(&self, condition: HealthCondition, severity: Severity) -> f64 {
        if !severity.is_active() {
            return 0.0;
        }
        let idx = usize::from(severity.level()) - 1;
        self.condition_points
            .get(&condition)
            .and_then(|points| points.get(idx))
            .copied()
            .unwrap_or(0.0)
    }

    /// Points for one habit at a given frequency (0 when not practised)
    pub fn habit_points(&self, habit: Habit, frequency: HabitFrequency) -> f64 {
        let idx = match frequency {
            HabitFrequency::Never => return 0.0,
            HabitFrequency::Occasionally => 0,
            HabitFrequency::Moderate => 1,
            HabitFrequency::High => 2,
        };
        self.habit_points
            .get(&habit)
            .map(|points| points[idx])
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_points_inside_bands() {
        let tables = EmrTables::standard();
        assert_eq!(tables.bmi_points(17.0), 10.0);
        assert_eq!(tables.bmi_points(22.0), 0.0);
        assert_eq!(tables.bmi_points(26.0), 5.0);
        assert_eq!(tables.bmi_points(33.0), 10.0);
        assert_eq!(tables.bmi_points(38.0), 15.0);
        assert_eq!(tables.bmi_points(45.2), 20.0);
    }

    #[test]
    fn test_bmi_points_between_integer_bounds() {
        let tables = EmrTables::standard();
        // 18.x sits between [0,18] and [19,23]
        assert_eq!(tables.bmi_points(18.0), 10.0);
        assert_eq!(tables.bmi_points(18.5), 0.0);
        // 23.5 sits between [19,23] and [24,28]
        assert_eq!(tables.bmi_points(23.0), 0.0);
        assert_eq!(tables.bmi_points(23.5), 5.0);
        assert_eq!(tables.bmi_points(28.1), 10.0);
        assert_eq!(tables.bmi_points(38.4), 20.0);
    }

    #[test]
    fn test_family_adjustment() {
        let tables = EmrTables::standard();
        assert_eq!(tables.family_adjustment(ParentHealthStatus::BothAbove65), -10.0);
        assert_eq!(tables.family_adjustment(ParentHealthStatus::OneAbove65), -5.0);
        assert_eq!(tables.family_adjustment(ParentHealthStatus::BothBelow65), 10.0);
    }

    #[test]
    fn test_condition_points_by_severity() {
        let tables = EmrTables::standard();
        let sev = |l| Severity::new(l).unwrap();
        assert_eq!(tables.condition_points(HealthCondition::Diabetes, sev(0)), 0.0);
        assert_eq!(tables.condition_points(HealthCondition::Diabetes, sev(1)), 10.0);
        assert_eq!(tables.condition_points(HealthCondition::Hypertension, sev(2)), 7.5);
        assert_eq!(tables.condition_points(HealthCondition::Thyroid, sev(4)), 10.0);
    }

    #[test]
    fn test_condition_points_ascend_with_severity() {
        let tables = EmrTables::standard();
        for condition in HealthCondition::ALL {
            let points: Vec<f64> = (0..=4)
                .map(|l| tables.condition_points(condition, Severity::new(l).unwrap()))
                .collect();
            assert!(points.windows(2).all(|w| w[0] < w[1]), "{:?}: {:?}", condition, points);
        }
    }

    #[test]
    fn test_habit_points() {
        let tables = EmrTables::standard();
        assert_eq!(tables.habit_points(Habit::Smoking, HabitFrequency::Never), 0.0);
        assert_eq!(tables.habit_points(Habit::Smoking, HabitFrequency::Occasionally), 5.0);
        assert_eq!(tables.habit_points(Habit::Alcohol, HabitFrequency::Moderate), 10.0);
        assert_eq!(tables.habit_points(Habit::Tobacco, HabitFrequency::High), 15.0);
    }
}

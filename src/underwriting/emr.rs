//! Extra Mortality Rating aggregation
//!
//! EMR = BMI points + family-history adjustment + condition points (with the
//! comorbidity surcharge) + habit points (with the co-existence surcharge).
//! Nothing is rounded or clamped here; the verdict and flags handle the
//! extremes.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::applicant::{Applicant, Habit, HealthCondition};
use crate::tables::EmrTables;

/// Component contributions making up an EMR score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmrBreakdown {
    pub bmi_points: f64,
    pub family_adjustment: f64,

    /// Points per declared condition (0 for severity 0)
    pub condition_points: BTreeMap<HealthCondition, f64>,
    /// Conditions at severity 1 or above
    pub active_conditions: usize,
    pub comorbidity_surcharge: f64,
    /// Condition points plus comorbidity surcharge
    pub health_total: f64,

    /// Points per declared habit (0 for `none`)
    pub habit_points: BTreeMap<Habit, f64>,
    /// Habits scoring above zero
    pub active_habits: usize,
    pub habit_surcharge: f64,
    /// Habit points plus co-existence surcharge
    pub habit_total: f64,
}

impl EmrBreakdown {
    /// Total EMR, the exact sum of every contribution
    pub fn total(&self) -> f64 {
        self.bmi_points + self.family_adjustment + self.health_total + self.habit_total
    }
}

/// Combine every EMR contribution for one applicant
pub fn aggregate(applicant: &Applicant, bmi: f64, tables: &EmrTables) -> EmrBreakdown {
    let bmi_points = tables.bmi_points(bmi);
    let family_adjustment = tables.family_adjustment(applicant.parent_health_status);

    let condition_points: BTreeMap<HealthCondition, f64> = applicant
        .health_conditions
        .iter()
        .map(|(condition, severity)| (*condition, tables.condition_points(*condition, *severity)))
        .collect();
    let active_conditions = applicant.active_conditions().count();
    let comorbidity_surcharge = tables.comorbidity.surcharge(count_u32(active_conditions));
    let health_total = condition_points.values().sum::<f64>() + comorbidity_surcharge;

    let habit_points: BTreeMap<Habit, f64> = applicant
        .habits
        .iter()
        .map(|(habit, frequency)| (*habit, tables.habit_points(*habit, *frequency)))
        .collect();
    let active_habits = habit_points.values().filter(|p| **p > 0.0).count();
    let habit_surcharge = tables.habit_coexistence.surcharge(count_u32(active_habits));
    let habit_total = habit_points.values().sum::<f64>() + habit_surcharge;

    EmrBreakdown {
        bmi_points,
        family_adjustment,
        condition_points,
        active_conditions,
        comorbidity_surcharge,
        health_total,
        habit_points,
        active_habits,
        habit_surcharge,
        habit_total,
    }
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

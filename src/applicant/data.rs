//! Applicant data structures matching the proposal form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{ApplicantError, ApplicantResult};

/// Gender as declared on the proposal form (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Declared source of income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOfIncome {
    Salary,
    Business,
    Profession,
    Other,
}

/// Survival status of the applicant's parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParentHealthStatus {
    /// Both parents alive above age 65
    #[serde(rename = "both_above_65")]
    BothAbove65,
    /// One parent alive above age 65
    #[serde(rename = "one_above_65")]
    OneAbove65,
    /// Both parents below age 65
    #[serde(rename = "both_below_65")]
    BothBelow65,
}

impl ParentHealthStatus {
    pub const ALL: [ParentHealthStatus; 3] = [
        ParentHealthStatus::BothAbove65,
        ParentHealthStatus::OneAbove65,
        ParentHealthStatus::BothBelow65,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParentHealthStatus::BothAbove65 => "both_above_65",
            ParentHealthStatus::OneAbove65 => "one_above_65",
            ParentHealthStatus::BothBelow65 => "both_below_65",
        }
    }
}

/// Health conditions rated by the rulebook
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCondition {
    Thyroid,
    Asthma,
    Hypertension,
    Diabetes,
    GutDisorder,
}

impl HealthCondition {
    pub const ALL: [HealthCondition; 5] = [
        HealthCondition::Thyroid,
        HealthCondition::Asthma,
        HealthCondition::Hypertension,
        HealthCondition::Diabetes,
        HealthCondition::GutDisorder,
    ];

    /// Key used in records and CSV headers
    pub fn key(&self) -> &'static str {
        match self {
            HealthCondition::Thyroid => "thyroid",
            HealthCondition::Asthma => "asthma",
            HealthCondition::Hypertension => "hypertension",
            HealthCondition::Diabetes => "diabetes",
            HealthCondition::GutDisorder => "gut_disorder",
        }
    }

    /// Display name used in flags and reports
    pub fn label(&self) -> &'static str {
        match self {
            HealthCondition::Thyroid => "Thyroid",
            HealthCondition::Asthma => "Asthma",
            HealthCondition::Hypertension => "Hypertension",
            HealthCondition::Diabetes => "Diabetes Mellitus",
            HealthCondition::GutDisorder => "Gut Disorder",
        }
    }
}

impl fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Condition severity level, 0 (absent) to 4 (most severe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const ABSENT: Severity = Severity(0);
    pub const MAX: u8 = 4;

    /// Returns `None` for levels above 4
    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX).then_some(Severity(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// A condition counts towards comorbidity only when present
    pub fn is_active(&self) -> bool {
        self.0 > 0
    }
}

/// Lifestyle habits rated by the rulebook
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Habit {
    Smoking,
    Alcohol,
    Tobacco,
}

impl Habit {
    pub const ALL: [Habit; 3] = [Habit::Smoking, Habit::Alcohol, Habit::Tobacco];

    pub fn key(&self) -> &'static str {
        match self {
            Habit::Smoking => "smoking",
            Habit::Alcohol => "alcohol",
            Habit::Tobacco => "tobacco",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Habit::Smoking => "Smoking",
            Habit::Alcohol => "Alcohol",
            Habit::Tobacco => "Tobacco",
        }
    }
}

/// How often a habit is practised
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    #[default]
    #[serde(rename = "none")]
    Never,
    Occasionally,
    Moderate,
    High,
}

impl HabitFrequency {
    pub fn is_practised(&self) -> bool {
        !matches!(self, HabitFrequency::Never)
    }
}

/// Occupations carrying a per-mille extra premium
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Athlete,
    Pilot,
    Driver,
    MerchantNavy,
    OilGas,
}

impl Occupation {
    pub const ALL: [Occupation; 5] = [
        Occupation::Athlete,
        Occupation::Pilot,
        Occupation::Driver,
        Occupation::MerchantNavy,
        Occupation::OilGas,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Occupation::Athlete => "athlete",
            Occupation::Pilot => "pilot",
            Occupation::Driver => "driver",
            Occupation::MerchantNavy => "merchant_navy",
            Occupation::OilGas => "oil_gas",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Occupation::Athlete => "Professional Athlete",
            Occupation::Pilot => "Commercial Pilot",
            Occupation::Driver => "Public Carrier Driver",
            Occupation::MerchantNavy => "Merchant Navy",
            Occupation::OilGas => "Oil & Gas Onshore",
        }
    }
}

/// A validated applicant record, immutable for one underwriting computation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Applicant {
    /// Applicant name (informational)
    pub name: Option<String>,

    /// Declared gender (informational)
    pub gender: Option<Gender>,

    pub date_of_birth: NaiveDate,
    pub height_cm: f64,
    pub weight_kg: f64,

    /// Annual income, used for the financial underwriting limit
    pub yearly_income: f64,
    pub source_of_income: SourceOfIncome,

    /// Life sum insured
    pub base_cover: f64,
    /// Critical illness rider sum insured
    pub cir_cover: f64,
    /// Accident sum insured
    pub accident_cover: f64,

    pub parent_health_status: ParentHealthStatus,

    /// Declared condition severities; missing conditions are absent
    pub health_conditions: BTreeMap<HealthCondition, Severity>,

    /// Declared habit frequencies; missing habits are `none`
    pub habits: BTreeMap<Habit, HabitFrequency>,

    pub risky_occupations: BTreeSet<Occupation>,
}

impl Applicant {
    /// Start building an applicant
    pub fn builder() -> ApplicantBuilder {
        ApplicantBuilder::new()
    }

    /// Severity declared for a condition (absent if not declared)
    pub fn severity(&self, condition: HealthCondition) -> Severity {
        self.health_conditions
            .get(&condition)
            .copied()
            .unwrap_or(Severity::ABSENT)
    }

    /// Frequency declared for a habit (`none` if not declared)
    pub fn habit(&self, habit: Habit) -> HabitFrequency {
        self.habits.get(&habit).copied().unwrap_or_default()
    }

    /// Conditions with severity of at least 1
    pub fn active_conditions(&self) -> impl Iterator<Item = (HealthCondition, Severity)> + '_ {
        self.health_conditions
            .iter()
            .filter(|(_, severity)| severity.is_active())
            .map(|(condition, severity)| (*condition, *severity))
    }

    /// Check the numeric fields can be banded
    pub fn validate(&self) -> ApplicantResult<()> {
        check_positive("height_cm", self.height_cm)?;
        check_positive("weight_kg", self.weight_kg)?;
        check_non_negative("yearly_income", self.yearly_income)?;
        check_non_negative("base_cover", self.base_cover)?;
        check_non_negative("cir_cover", self.cir_cover)?;
        check_non_negative("accident_cover", self.accident_cover)?;
        Ok(())
    }
}

fn check_positive(field: &'static str, value: f64) -> ApplicantResult<()> {
    if !value.is_finite() {
        return Err(ApplicantError::invalid(field, format!("{} is not a finite number", value)));
    }
    if value <= 0.0 {
        return Err(ApplicantError::invalid(field, "must be greater than zero"));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> ApplicantResult<()> {
    if !value.is_finite() {
        return Err(ApplicantError::invalid(field, format!("{} is not a finite number", value)));
    }
    if value < 0.0 {
        return Err(ApplicantError::invalid(field, "must not be negative"));
    }
    Ok(())
}

/// Builder for [`Applicant`]
///
/// Every field the rules read is required; `build` reports the first one
/// missing instead of substituting a default.
///
/// # Example
///
/// ```rust,ignore
/// let applicant = Applicant::builder()
///     .date_of_birth(NaiveDate::from_ymd_opt(1990, 4, 12).unwrap())
///     .height_cm(172.0)
///     .weight_kg(68.0)
///     .yearly_income(1_200_000.0)
///     .source_of_income(SourceOfIncome::Salary)
///     .covers(10_000_000.0, 0.0, 0.0)
///     .parent_health_status(ParentHealthStatus::BothAbove65)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApplicantBuilder {
    name: Option<String>,
    gender: Option<Gender>,
    date_of_birth: Option<NaiveDate>,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    yearly_income: Option<f64>,
    source_of_income: Option<SourceOfIncome>,
    base_cover: Option<f64>,
    cir_cover: Option<f64>,
    accident_cover: Option<f64>,
    parent_health_status: Option<ParentHealthStatus>,
    health_conditions: BTreeMap<HealthCondition, Severity>,
    habits: BTreeMap<Habit, HabitFrequency>,
    risky_occupations: BTreeSet<Occupation>,
}

impl ApplicantBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn date_of_birth(mut self, dob: NaiveDate) -> Self {
        self.date_of_birth = Some(dob);
        self
    }

    pub fn height_cm(mut self, height_cm: f64) -> Self {
        self.height_cm = Some(height_cm);
        self
    }

    pub fn weight_kg(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    pub fn yearly_income(mut self, income: f64) -> Self {
        self.yearly_income = Some(income);
        self
    }

    pub fn source_of_income(mut self, source: SourceOfIncome) -> Self {
        self.source_of_income = Some(source);
        self
    }

    pub fn base_cover(mut self, amount: f64) -> Self {
        self.base_cover = Some(amount);
        self
    }

    pub fn cir_cover(mut self, amount: f64) -> Self {
        self.cir_cover = Some(amount);
        self
    }

    pub fn accident_cover(mut self, amount: f64) -> Self {
        self.accident_cover = Some(amount);
        self
    }

    /// Sets life, CIR and accident sums insured in one call
    pub fn covers(self, base: f64, cir: f64, accident: f64) -> Self {
        self.base_cover(base).cir_cover(cir).accident_cover(accident)
    }

    pub fn parent_health_status(mut self, status: ParentHealthStatus) -> Self {
        self.parent_health_status = Some(status);
        self
    }

    pub fn condition(mut self, condition: HealthCondition, severity: Severity) -> Self {
        self.health_conditions.insert(condition, severity);
        self
    }

    pub fn habit(mut self, habit: Habit, frequency: HabitFrequency) -> Self {
        self.habits.insert(habit, frequency);
        self
    }

    /// Adds a risky occupation; repeats are ignored
    pub fn occupation(mut self, occupation: Occupation) -> Self {
        self.risky_occupations.insert(occupation);
        self
    }

    pub fn build(self) -> ApplicantResult<Applicant> {
        let applicant = Applicant {
            name: self.name,
            gender: self.gender,
            date_of_birth: self
                .date_of_birth
                .ok_or(ApplicantError::MissingField("dob"))?,
            height_cm: self.height_cm.ok_or(ApplicantError::MissingField("height_cm"))?,
            weight_kg: self.weight_kg.ok_or(ApplicantError::MissingField("weight_kg"))?,
            yearly_income: self
                .yearly_income
                .ok_or(ApplicantError::MissingField("yearly_income"))?,
            source_of_income: self
                .source_of_income
                .ok_or(ApplicantError::MissingField("source_of_income"))?,
            base_cover: self.base_cover.ok_or(ApplicantError::MissingField("base_cover"))?,
            cir_cover: self.cir_cover.ok_or(ApplicantError::MissingField("cir_cover"))?,
            accident_cover: self
                .accident_cover
                .ok_or(ApplicantError::MissingField("accident_cover"))?,
            parent_health_status: self
                .parent_health_status
                .ok_or(ApplicantError::MissingField("parent_health_status"))?,
            health_conditions: self.health_conditions,
            habits: self.habits,
            risky_occupations: self.risky_occupations,
        };
        applicant.validate()?;
        Ok(applicant)
    }
}

//! Batch underwriting over a shared rulebook
//!
//! The rulebook is built once and only read, so applicants are underwritten
//! in parallel without any coordination.

use chrono::NaiveDate;
use log::info;
use rayon::prelude::*;
use std::time::Instant;

use crate::applicant::Applicant;
use crate::tables::Rulebook;
use crate::underwriting::{QuoteSummary, UnderwritingEngine, UnderwritingResult, Verdict};

/// Underwrites many applicants against one rulebook and reference date
///
/// # Example
/// ```ignore
/// let runner = BatchUnderwriter::new(Rulebook::standard(), as_of);
/// let applicants = load_applicants_csv("applicants.csv")?;
/// let results = runner.run_batch(&applicants);
/// ```
#[derive(Debug, Clone)]
pub struct BatchUnderwriter {
    engine: UnderwritingEngine,
    as_of: NaiveDate,
}

impl BatchUnderwriter {
    pub fn new(rulebook: Rulebook, as_of: NaiveDate) -> Self {
        Self {
            engine: UnderwritingEngine::new(rulebook),
            as_of,
        }
    }

    /// Runner over the reference tables
    pub fn standard(as_of: NaiveDate) -> Self {
        Self::new(Rulebook::standard(), as_of)
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn engine(&self) -> &UnderwritingEngine {
        &self.engine
    }

    /// Underwrite a single applicant
    pub fn run(&self, applicant: &Applicant) -> UnderwritingResult {
        self.engine.underwrite(applicant, self.as_of)
    }

    /// Underwrite every applicant in parallel; results keep input order
    pub fn run_batch(&self, applicants: &[Applicant]) -> Vec<UnderwritingResult> {
        let start = Instant::now();
        let results: Vec<UnderwritingResult> = applicants.par_iter().map(|a| self.run(a)).collect();

        let declined = results
            .iter()
            .filter(|r| r.verdict == Verdict::PolicyDeclined)
            .count();
        info!(
            "Underwrote {} applicants in {:?} ({} declined)",
            results.len(),
            start.elapsed(),
            declined
        );
        results
    }

    /// Underwrite in parallel and flatten each result into a named summary row
    pub fn summarize(&self, applicants: &[Applicant]) -> Vec<QuoteSummary> {
        self.run_batch(applicants)
            .iter()
            .zip(applicants)
            .map(|(result, applicant)| QuoteSummary {
                name: applicant.name.clone(),
                ..result.summary()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicant::{HealthCondition, ParentHealthStatus, Severity, SourceOfIncome};

    fn applicant(name: &str, birth_year: i32, diabetes: u8) -> Applicant {
        Applicant::builder()
            .name(name)
            .date_of_birth(NaiveDate::from_ymd_opt(birth_year, 2, 1).unwrap())
            .height_cm(170.0)
            .weight_kg(68.0)
            .yearly_income(1_500_000.0)
            .source_of_income(SourceOfIncome::Salary)
            .covers(5_000_000.0, 1_000_000.0, 1_000_000.0)
            .parent_health_status(ParentHealthStatus::OneAbove65)
            .condition(HealthCondition::Diabetes, Severity::new(diabetes).unwrap())
            .build()
            .unwrap()
    }

    fn runner() -> BatchUnderwriter {
        BatchUnderwriter::standard(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    #[test]
    fn test_batch_matches_single_runs_in_order() {
        let runner = runner();
        let applicants: Vec<Applicant> = (0..40)
            .map(|i| applicant(&format!("A{}", i), 1950 + i, (i % 5) as u8))
            .collect();

        let batch = runner.run_batch(&applicants);
        assert_eq!(batch.len(), applicants.len());
        for (result, applicant) in batch.iter().zip(&applicants) {
            assert_eq!(result, &runner.run(applicant));
        }
    }

    #[test]
    fn test_summaries_carry_names() {
        let runner = runner();
        let applicants = vec![applicant("Kiran", 1990, 0), applicant("Dev", 1950, 2)];
        let rows = runner.summarize(&applicants);

        assert_eq!(rows[0].name.as_deref(), Some("Kiran"));
        assert_eq!(rows[0].verdict, Verdict::StandardAcceptance);
        assert_eq!(rows[1].name.as_deref(), Some("Dev"));
        assert_eq!(rows[1].verdict, Verdict::PolicyDeclined);
        assert_eq!(rows[1].decline_flags, 1);
    }

    #[test]
    fn test_empty_batch() {
        assert!(runner().run_batch(&[]).is_empty());
    }
}

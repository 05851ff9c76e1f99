//! Applicant data structures and intake

mod data;
pub mod loader;

pub use data::{
    Applicant, ApplicantBuilder, Gender, Habit, HabitFrequency, HealthCondition, Occupation,
    ParentHealthStatus, Severity, SourceOfIncome,
};
pub use loader::{
    load_applicant_json, load_applicants_csv, load_applicants_from_reader, load_applicants_lenient,
    parse_extraction, ApplicantRecord,
};

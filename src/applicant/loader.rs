//! Load applicants from extraction payloads (JSON) and batch files (CSV)

use chrono::NaiveDate;
use csv::Reader;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{
    Applicant, Gender, Habit, HabitFrequency, HealthCondition, Occupation, ParentHealthStatus,
    Severity, SourceOfIncome,
};
use crate::error::{ApplicantError, ApplicantResult};

/// Applicant record as produced by document extraction or manual entry
///
/// Numeric fields are optional here so a missing value is reported by name
/// rather than as a generic parse failure. Enumerations are closed: an
/// unknown condition, habit, occupation or status fails deserialisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub dob: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub yearly_income: Option<f64>,
    pub source_of_income: Option<SourceOfIncome>,
    pub base_cover: Option<f64>,
    pub cir_cover: Option<f64>,
    pub accident_cover: Option<f64>,
    pub parent_health_status: Option<ParentHealthStatus>,
    #[serde(default)]
    pub health_conditions: BTreeMap<HealthCondition, i64>,
    #[serde(default)]
    pub habits: BTreeMap<Habit, HabitFrequency>,
    #[serde(default)]
    pub risky_occupations: Vec<Occupation>,
    /// Free-text remarks from the extraction step, not used by the rules
    pub extraction_notes: Option<String>,
}

impl TryFrom<ApplicantRecord> for Applicant {
    type Error = ApplicantError;

    fn try_from(record: ApplicantRecord) -> ApplicantResult<Applicant> {
        let dob = record.dob.ok_or(ApplicantError::MissingField("dob"))?;
        let date_of_birth = parse_date(&dob)?;

        let mut builder = Applicant::builder().date_of_birth(date_of_birth);

        if let Some(name) = record.name.filter(|n| !n.trim().is_empty()) {
            builder = builder.name(name);
        }
        if let Some(gender) = record.gender {
            builder = builder.gender(gender);
        }
        if let Some(v) = record.height_cm {
            builder = builder.height_cm(v);
        }
        if let Some(v) = record.weight_kg {
            builder = builder.weight_kg(v);
        }
        if let Some(v) = record.yearly_income {
            builder = builder.yearly_income(v);
        }
        if let Some(v) = record.source_of_income {
            builder = builder.source_of_income(v);
        }
        if let Some(v) = record.base_cover {
            builder = builder.base_cover(v);
        }
        if let Some(v) = record.cir_cover {
            builder = builder.cir_cover(v);
        }
        if let Some(v) = record.accident_cover {
            builder = builder.accident_cover(v);
        }
        if let Some(v) = record.parent_health_status {
            builder = builder.parent_health_status(v);
        }

        for (condition, level) in record.health_conditions {
            builder = builder.condition(condition, parse_severity(condition, level)?);
        }
        for (habit, frequency) in record.habits {
            builder = builder.habit(habit, frequency);
        }

        let declared = record.risky_occupations.len();
        for occupation in &record.risky_occupations {
            builder = builder.occupation(*occupation);
        }
        let applicant = builder.build()?;

        if applicant.risky_occupations.len() < declared {
            warn!(
                "Dropped {} duplicate risky occupation(s)",
                declared - applicant.risky_occupations.len()
            );
        }
        if let Some(notes) = record.extraction_notes.filter(|n| !n.is_empty()) {
            debug!("Extraction notes: {}", notes);
        }

        Ok(applicant)
    }
}

fn parse_date(value: &str) -> ApplicantResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|source| {
        ApplicantError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })
}

fn parse_severity(condition: HealthCondition, level: i64) -> ApplicantResult<Severity> {
    u8::try_from(level)
        .ok()
        .and_then(Severity::new)
        .ok_or_else(|| ApplicantError::InvalidSeverity {
            condition: condition.key().to_string(),
            level,
        })
}

/// Remove Markdown code fences that extraction models wrap around JSON
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Parse an extraction payload into a validated applicant
pub fn parse_extraction(raw: &str) -> ApplicantResult<Applicant> {
    let record: ApplicantRecord = serde_json::from_str(strip_code_fences(raw))?;
    Applicant::try_from(record)
}

/// Load one applicant from a JSON file
pub fn load_applicant_json<P: AsRef<Path>>(path: P) -> ApplicantResult<Applicant> {
    let raw = std::fs::read_to_string(path)?;
    parse_extraction(&raw)
}

/// Raw CSV row for batch files
///
/// One column per condition and habit; occupations are `;`-separated.
/// Empty condition or habit cells mean absent / `none`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: Option<String>,
    gender: Option<Gender>,
    dob: Option<String>,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    yearly_income: Option<f64>,
    source_of_income: Option<SourceOfIncome>,
    base_cover: Option<f64>,
    cir_cover: Option<f64>,
    accident_cover: Option<f64>,
    parent_health_status: Option<ParentHealthStatus>,
    thyroid: Option<i64>,
    asthma: Option<i64>,
    hypertension: Option<i64>,
    diabetes: Option<i64>,
    gut_disorder: Option<i64>,
    smoking: Option<HabitFrequency>,
    alcohol: Option<HabitFrequency>,
    tobacco: Option<HabitFrequency>,
    risky_occupations: Option<String>,
}

impl CsvRow {
    fn to_record(self) -> ApplicantResult<ApplicantRecord> {
        let health_conditions = [
            (HealthCondition::Thyroid, self.thyroid),
            (HealthCondition::Asthma, self.asthma),
            (HealthCondition::Hypertension, self.hypertension),
            (HealthCondition::Diabetes, self.diabetes),
            (HealthCondition::GutDisorder, self.gut_disorder),
        ]
        .into_iter()
        .filter_map(|(condition, level)| level.map(|l| (condition, l)))
        .collect();

        let habits = [
            (Habit::Smoking, self.smoking),
            (Habit::Alcohol, self.alcohol),
            (Habit::Tobacco, self.tobacco),
        ]
        .into_iter()
        .filter_map(|(habit, freq)| freq.map(|f| (habit, f)))
        .collect();

        let risky_occupations = match self.risky_occupations {
            Some(cell) => parse_occupations(&cell)?,
            None => Vec::new(),
        };

        Ok(ApplicantRecord {
            name: self.name,
            gender: self.gender,
            dob: self.dob,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            yearly_income: self.yearly_income,
            source_of_income: self.source_of_income,
            base_cover: self.base_cover,
            cir_cover: self.cir_cover,
            accident_cover: self.accident_cover,
            parent_health_status: self.parent_health_status,
            health_conditions,
            habits,
            risky_occupations,
            extraction_notes: None,
        })
    }
}

fn parse_occupations(cell: &str) -> ApplicantResult<Vec<Occupation>> {
    cell.split(';')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| {
            Occupation::ALL
                .iter()
                .copied()
                .find(|o| o.key() == key)
                .ok_or_else(|| ApplicantError::UnknownVariant {
                    kind: "occupation",
                    value: key.to_string(),
                })
        })
        .collect()
}

/// Load all applicants from a CSV file
pub fn load_applicants_csv<P: AsRef<Path>>(path: P) -> ApplicantResult<Vec<Applicant>> {
    let file = std::fs::File::open(path)?;
    load_applicants_from_reader(file)
}

/// Load applicants from any reader (e.g., string buffer, stdin)
///
/// Stops at the first invalid row; the error carries its 1-based row number.
pub fn load_applicants_from_reader<R: std::io::Read>(reader: R) -> ApplicantResult<Vec<Applicant>> {
    read_rows(reader).collect()
}

/// Load applicants, skipping invalid rows with a warning
pub fn load_applicants_lenient<R: std::io::Read>(reader: R) -> Vec<Applicant> {
    read_rows(reader)
        .filter_map(|result| match result {
            Ok(applicant) => Some(applicant),
            Err(e) => {
                warn!("skipping applicant: {}", e);
                None
            }
        })
        .collect()
}

fn read_rows<R: std::io::Read>(reader: R) -> impl Iterator<Item = ApplicantResult<Applicant>> {
    Reader::from_reader(reader)
        .into_deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            result
                .map_err(ApplicantError::from)
                .and_then(CsvRow::to_record)
                .and_then(Applicant::try_from)
                .map_err(|source| ApplicantError::Row {
                    row: idx + 1,
                    source: Box::new(source),
                })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"```json
{
  "name": "Asha Rao",
  "gender": "Female",
  "dob": "1980-06-15",
  "height_cm": 165,
  "weight_kg": 70.5,
  "yearly_income": 1500000,
  "source_of_income": "salary",
  "base_cover": 20000000,
  "cir_cover": 1000000,
  "accident_cover": 2000000,
  "parent_health_status": "one_above_65",
  "health_conditions": {"thyroid": 0, "asthma": 2, "hypertension": 0, "diabetes": 1, "gut_disorder": 0},
  "habits": {"smoking": "none", "alcohol": "moderate", "tobacco": "none"},
  "risky_occupations": ["driver", "driver"],
  "extraction_notes": ""
}
```"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn test_parse_extraction_payload() {
        let applicant = parse_extraction(PAYLOAD).unwrap();

        assert_eq!(applicant.name.as_deref(), Some("Asha Rao"));
        assert_eq!(applicant.date_of_birth, NaiveDate::from_ymd_opt(1980, 6, 15).unwrap());
        assert_eq!(applicant.parent_health_status, ParentHealthStatus::OneAbove65);
        assert_eq!(applicant.severity(HealthCondition::Asthma).level(), 2);
        assert_eq!(applicant.active_conditions().count(), 2);
        assert_eq!(applicant.habit(Habit::Alcohol), HabitFrequency::Moderate);
        // duplicates collapse into the set
        assert_eq!(applicant.risky_occupations.len(), 1);
    }

    #[test]
    fn test_missing_income_is_rejected() {
        let payload = PAYLOAD.replace("\"yearly_income\": 1500000,", "");
        let err = parse_extraction(&payload).unwrap_err();
        assert!(matches!(err, ApplicantError::MissingField("yearly_income")));
    }

    #[test]
    fn test_unknown_condition_is_rejected() {
        let payload = PAYLOAD.replace("\"thyroid\": 0", "\"migraine\": 2");
        let err = parse_extraction(&payload).unwrap_err();
        assert!(matches!(err, ApplicantError::Json(_)));
    }

    #[test]
    fn test_unknown_habit_frequency_is_rejected() {
        let payload = PAYLOAD.replace("\"moderate\"", "\"sometimes\"");
        assert!(matches!(parse_extraction(&payload), Err(ApplicantError::Json(_))));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let payload = PAYLOAD.replace("1980-06-15", "15/06/1980");
        assert!(matches!(
            parse_extraction(&payload),
            Err(ApplicantError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_out_of_range_severity_is_rejected() {
        let payload = PAYLOAD.replace("\"asthma\": 2", "\"asthma\": 5");
        let err = parse_extraction(&payload).unwrap_err();
        assert!(matches!(err, ApplicantError::InvalidSeverity { level: 5, .. }));
    }

    #[test]
    fn test_load_applicants_from_csv_reader() {
        let data = "\
name,gender,dob,height_cm,weight_kg,yearly_income,source_of_income,base_cover,cir_cover,accident_cover,parent_health_status,thyroid,asthma,hypertension,diabetes,gut_disorder,smoking,alcohol,tobacco,risky_occupations
Ravi,Male,1985-01-20,175,80,1000000,business,5000000,500000,1000000,both_below_65,,,2,2,,high,,,pilot;driver
Meera,,1999-11-02,160,52,600000,salary,3000000,0,0,both_above_65,1,,,,,,occasionally,,
";
        let applicants = load_applicants_from_reader(data.as_bytes()).unwrap();
        assert_eq!(applicants.len(), 2);

        let ravi = &applicants[0];
        assert_eq!(ravi.gender, Some(Gender::Male));
        assert_eq!(ravi.severity(HealthCondition::Hypertension).level(), 2);
        assert_eq!(ravi.habit(Habit::Smoking), HabitFrequency::High);
        assert!(ravi.risky_occupations.contains(&Occupation::Pilot));
        assert!(ravi.risky_occupations.contains(&Occupation::Driver));

        let meera = &applicants[1];
        assert_eq!(meera.gender, None);
        assert_eq!(meera.severity(HealthCondition::Thyroid).level(), 1);
        assert!(meera.risky_occupations.is_empty());
    }

    #[test]
    fn test_csv_error_reports_row() {
        let data = "\
name,gender,dob,height_cm,weight_kg,yearly_income,source_of_income,base_cover,cir_cover,accident_cover,parent_health_status,thyroid,asthma,hypertension,diabetes,gut_disorder,smoking,alcohol,tobacco,risky_occupations
A,,1985-01-20,175,80,1000000,salary,5000000,0,0,both_below_65,,,,,,,,,
B,,1985-01-20,175,80,1000000,salary,5000000,0,0,both_below_65,,,,,,,,,astronaut
";
        let err = load_applicants_from_reader(data.as_bytes()).unwrap_err();
        match err {
            ApplicantError::Row { row, source } => {
                assert_eq!(row, 2);
                assert!(matches!(*source, ApplicantError::UnknownVariant { kind: "occupation", .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lenient_load_skips_bad_rows() {
        let data = "\
name,gender,dob,height_cm,weight_kg,yearly_income,source_of_income,base_cover,cir_cover,accident_cover,parent_health_status,thyroid,asthma,hypertension,diabetes,gut_disorder,smoking,alcohol,tobacco,risky_occupations
A,,1985-01-20,175,80,1000000,salary,5000000,0,0,both_below_65,,,,,,,,,
B,,1985-01-20,0,80,1000000,salary,5000000,0,0,both_below_65,,,,,,,,,
C,,1990-05-05,160,60,800000,salary,2000000,0,0,one_above_65,,,,,,,,,
";
        let applicants = load_applicants_lenient(data.as_bytes());
        let names: Vec<_> = applicants.iter().filter_map(|a| a.name.as_deref()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }
}

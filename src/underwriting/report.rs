//! Display helpers for currency, EMR points and the text quote

use std::fmt::Write;

use super::premium::CirPremium;
use super::result::UnderwritingResult;

/// Rupee amount rounded to the nearest whole unit with thousands separators
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("₹ -{}", grouped)
    } else {
        format!("₹ {}", grouped)
    }
}

/// Signed EMR points with one decimal, e.g. `+7.5` or `-10.0`
pub fn format_points(points: f64) -> String {
    format!("{:+.1}", points)
}

/// Multi-line text quote for terminal output
pub fn render_quote(result: &UnderwritingResult) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = write_quote(&mut out, result);
    out
}

fn write_quote(out: &mut String, result: &UnderwritingResult) -> std::fmt::Result {
    let b = &result.emr_breakdown;

    writeln!(out, "Age {}  BMI {:.1}", result.age, result.bmi)?;
    writeln!(out)?;
    writeln!(out, "EMR breakdown")?;
    writeln!(out, "  {:<28} {:>8}", "BMI", format_points(b.bmi_points))?;
    writeln!(out, "  {:<28} {:>8}", "Family history", format_points(b.family_adjustment))?;
    for (condition, points) in &b.condition_points {
        writeln!(out, "  {:<28} {:>8}", condition.label(), format_points(*points))?;
    }
    if b.comorbidity_surcharge != 0.0 {
        writeln!(
            out,
            "  {:<28} {:>8}",
            format!("Comorbidity ({} conditions)", b.active_conditions),
            format_points(b.comorbidity_surcharge)
        )?;
    }
    for (habit, points) in &b.habit_points {
        writeln!(out, "  {:<28} {:>8}", habit.label(), format_points(*points))?;
    }
    if b.habit_surcharge != 0.0 {
        writeln!(
            out,
            "  {:<28} {:>8}",
            format!("Habit co-existence ({})", b.active_habits),
            format_points(b.habit_surcharge)
        )?;
    }
    writeln!(out, "  {:<28} {:>8}", "Total EMR", format_points(result.emr_total))?;
    writeln!(out)?;

    let class = |c: Option<&crate::tables::RatingClass>| match c {
        Some(c) => format!("Class {} (factor {})", c.label, c.factor),
        None => "none".to_string(),
    };
    writeln!(out, "Life rating: {}", class(result.ratings.life.as_ref()))?;
    writeln!(out, "CIR rating:  {}", class(result.ratings.cir.as_ref()))?;
    writeln!(out, "Verdict:     {}", result.verdict)?;
    writeln!(out)?;

    if !result.flags.is_empty() {
        writeln!(out, "Flags")?;
        for flag in result.flags_by_priority() {
            writeln!(out, "  [{}] {}", flag.severity, flag.message)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Premiums")?;
    match &result.premiums.life {
        Some(life) => {
            writeln!(out, "  Life base          {:>16}", format_currency(life.base))?;
            writeln!(out, "  Life loading       {:>16}", format_currency(life.loading))?;
            writeln!(out, "  Life occupational  {:>16}", format_currency(life.occupational))?;
            writeln!(out, "  Life total         {:>16}", format_currency(life.total))?;
        }
        None => writeln!(out, "  Life               {:>16}", "not quoted")?,
    }
    match &result.premiums.accident {
        Some(accident) => {
            writeln!(out, "  Accident total     {:>16}", format_currency(accident.total))?
        }
        None => writeln!(out, "  Accident           {:>16}", "not quoted")?,
    }
    match &result.premiums.cir {
        CirPremium::Quoted(cir) => {
            writeln!(out, "  CIR total          {:>16}", format_currency(cir.total))?
        }
        CirPremium::Declined { reason } => writeln!(out, "  CIR declined: {}", reason)?,
        CirPremium::NotQuoted => writeln!(out, "  CIR                {:>16}", "not quoted")?,
    }
    writeln!(out, "  Grand total        {:>16}", format_currency(result.grand_total))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicant::{Applicant, HealthCondition, ParentHealthStatus, Severity, SourceOfIncome};
    use crate::underwriting::UnderwritingEngine;
    use chrono::NaiveDate;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "₹ 0");
        assert_eq!(format_currency(999.4), "₹ 999");
        assert_eq!(format_currency(12_345.0), "₹ 12,345");
        assert_eq!(format_currency(1_234_567.5), "₹ 1,234,568");
        assert_eq!(format_currency(-1_500.0), "₹ -1,500");
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(7.5), "+7.5");
        assert_eq!(format_points(-10.0), "-10.0");
        assert_eq!(format_points(0.0), "+0.0");
    }

    #[test]
    fn test_render_quote_lists_sections() {
        let applicant = Applicant::builder()
            .date_of_birth(NaiveDate::from_ymd_opt(1962, 3, 1).unwrap())
            .height_cm(165.0)
            .weight_kg(70.0)
            .yearly_income(1_200_000.0)
            .source_of_income(SourceOfIncome::Other)
            .covers(2_000_000.0, 500_000.0, 0.0)
            .parent_health_status(ParentHealthStatus::OneAbove65)
            .condition(HealthCondition::Diabetes, Severity::new(4).unwrap())
            .build()
            .unwrap();
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let result = UnderwritingEngine::standard().underwrite(&applicant, as_of);
        let text = render_quote(&result);

        assert!(text.starts_with("Age 63"));
        assert!(text.contains("Diabetes Mellitus"));
        assert!(text.contains("[MANUAL_UW] Diabetes Mellitus at Severity Level 4"));
        assert!(text.contains("CIR declined: CIR not available above age 60"));
        assert!(text.contains("Grand total"));
    }
}

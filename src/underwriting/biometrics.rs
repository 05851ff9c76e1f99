//! Age and BMI derived from the applicant's raw fields

use chrono::{Datelike, NaiveDate};

/// Age in whole years on `as_of`
///
/// Counts birthdays, not days: the age increments on the birthday itself.
/// A date of birth after `as_of` yields a negative age.
pub fn age_on(date_of_birth: NaiveDate, as_of: NaiveDate) -> i32 {
    let mut age = as_of.year() - date_of_birth.year();
    if (as_of.month(), as_of.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Body-mass index rounded to one decimal place
///
/// Uses half-away-from-zero rounding on the computed value, so 22.25 becomes
/// 22.3. Callers must pass a positive height.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round_one_decimal(weight_kg / (height_m * height_m))
}

/// Round half away from zero to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

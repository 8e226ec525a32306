//! Date checks for reservation and birth-date fields.
//!
//! Date inputs submit `yyyy-mm-dd`; comparisons are done on calendar dates so
//! the time of day and the host's time zone never change the outcome.

use anyhow::{Context as _, Result};
use chrono::{Datelike as _, NaiveDate};

/// Oldest age accepted for a birth date, in years.
pub const MAX_AGE_YEARS: i32 = 150;

/// Parse the value of an `<input type="date">`.
///
/// # Errors
/// Returns an error if `value` is not a `yyyy-mm-dd` calendar date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("not a yyyy-mm-dd date: {value:?}"))
}

/// A reservation date is acceptable from `today` onwards.
pub fn is_not_in_past(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

/// Whole-year difference between the two dates' years, the way the profile
/// form has always computed age (month and day are ignored).
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - birth.year()
}

/// Age must land in `0..=150` years.
pub fn is_plausible_birth_date(birth: NaiveDate, today: NaiveDate) -> bool {
    (0..=MAX_AGE_YEARS).contains(&age_in_years(birth, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day).context("bad test date")
    }

    #[test]
    fn past_dates_are_rejected() -> Result<()> {
        let today = date(2026, 10, 19)?;
        assert!(is_not_in_past(today, today));
        assert!(is_not_in_past(date(2026, 10, 20)?, today));
        assert!(!is_not_in_past(date(2026, 10, 18)?, today));
        Ok(())
    }

    #[test]
    fn birth_dates_use_year_difference() -> Result<()> {
        let today = date(2026, 1, 1)?;
        assert!(is_plausible_birth_date(date(1990, 6, 15)?, today));
        assert!(is_plausible_birth_date(date(1876, 12, 31)?, today));
        assert!(!is_plausible_birth_date(date(1875, 1, 1)?, today));
        assert!(is_plausible_birth_date(date(2026, 12, 31)?, today));
        assert!(!is_plausible_birth_date(date(2027, 1, 1)?, today));
        Ok(())
    }

    #[test]
    fn parses_only_iso_dates() {
        assert!(parse_iso_date("2030-02-01").is_ok());
        assert!(parse_iso_date("01/02/2030").is_err());
        assert!(parse_iso_date("2030-02-30").is_err());
        assert!(parse_iso_date("").is_err());
    }
}

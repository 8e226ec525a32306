//! Display formatting for dates and times shown in tables and banners.

use anyhow::{Context as _, Result, bail};

use crate::dates::parse_iso_date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFormat {
    /// `dd/mm/yyyy`, used in the reservations table.
    #[default]
    DayMonthYear,
    /// `yyyy-mm-dd`, the value format of date inputs.
    Iso,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFormat {
    #[default]
    H24,
    /// `h:mm AM/PM`.
    H12,
}

/// Reformat a `yyyy-mm-dd` date.
///
/// # Errors
/// Returns an error if `date` is not a `yyyy-mm-dd` calendar date.
pub fn format_date(date: &str, format: DateFormat) -> Result<String> {
    let parsed = parse_iso_date(date)?;
    let pattern = match format {
        DateFormat::DayMonthYear => "%d/%m/%Y",
        DateFormat::Iso => "%Y-%m-%d",
    };
    Ok(parsed.format(pattern).to_string())
}

/// Reformat an `HH:MM` time. Minutes are passed through untouched.
///
/// # Errors
/// Returns an error if the hour part is missing or not a number in `0..24`.
pub fn format_time(time: &str, format: TimeFormat) -> Result<String> {
    let (hours, minutes) = time
        .split_once(':')
        .with_context(|| format!("not an HH:MM time: {time:?}"))?;
    let hour: u32 = hours
        .trim()
        .parse()
        .with_context(|| format!("bad hour in {time:?}"))?;
    if hour >= 24 {
        bail!("hour out of range in {time:?}");
    }
    Ok(match format {
        TimeFormat::H24 => format!("{hour:02}:{minutes}"),
        TimeFormat::H12 => {
            let period = if hour >= 12 { "PM" } else { "AM" };
            let display = match hour {
                0 => 12,
                13.. => hour - 12,
                _ => hour,
            };
            format!("{display}:{minutes} {period}")
        }
    })
}

/// `dd/mm/yyyy` to `yyyy-mm-dd`, zero-padding day and month. Anything that
/// does not split into three `/`-separated parts is returned unchanged.
pub fn convert_date_format(date: &str) -> String {
    let parts: Vec<&str> = date.split('/').collect();
    if let [day, month, year] = parts.as_slice() {
        return format!("{year}-{month:0>2}-{day:0>2}");
    }
    date.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_reformat() -> Result<()> {
        assert_eq!(format_date("2030-02-01", DateFormat::DayMonthYear)?, "01/02/2030");
        assert_eq!(format_date("2030-02-01", DateFormat::Iso)?, "2030-02-01");
        assert!(format_date("01/02/2030", DateFormat::Iso).is_err());
        Ok(())
    }

    #[test]
    fn times_reformat() -> Result<()> {
        assert_eq!(format_time("9:30", TimeFormat::H24)?, "09:30");
        assert_eq!(format_time("00:15", TimeFormat::H12)?, "12:15 AM");
        assert_eq!(format_time("12:00", TimeFormat::H12)?, "12:00 PM");
        assert_eq!(format_time("18:45", TimeFormat::H12)?, "6:45 PM");
        assert!(format_time("1830", TimeFormat::H24).is_err());
        assert!(format_time("25:00", TimeFormat::H24).is_err());
        Ok(())
    }

    #[test]
    fn converts_table_dates_for_inputs() {
        assert_eq!(convert_date_format("1/2/2030"), "2030-02-01");
        assert_eq!(convert_date_format("15/11/2030"), "2030-11-15");
        assert_eq!(convert_date_format("2030-11-15"), "2030-11-15");
    }
}

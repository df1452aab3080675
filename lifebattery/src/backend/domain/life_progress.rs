//! # Life Progress Calculations
//!
//! Turns a birth date and an expected lifespan into the snapshot every theme
//! renders: how much of the lifespan is left as a percentage, and how much
//! time is left broken down into whole units.
//!
//! All interval arithmetic is done on `i64` milliseconds. The percentage is
//! the only floating point value and is returned unclamped: a negative value
//! means the lifespan has been exceeded, a value above 100 means `now` lies
//! before the birth date. Use [`LifeProgress::display_percentage`] for a
//! value that can be drawn.
//!
//! The birth date is taken as midnight UTC. The end of life is the birth date
//! plus `lifespan` calendar years; a Feb 29 birth date lands on Feb 28 in a
//! non-leap target year.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use shared::{ChargeLevel, Countdown, RemainingTime};

use crate::backend::domain::models::DATE_FORMAT;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
pub const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

/// Display percentage above which the battery is drawn as fully charged
pub const HIGH_CHARGE_THRESHOLD: f64 = 60.0;
/// Display percentage above which the battery is drawn as half charged
pub const MEDIUM_CHARGE_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgressError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Progress snapshot at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct LifeProgress {
    pub birth_instant: DateTime<Utc>,
    pub death_instant: DateTime<Utc>,
    pub total_duration_ms: i64,
    pub elapsed_ms: i64,
    /// Unclamped; negative past the end of life, above 100 before birth
    pub percentage_remaining: f64,
    /// Never negative
    pub remaining_ms: i64,
    pub remaining: RemainingTime,
    pub countdown: Countdown,
}

impl LifeProgress {
    /// Percentage clamped to 0..=100 for rendering
    pub fn display_percentage(&self) -> f64 {
        self.percentage_remaining.clamp(0.0, 100.0)
    }

    pub fn charge_level(&self) -> ChargeLevel {
        charge_level(self.display_percentage())
    }

    /// True once `now` has reached the projected end of life
    pub fn is_depleted(&self) -> bool {
        self.remaining_ms == 0
    }
}

/// Projected end-of-life date for a birth date and lifespan
pub fn death_date(dob: NaiveDate, lifespan_years: i64) -> Result<NaiveDate, ProgressError> {
    if lifespan_years <= 0 {
        return Err(ProgressError::InvalidInput(format!(
            "Lifespan must be positive, got {}",
            lifespan_years
        )));
    }

    let months = u32::try_from(lifespan_years)
        .ok()
        .and_then(|years| years.checked_mul(12))
        .ok_or_else(|| {
            ProgressError::InvalidInput(format!("Lifespan {} is out of range", lifespan_years))
        })?;

    // chrono clamps to the last day of the month, so Feb 29 becomes Feb 28
    dob.checked_add_months(Months::new(months)).ok_or_else(|| {
        ProgressError::InvalidInput(format!(
            "End of life for {} + {} years is out of range",
            dob, lifespan_years
        ))
    })
}

/// Calculate the progress snapshot for `dob` and `lifespan_years` at `now`
pub fn calculate(
    dob: Option<NaiveDate>,
    lifespan_years: i64,
    now: DateTime<Utc>,
) -> Result<LifeProgress, ProgressError> {
    let dob = dob.ok_or_else(|| ProgressError::InvalidInput("Birth date is missing".to_string()))?;
    let death = death_date(dob, lifespan_years)?;

    let birth_instant = midnight_utc(dob);
    let death_instant = midnight_utc(death);

    let birth_ms = birth_instant.timestamp_millis();
    let death_ms = death_instant.timestamp_millis();
    let now_ms = now.timestamp_millis();

    let total_duration_ms = death_ms - birth_ms;
    let elapsed_ms = now_ms - birth_ms;
    let percentage_remaining = 100.0 - (elapsed_ms as f64 / total_duration_ms as f64) * 100.0;
    let remaining_ms = (death_ms - now_ms).max(0);

    Ok(LifeProgress {
        birth_instant,
        death_instant,
        total_duration_ms,
        elapsed_ms,
        percentage_remaining,
        remaining_ms,
        remaining: remaining_breakdown(now, death_instant),
        countdown: countdown(remaining_ms),
    })
}

/// Same as [`calculate`] for an ISO 8601 (YYYY-MM-DD) birth date
pub fn calculate_from_iso(
    dob: &str,
    lifespan_years: i64,
    now: DateTime<Utc>,
) -> Result<LifeProgress, ProgressError> {
    let trimmed = dob.trim();
    if trimmed.is_empty() {
        return calculate(None, lifespan_years, now);
    }

    let parsed = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| ProgressError::InvalidInput(format!("Invalid birth date '{}': {}", dob, e)))?;
    calculate(Some(parsed), lifespan_years, now)
}

/// Time left from `now` until `death_instant`
///
/// Years are whole calendar years. Every other unit is an independent floor
/// division of the remaining milliseconds.
pub fn remaining_breakdown(now: DateTime<Utc>, death_instant: DateTime<Utc>) -> RemainingTime {
    let ms = (death_instant.timestamp_millis() - now.timestamp_millis()).max(0);
    RemainingTime {
        years: whole_years_between(now, death_instant),
        weeks: ms / MS_PER_WEEK,
        days: ms / MS_PER_DAY,
        hours: ms / MS_PER_HOUR,
        minutes: ms / MS_PER_MINUTE,
        seconds: ms / MS_PER_SECOND,
        milliseconds: ms,
    }
}

/// Number of calendar years that fit between `from` and `to`, 0 if `to` is not later
pub fn whole_years_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    if to <= from {
        return 0;
    }

    let mut years = i64::from(to.year() - from.year());
    while years > 0 && add_years(from, years).map_or(true, |end| end > to) {
        years -= 1;
    }
    years
}

fn add_years(instant: DateTime<Utc>, years: i64) -> Option<DateTime<Utc>> {
    let months = u32::try_from(years).ok()?.checked_mul(12)?;
    instant.checked_add_months(Months::new(months))
}

/// Clock-face fields: total hours, then minute, second and millisecond within
pub fn countdown(remaining_ms: i64) -> Countdown {
    let ms = remaining_ms.max(0);
    Countdown {
        hours: ms / MS_PER_HOUR,
        minutes: ((ms % MS_PER_HOUR) / MS_PER_MINUTE) as u32,
        seconds: ((ms % MS_PER_MINUTE) / MS_PER_SECOND) as u32,
        milliseconds: (ms % MS_PER_SECOND) as u32,
        total_seconds: ms / MS_PER_SECOND,
    }
}

/// Battery band for a display percentage
pub fn charge_level(display_percentage: f64) -> ChargeLevel {
    if display_percentage > HIGH_CHARGE_THRESHOLD {
        ChargeLevel::High
    } else if display_percentage > MEDIUM_CHARGE_THRESHOLD {
        ChargeLevel::Medium
    } else {
        ChargeLevel::Low
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_full_battery_at_birth() {
        let progress = calculate(Some(date(1990, 5, 1)), 80, at(1990, 5, 1)).unwrap();

        assert_eq!(progress.percentage_remaining, 100.0);
        assert_eq!(progress.elapsed_ms, 0);
        assert_eq!(progress.remaining_ms, progress.total_duration_ms);
        assert!(progress.total_duration_ms > 0);
    }

    #[test]
    fn test_half_way_through() {
        let progress = calculate(Some(date(2000, 1, 1)), 80, at(2040, 1, 1)).unwrap();

        assert!((progress.percentage_remaining - 50.0).abs() < 0.01);
        assert_eq!(progress.death_instant, at(2080, 1, 1));
        assert_eq!(progress.charge_level(), ChargeLevel::Medium);
    }

    #[test]
    fn test_past_end_of_life() {
        let progress = calculate(Some(date(1900, 1, 1)), 80, at(2000, 1, 1)).unwrap();

        assert!(progress.percentage_remaining < 0.0);
        assert_eq!(progress.display_percentage(), 0.0);
        assert_eq!(progress.remaining_ms, 0);
        assert!(progress.is_depleted());
        assert_eq!(
            progress.remaining,
            RemainingTime {
                years: 0,
                weeks: 0,
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0,
                milliseconds: 0,
            }
        );
        assert_eq!(progress.countdown, countdown(0));
        assert_eq!(progress.charge_level(), ChargeLevel::Low);
    }

    #[test]
    fn test_exactly_at_end_of_life() {
        let progress = calculate(Some(date(2000, 1, 1)), 10, at(2010, 1, 1)).unwrap();

        assert_eq!(progress.remaining_ms, 0);
        assert_eq!(progress.percentage_remaining, 0.0);
    }

    #[test]
    fn test_before_birth_is_above_hundred() {
        let progress = calculate(Some(date(2000, 1, 1)), 80, at(1999, 1, 1)).unwrap();

        assert!(progress.percentage_remaining > 100.0);
        assert_eq!(progress.display_percentage(), 100.0);
        assert_eq!(progress.charge_level(), ChargeLevel::High);
    }

    #[test]
    fn test_percentage_is_non_increasing() {
        let dob = Some(date(1985, 7, 20));
        let mut now = at(1980, 1, 1);
        let mut previous = f64::INFINITY;

        while now < at(2080, 1, 1) {
            let progress = calculate(dob, 75, now).unwrap();
            assert!(progress.percentage_remaining <= previous);
            assert!(!progress.percentage_remaining.is_nan());
            previous = progress.percentage_remaining;
            now += Duration::days(97) + Duration::milliseconds(13);
        }
    }

    #[test]
    fn test_units_are_derived_independently() {
        let death = at(2030, 1, 1);
        let now = death - Duration::days(2 * 365 + 3) - Duration::hours(4) - Duration::minutes(5) - Duration::milliseconds(6_789);
        let remaining_ms = (death - now).num_milliseconds();
        let breakdown = remaining_breakdown(now, death);

        assert_eq!(breakdown.years, 2);
        assert_eq!(breakdown.days, remaining_ms / MS_PER_DAY);
        assert_eq!(breakdown.weeks, remaining_ms / MS_PER_WEEK);
        assert_eq!(breakdown.hours, remaining_ms / MS_PER_HOUR);
        assert_eq!(breakdown.minutes, remaining_ms / MS_PER_MINUTE);
        assert_eq!(breakdown.seconds, remaining_ms / MS_PER_SECOND);
        assert_eq!(breakdown.milliseconds, remaining_ms);
    }

    #[test]
    fn test_years_are_calendar_years() {
        let one_year_left = calculate(Some(date(2000, 1, 1)), 80, at(2079, 1, 1)).unwrap();
        assert_eq!(one_year_left.remaining.years, 1);
        assert_eq!(one_year_left.remaining.days, 365);

        let just_under = calculate(Some(date(2000, 1, 1)), 80, at(2079, 1, 1) + Duration::milliseconds(1)).unwrap();
        assert_eq!(just_under.remaining.years, 0);
        assert_eq!(just_under.remaining.days, 364);

        let half_way = calculate(Some(date(2000, 1, 1)), 80, at(2040, 1, 1)).unwrap();
        assert_eq!(half_way.remaining.years, 40);
    }

    #[test]
    fn test_whole_years_between() {
        assert_eq!(whole_years_between(at(2020, 6, 15), at(2025, 6, 15)), 5);
        assert_eq!(whole_years_between(at(2020, 6, 15), at(2025, 6, 14)), 4);
        assert_eq!(whole_years_between(at(2020, 12, 31), at(2021, 1, 1)), 0);
        assert_eq!(whole_years_between(at(2025, 1, 1), at(2020, 1, 1)), 0);
    }

    #[test]
    fn test_countdown_fields() {
        let remaining_ms = 123 * MS_PER_HOUR + 45 * MS_PER_MINUTE + 6 * MS_PER_SECOND + 789;
        let clock = countdown(remaining_ms);

        assert_eq!(clock.hours, 123);
        assert_eq!(clock.minutes, 45);
        assert_eq!(clock.seconds, 6);
        assert_eq!(clock.milliseconds, 789);
        assert_eq!(clock.total_seconds, remaining_ms / MS_PER_SECOND);
    }

    #[test]
    fn test_leap_day_birth_clamps_to_feb_28() {
        assert_eq!(death_date(date(2000, 2, 29), 1).unwrap(), date(2001, 2, 28));
        assert_eq!(death_date(date(2000, 2, 29), 4).unwrap(), date(2004, 2, 29));
    }

    #[test]
    fn test_invalid_input() {
        let now = at(2024, 1, 1);

        assert!(matches!(calculate(None, 80, now), Err(ProgressError::InvalidInput(_))));
        assert!(matches!(calculate(Some(date(2000, 1, 1)), 0, now), Err(ProgressError::InvalidInput(_))));
        assert!(matches!(calculate(Some(date(2000, 1, 1)), -5, now), Err(ProgressError::InvalidInput(_))));
        assert!(matches!(
            calculate(Some(date(2000, 1, 1)), i64::MAX, now),
            Err(ProgressError::InvalidInput(_))
        ));
        assert!(matches!(calculate_from_iso("", 80, now), Err(ProgressError::InvalidInput(_))));
        assert!(matches!(calculate_from_iso("not-a-date", 80, now), Err(ProgressError::InvalidInput(_))));
    }

    #[test]
    fn test_calculate_from_iso() {
        let progress = calculate_from_iso("2000-01-01", 80, at(2040, 1, 1)).unwrap();
        assert!((progress.percentage_remaining - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_charge_level_bands() {
        assert_eq!(charge_level(100.0), ChargeLevel::High);
        assert_eq!(charge_level(60.5), ChargeLevel::High);
        assert_eq!(charge_level(60.0), ChargeLevel::Medium);
        assert_eq!(charge_level(20.5), ChargeLevel::Medium);
        assert_eq!(charge_level(20.0), ChargeLevel::Low);
        assert_eq!(charge_level(0.0), ChargeLevel::Low);
    }
}

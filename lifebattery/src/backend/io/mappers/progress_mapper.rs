//! lifebattery/src/backend/io/mappers/progress_mapper.rs

use chrono::{DateTime, SecondsFormat, Utc};

use crate::backend::domain::life_progress::LifeProgress;
use crate::backend::domain::models::DATE_FORMAT;
use shared::LifeProgressResponse;

/// Mapper from life progress snapshots to the shared response record.
pub struct ProgressMapper;

impl ProgressMapper {
    pub fn to_dto(
        progress: &LifeProgress,
        profile_id: Option<&str>,
        calculated_at: DateTime<Utc>,
    ) -> LifeProgressResponse {
        LifeProgressResponse {
            profile_id: profile_id.map(str::to_string),
            death_date: progress.death_instant.date_naive().format(DATE_FORMAT).to_string(),
            percentage_remaining: progress.percentage_remaining,
            display_percentage: progress.display_percentage(),
            charge_level: progress.charge_level(),
            remaining_ms: progress.remaining_ms,
            remaining: progress.remaining.clone(),
            countdown: progress.countdown.clone(),
            calculated_at: calculated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::life_progress::calculate;
    use chrono::{NaiveDate, TimeZone};
    use shared::ChargeLevel;

    #[test]
    fn test_to_dto() {
        let now = Utc.with_ymd_and_hms(2040, 1, 1, 0, 0, 0).unwrap();
        let progress = calculate(NaiveDate::from_ymd_opt(2000, 1, 1), 80, now).unwrap();

        let dto = ProgressMapper::to_dto(&progress, Some("p1"), now);
        assert_eq!(dto.profile_id.as_deref(), Some("p1"));
        assert_eq!(dto.death_date, "2080-01-01");
        assert_eq!(dto.charge_level, ChargeLevel::Medium);
        assert_eq!(dto.remaining_ms, progress.remaining_ms);
        assert_eq!(dto.calculated_at, "2040-01-01T00:00:00.000Z");
    }
}

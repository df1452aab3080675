use chrono::NaiveDate;
use log::debug;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::life_progress::{self, LifeProgress, ProgressError};
use crate::backend::domain::models::Profile;

/// Service binding the life progress calculations to a clock
#[derive(Debug, Clone)]
pub struct ProgressService<C: Clock> {
    clock: C,
}

impl<C: Clock> ProgressService<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Snapshot for a raw birth date and lifespan at the current instant
    pub fn snapshot(&self, dob: Option<NaiveDate>, lifespan_years: i64) -> Result<LifeProgress, ProgressError> {
        life_progress::calculate(dob, lifespan_years, self.clock.now())
    }

    /// Snapshot for a stored profile at the current instant
    pub fn snapshot_for(&self, profile: &Profile) -> Result<LifeProgress, ProgressError> {
        debug!("Calculating life progress for profile {}", profile.id);
        self.snapshot(Some(profile.dob), i64::from(profile.lifespan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::clock::FixedClock;
    use crate::backend::domain::models::{ProfileType, Theme};
    use chrono::{Duration, TimeZone, Utc};

    fn profile() -> Profile {
        Profile {
            id: "p1".to_string(),
            name: "Me".to_string(),
            profile_type: ProfileType::Human,
            dob: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            lifespan: 80,
            theme: Theme::Classic,
            wishes: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_snapshot_for_profile_uses_clock() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2040, 1, 1, 0, 0, 0).unwrap());
        let service = ProgressService::new(&clock);

        let first = service.snapshot_for(&profile()).unwrap();
        assert!((first.percentage_remaining - 50.0).abs() < 0.01);

        clock.advance(Duration::seconds(1));
        let second = service.snapshot_for(&profile()).unwrap();
        assert_eq!(first.remaining_ms - second.remaining_ms, 1_000);
        assert!(second.percentage_remaining < first.percentage_remaining);
    }

    #[test]
    fn test_snapshot_without_dob_fails() {
        let service = ProgressService::new(FixedClock::new(Utc::now()));
        assert!(service.snapshot(None, 80).is_err());
    }
}

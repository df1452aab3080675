//! # Legacy Migration
//!
//! Earlier releases tracked a single subject under four bare keys (`dob`,
//! `lifespan`, `theme`, `wishes`). [`LegacyRecord`] reads those keys and
//! [`legacy_to_profile`] turns them into a regular profile. The profile store
//! decides when migration runs; these functions never touch the new schema.

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde_json::Value;

use crate::backend::domain::models::{Profile, ProfileStoreError, ProfileType, Theme, DATE_FORMAT};
use crate::backend::io::mappers::profile_mapper::ProfileMapper;
use crate::backend::storage::{KeyValueStorage, StorageKeys};

/// Lifespan used when the legacy record has none
pub const LEGACY_DEFAULT_LIFESPAN: u32 = 80;

/// The single-profile state written by earlier releases
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyRecord {
    pub dob: Option<String>,
    pub lifespan: Option<i64>,
    pub theme: Option<String>,
    pub wishes: Vec<shared::Wish>,
}

impl LegacyRecord {
    /// Read the legacy keys. Unreadable or malformed values count as absent.
    pub fn read<S: KeyValueStorage>(storage: &S, keys: &StorageKeys) -> Self {
        let dob = read_value(storage, &keys.legacy_dob()).and_then(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        });

        let lifespan = read_value(storage, &keys.legacy_lifespan()).and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        let theme = read_value(storage, &keys.legacy_theme()).and_then(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        });

        let wishes = match read_value(storage, &keys.legacy_wishes()) {
            None | Some(Value::Null) => Vec::new(),
            Some(v) => serde_json::from_value(v).unwrap_or_else(|e| {
                warn!("Ignoring malformed legacy wishes: {}", e);
                Vec::new()
            }),
        };

        Self {
            dob,
            lifespan,
            theme,
            wishes,
        }
    }

    pub fn has_dob(&self) -> bool {
        self.dob.is_some()
    }
}

/// Synthesize a profile from a legacy record
///
/// Fails with a validation error when the record has no readable birth date.
pub fn legacy_to_profile(
    record: &LegacyRecord,
    name: &str,
    created_at: DateTime<Utc>,
) -> Result<Profile, ProfileStoreError> {
    let raw_dob = record
        .dob
        .as_deref()
        .ok_or_else(|| ProfileStoreError::Validation("Legacy record has no birth date".to_string()))?;
    let dob = parse_legacy_date(raw_dob).ok_or_else(|| {
        ProfileStoreError::Validation(format!("Legacy birth date '{}' is unreadable", raw_dob))
    })?;

    let lifespan = record
        .lifespan
        .and_then(|years| u32::try_from(years).ok())
        .filter(|years| *years > 0)
        .unwrap_or(LEGACY_DEFAULT_LIFESPAN);

    let theme = record
        .theme
        .as_deref()
        .map(ProfileMapper::theme_or_default)
        .unwrap_or(Theme::default());

    Ok(Profile {
        id: shared::Profile::generate_id(),
        name: name.to_string(),
        profile_type: ProfileType::Human,
        dob,
        lifespan,
        theme,
        wishes: record
            .wishes
            .iter()
            .cloned()
            .map(ProfileMapper::wish_to_domain)
            .collect(),
        created_at,
    })
}

/// Values were written JSON-encoded; accept bare strings as well
fn read_value<S: KeyValueStorage>(storage: &S, key: &str) -> Option<Value> {
    match storage.get(key) {
        Ok(Some(raw)) => Some(
            serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw.trim().to_string())),
        ),
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read legacy key {}: {}", key, e);
            None
        }
    }
}

/// Date inputs store `YYYY-MM-DD`; some builds stored a full timestamp
fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::MemoryStorage;
    use chrono::TimeZone;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_read_json_encoded_values() {
        let storage = MemoryStorage::with_entries([
            ("lifebattery_dob", "\"1990-05-01\""),
            ("lifebattery_lifespan", "90"),
            ("lifebattery_theme", "\"neon\""),
            ("lifebattery_wishes", r#"[{"id": 7, "text": "Learn piano", "completed": false}]"#),
        ]);

        let record = LegacyRecord::read(&storage, &StorageKeys::default());
        assert_eq!(record.dob.as_deref(), Some("1990-05-01"));
        assert_eq!(record.lifespan, Some(90));
        assert_eq!(record.theme.as_deref(), Some("neon"));
        assert_eq!(record.wishes.len(), 1);
    }

    #[test]
    fn test_read_bare_and_malformed_values() {
        let storage = MemoryStorage::with_entries([
            ("lifebattery_dob", "1990-05-01"),
            ("lifebattery_lifespan", "\"85\""),
            ("lifebattery_wishes", "{not json"),
        ]);

        let record = LegacyRecord::read(&storage, &StorageKeys::default());
        assert_eq!(record.dob.as_deref(), Some("1990-05-01"));
        assert_eq!(record.lifespan, Some(85));
        assert_eq!(record.theme, None);
        assert!(record.wishes.is_empty());
    }

    #[test]
    fn test_null_dob_is_absent() {
        let storage = MemoryStorage::with_entries([("lifebattery_dob", "null")]);
        let record = LegacyRecord::read(&storage, &StorageKeys::default());
        assert!(!record.has_dob());
    }

    #[test]
    fn test_legacy_to_profile() {
        let record = LegacyRecord {
            dob: Some("1990-05-01".to_string()),
            lifespan: Some(90),
            theme: Some("mono".to_string()),
            wishes: vec![shared::Wish {
                id: 7,
                text: "Learn piano".to_string(),
                completed: true,
            }],
        };

        let profile = legacy_to_profile(&record, "Me", created_at()).unwrap();
        assert!(!profile.id.is_empty());
        assert_eq!(profile.name, "Me");
        assert_eq!(profile.profile_type, ProfileType::Human);
        assert_eq!(profile.dob, NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
        assert_eq!(profile.lifespan, 90);
        assert_eq!(profile.theme, Theme::Mono);
        assert_eq!(profile.wishes.len(), 1);
        assert!(profile.wishes[0].completed);
        assert_eq!(profile.created_at, created_at());
    }

    #[test]
    fn test_legacy_defaults() {
        let record = LegacyRecord {
            dob: Some("1990-05-01T00:00:00.000Z".to_string()),
            ..LegacyRecord::default()
        };

        let profile = legacy_to_profile(&record, "Me", created_at()).unwrap();
        assert_eq!(profile.dob, NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
        assert_eq!(profile.lifespan, LEGACY_DEFAULT_LIFESPAN);
        assert_eq!(profile.theme, Theme::Classic);
        assert!(profile.wishes.is_empty());
    }

    #[test]
    fn test_legacy_without_readable_dob_fails() {
        assert!(legacy_to_profile(&LegacyRecord::default(), "Me", created_at()).is_err());

        let record = LegacyRecord {
            dob: Some("someday".to_string()),
            ..LegacyRecord::default()
        };
        assert!(legacy_to_profile(&record, "Me", created_at()).is_err());
    }
}

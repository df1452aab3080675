use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::theme::Theme;

/// Storage and display format of calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum accepted length of a profile name
pub const MAX_NAME_LENGTH: usize = 100;

/// What kind of subject a profile tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    #[default]
    Human,
    Pet,
}

impl ProfileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Human => "human",
            ProfileType::Pet => "pet",
        }
    }

    /// Lifespan suggested when a profile of this type is created
    pub fn default_lifespan_years(&self) -> u32 {
        match self {
            ProfileType::Human => 80,
            ProfileType::Pet => 15,
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = ProfileStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(ProfileType::Human),
            "pet" => Ok(ProfileType::Pet),
            other => Err(ProfileStoreError::Validation(format!(
                "Unknown profile type: {}",
                other
            ))),
        }
    }
}

/// A tracked subject with its own lifespan, theme and wish list
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub profile_type: ProfileType,
    pub dob: NaiveDate,
    pub lifespan: u32,
    pub theme: Theme,
    pub wishes: Vec<Wish>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn find_wish(&self, wish_id: u64) -> Option<&Wish> {
        self.wishes.iter().find(|w| w.id == wish_id)
    }

    /// Wish ID derived from `now`, bumped until it is unused in this profile
    pub fn next_wish_id(&self, now: DateTime<Utc>) -> u64 {
        let mut id = shared::Wish::generate_id(now);
        while self.find_wish(id).is_some() {
            id += 1;
        }
        id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wish {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

/// Wishes of one profile split into pending and fulfilled, order preserved
#[derive(Debug, Clone, PartialEq)]
pub struct WishList {
    pub profile_id: String,
    pub pending: Vec<Wish>,
    pub fulfilled: Vec<Wish>,
}

impl WishList {
    pub fn from_profile(profile: &Profile) -> Self {
        let (fulfilled, pending) = profile.wishes.iter().cloned().partition(|w| w.completed);
        Self {
            profile_id: profile.id.clone(),
            pending,
            fulfilled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl ProfileStoreError {
    pub fn profile_not_found(id: &str) -> Self {
        ProfileStoreError::NotFound {
            entity: "Profile",
            id: id.to_string(),
        }
    }

    pub fn wish_not_found(id: u64) -> Self {
        ProfileStoreError::NotFound {
            entity: "Wish",
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn profile_with_wishes(wishes: Vec<Wish>) -> Profile {
        Profile {
            id: "p1".to_string(),
            name: "Me".to_string(),
            profile_type: ProfileType::Human,
            dob: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
            lifespan: 80,
            theme: Theme::Classic,
            wishes,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_profile_type_parsing() {
        assert_eq!("human".parse::<ProfileType>().unwrap(), ProfileType::Human);
        assert_eq!("Pet".parse::<ProfileType>().unwrap(), ProfileType::Pet);
        assert!("robot".parse::<ProfileType>().is_err());
        assert_eq!(ProfileType::Human.default_lifespan_years(), 80);
        assert_eq!(ProfileType::Pet.default_lifespan_years(), 15);
    }

    #[test]
    fn test_next_wish_id_skips_taken_ids() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let profile = profile_with_wishes(vec![
            Wish { id: 1_000, text: "a".to_string(), completed: false },
            Wish { id: 1_001, text: "b".to_string(), completed: false },
        ]);

        assert_eq!(profile.next_wish_id(now), 1_002);
    }

    #[test]
    fn test_wish_list_split_keeps_order() {
        let profile = profile_with_wishes(vec![
            Wish { id: 3, text: "c".to_string(), completed: false },
            Wish { id: 2, text: "b".to_string(), completed: true },
            Wish { id: 1, text: "a".to_string(), completed: false },
        ]);

        let list = WishList::from_profile(&profile);
        assert_eq!(list.pending.iter().map(|w| w.id).collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(list.fulfilled.iter().map(|w| w.id).collect::<Vec<_>>(), vec![2]);
    }
}

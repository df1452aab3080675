//! lifebattery/src/backend/io/mappers/profile_mapper.rs

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::warn;

use crate::backend::domain::models::{Profile, ProfileType, Theme, Wish, WishList, DATE_FORMAT};
use shared::{
    ActiveProfileResponse, Profile as SharedProfile, ProfileListResponse, ProfileResponse,
    Wish as SharedWish, WishListResponse,
};

/// Mapper to convert between shared Profile records and domain Profile models.
pub struct ProfileMapper;

impl ProfileMapper {
    /// Converts a shared Profile record to a domain Profile model.
    ///
    /// Fails for records that break a hard invariant (empty id or name,
    /// unreadable dates, non-positive lifespan). Unknown theme or type strings fall back
    /// to the defaults.
    pub fn to_domain(dto: SharedProfile) -> Result<Profile> {
        if dto.id.trim().is_empty() {
            bail!("Profile record has an empty id");
        }
        if dto.name.trim().is_empty() {
            bail!("Profile {} has an empty name", dto.id);
        }

        let dob = NaiveDate::parse_from_str(dto.dob.trim(), DATE_FORMAT)
            .with_context(|| format!("Failed to parse dob '{}' of profile {}", dto.dob, dto.id))?;
        let created_at = DateTime::parse_from_rfc3339(&dto.created_at)
            .with_context(|| format!("Failed to parse createdAt of profile {}", dto.id))?
            .with_timezone(&Utc);

        let lifespan = u32::try_from(dto.lifespan)
            .ok()
            .filter(|years| *years > 0)
            .with_context(|| format!("Invalid lifespan {} for profile {}", dto.lifespan, dto.id))?;

        let profile_type = dto.profile_type.parse::<ProfileType>().unwrap_or_else(|_| {
            warn!("Unknown profile type '{}' on profile {}, using human", dto.profile_type, dto.id);
            ProfileType::Human
        });
        let theme = Self::theme_or_default(&dto.theme);

        Ok(Profile {
            id: dto.id,
            name: dto.name,
            profile_type,
            dob,
            lifespan,
            theme,
            wishes: dto.wishes.into_iter().map(Self::wish_to_domain).collect(),
            created_at,
        })
    }

    /// Converts a domain Profile model to a shared Profile record.
    pub fn to_dto(domain: &Profile) -> SharedProfile {
        SharedProfile {
            id: domain.id.clone(),
            name: domain.name.clone(),
            profile_type: domain.profile_type.as_str().to_string(),
            dob: domain.dob.format(DATE_FORMAT).to_string(),
            lifespan: i64::from(domain.lifespan),
            theme: domain.theme.as_str().to_string(),
            wishes: domain.wishes.iter().map(Self::wish_to_dto).collect(),
            created_at: domain.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn wish_to_domain(dto: SharedWish) -> Wish {
        Wish {
            id: dto.id,
            text: dto.text,
            completed: dto.completed,
        }
    }

    pub fn wish_to_dto(domain: &Wish) -> SharedWish {
        SharedWish {
            id: domain.id,
            text: domain.text.clone(),
            completed: domain.completed,
        }
    }

    /// Parse a stored theme id, falling back to the baseline theme
    pub fn theme_or_default(raw: &str) -> Theme {
        raw.parse::<Theme>().unwrap_or_else(|e| {
            warn!("{}, using {}", e, Theme::default());
            Theme::default()
        })
    }

    pub fn to_profile_response(domain: &Profile, success_message: &str) -> ProfileResponse {
        ProfileResponse {
            profile: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_profile_list_dto(profiles: &[Profile], active_profile_id: Option<&str>) -> ProfileListResponse {
        ProfileListResponse {
            profiles: profiles.iter().map(Self::to_dto).collect(),
            active_profile_id: active_profile_id.map(str::to_string),
        }
    }

    pub fn to_active_profile_dto(active: Option<&Profile>) -> ActiveProfileResponse {
        ActiveProfileResponse {
            active_profile: active.map(Self::to_dto),
        }
    }

    pub fn to_wish_list_dto(list: WishList) -> WishListResponse {
        WishListResponse {
            profile_id: list.profile_id,
            pending: list.pending.iter().map(Self::wish_to_dto).collect(),
            fulfilled: list.fulfilled.iter().map(Self::wish_to_dto).collect(),
        }
    }
}

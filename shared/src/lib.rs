use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked subject (person or pet) as it is persisted and handed to front ends.
///
/// Field names are camelCase on the wire so records written by earlier
/// releases of the app load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// UUID v4 string, never reused
    pub id: String,
    pub name: String,
    /// "human" or "pet"
    #[serde(rename = "type", default = "default_profile_type")]
    pub profile_type: String,
    /// ISO 8601 date format (YYYY-MM-DD)
    pub dob: String,
    /// Expected lifespan in whole years
    pub lifespan: i64,
    /// Theme identifier, e.g. "classic"
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub wishes: Vec<Wish>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

fn default_profile_type() -> String {
    "human".to_string()
}

fn default_theme() -> String {
    "classic".to_string()
}

/// A single wish list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wish {
    /// Creation time in epoch milliseconds, unique within the owning profile
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Response after creating or updating a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub success_message: String,
}

/// Response containing every profile plus the active selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<Profile>,
    pub active_profile_id: Option<String>,
}

/// Response containing the active profile information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveProfileResponse {
    pub active_profile: Option<Profile>,
}

/// Wish list of one profile, split the way the wishes page renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishListResponse {
    pub profile_id: String,
    pub pending: Vec<Wish>,
    pub fulfilled: Vec<Wish>,
}

/// Remaining time expressed in independent whole units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemainingTime {
    pub years: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

/// Clock-face countdown used by the real-time displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub hours: i64,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
    pub total_seconds: i64,
}

/// Battery fill band used to pick a renderer's colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeLevel {
    High,
    Medium,
    Low,
}

/// Life progress snapshot for one profile at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeProgressResponse {
    pub profile_id: Option<String>,
    /// ISO 8601 date of the projected end of life
    pub death_date: String,
    /// Raw value, negative once the lifespan is exceeded
    pub percentage_remaining: f64,
    /// Clamped to 0..=100 for rendering
    pub display_percentage: f64,
    pub charge_level: ChargeLevel,
    pub remaining_ms: i64,
    pub remaining: RemainingTime,
    pub countdown: Countdown,
    /// RFC 3339 timestamp the snapshot was taken at
    pub calculated_at: String,
}

impl Profile {
    /// Generate a fresh profile ID
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

impl Wish {
    /// Generate a wish ID from the creation instant
    pub fn generate_id(created_at: DateTime<Utc>) -> u64 {
        created_at.timestamp_millis().max(0) as u64
    }
}

impl ChargeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeLevel::High => "high",
            ChargeLevel::Medium => "medium",
            ChargeLevel::Low => "low",
        }
    }
}

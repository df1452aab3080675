use log::{debug, info, warn};
use serde_json::Value;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::commands::profile::{AddProfileCommand, UpdateProfileCommand};
use crate::backend::domain::migration::{legacy_to_profile, LegacyRecord, LEGACY_DEFAULT_LIFESPAN};
use crate::backend::domain::models::{
    Profile, ProfileStoreError, Theme, Wish, WishList, MAX_NAME_LENGTH,
};
use crate::backend::io::mappers::profile_mapper::ProfileMapper;
use crate::backend::storage::{KeyValueStorage, StorageKeys, DEFAULT_KEY_PREFIX};

pub type StoreResult<T> = std::result::Result<T, ProfileStoreError>;

/// Settings the profile store is opened with
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub key_prefix: String,
    /// Name given to the profile synthesized from legacy data
    pub default_profile_name: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            default_profile_name: "Me".to_string(),
        }
    }
}

/// Owner of every profile and wish, persisted through a key-value storage
///
/// All mutators write the whole collection and the active id back to storage
/// before returning. Storage failures are logged and never reach the caller;
/// a store whose data cannot be read behaves like an empty one.
pub struct ProfileStore<S: KeyValueStorage, C: Clock> {
    storage: S,
    clock: C,
    keys: StorageKeys,
    profiles: Vec<Profile>,
    active_profile_id: Option<String>,
}

impl<S: KeyValueStorage, C: Clock> ProfileStore<S, C> {
    /// Load the store, migrating legacy single-profile data when no profiles exist
    pub fn open(storage: S, clock: C, settings: StoreSettings) -> Self {
        let keys = StorageKeys::new(settings.key_prefix);
        let stored = load_profiles(&storage, &keys);
        let active_profile_id = load_active_profile_id(&storage, &keys);
        let initialized = stored.is_some();

        let mut store = Self {
            storage,
            clock,
            keys,
            profiles: stored.unwrap_or_default(),
            active_profile_id,
        };

        info!("Opened profile store with {} profiles", store.profiles.len());

        // A stored collection, even an empty one, means migration already ran
        if !initialized {
            store.migrate_legacy(&settings.default_profile_name);
        }
        store.repair_active_profile_id();

        store
    }

    /// Wipe every stored key, legacy keys included, and start over empty
    ///
    /// A reset store does not migrate again on the next open because the
    /// legacy keys are gone.
    pub fn reset(&mut self) {
        info!("Resetting profile store, removing {} profiles", self.profiles.len());

        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear storage: {}", e);
        }
        self.profiles.clear();
        self.active_profile_id = None;
    }

    /// Give the storage back, e.g. to reopen it
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// All profiles in insertion order
    pub fn list_profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn get_profile(&self, profile_id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == profile_id)
    }

    /// The stored active profile, or the first one if the stored id is stale
    pub fn get_active_profile(&self) -> Option<&Profile> {
        self.active_profile_id
            .as_deref()
            .and_then(|id| self.get_profile(id))
            .or_else(|| self.profiles.first())
    }

    pub fn active_profile_id(&self) -> Option<&str> {
        self.active_profile_id.as_deref()
    }

    /// Create a profile and make it the active one
    pub fn add_profile(&mut self, command: AddProfileCommand) -> StoreResult<Profile> {
        info!("Creating profile: name={}, dob={}", command.name, command.dob);

        let name = validate_name(&command.name)?;
        let lifespan = validate_lifespan(command.lifespan)?;

        let profile = Profile {
            id: self.fresh_profile_id(),
            name,
            profile_type: command.profile_type,
            dob: command.dob,
            lifespan,
            theme: command.theme.unwrap_or_default(),
            wishes: Vec::new(),
            created_at: self.clock.now(),
        };

        self.profiles.push(profile.clone());
        self.active_profile_id = Some(profile.id.clone());
        self.persist();

        info!("Created profile: {} with ID: {}", profile.name, profile.id);
        Ok(profile)
    }

    /// Merge the present fields of `command` into a profile
    pub fn update_profile(&mut self, profile_id: &str, command: UpdateProfileCommand) -> StoreResult<Profile> {
        info!("Updating profile: {}", profile_id);

        let name = command.name.as_deref().map(validate_name).transpose()?;
        let lifespan = command.lifespan.map(validate_lifespan).transpose()?;

        let profile = self.profile_mut(profile_id)?;
        if let Some(name) = name {
            profile.name = name;
        }
        if let Some(profile_type) = command.profile_type {
            profile.profile_type = profile_type;
        }
        if let Some(dob) = command.dob {
            profile.dob = dob;
        }
        if let Some(lifespan) = lifespan {
            profile.lifespan = lifespan;
        }
        if let Some(theme) = command.theme {
            profile.theme = theme;
        }
        let updated = profile.clone();

        self.persist();

        info!("Updated profile: {} with ID: {}", updated.name, updated.id);
        Ok(updated)
    }

    /// Select a theme, refusing premium themes without entitlement
    pub fn set_theme(&mut self, profile_id: &str, theme: Theme, entitled: bool) -> StoreResult<Profile> {
        if !theme.is_available(entitled) {
            return Err(ProfileStoreError::Validation(format!(
                "Theme {} requires a subscription",
                theme
            )));
        }

        self.update_profile(
            profile_id,
            UpdateProfileCommand {
                theme: Some(theme),
                ..UpdateProfileCommand::default()
            },
        )
    }

    /// Remove a profile; the active id moves to the first remaining profile
    pub fn delete_profile(&mut self, profile_id: &str) -> StoreResult<()> {
        info!("Deleting profile: {}", profile_id);

        let index = self
            .profiles
            .iter()
            .position(|p| p.id == profile_id)
            .ok_or_else(|| ProfileStoreError::profile_not_found(profile_id))?;
        let removed = self.profiles.remove(index);

        self.repair_active_id_in_memory();
        self.persist();

        info!("Deleted profile: {} with ID: {}", removed.name, removed.id);
        Ok(())
    }

    /// Make `profile_id` active if it exists; returns whether it switched
    pub fn switch_profile(&mut self, profile_id: &str) -> bool {
        if self.get_profile(profile_id).is_none() {
            warn!("Ignoring switch to unknown profile: {}", profile_id);
            return false;
        }

        self.active_profile_id = Some(profile_id.to_string());
        self.persist();
        info!("Switched active profile to {}", profile_id);
        true
    }

    /// Step forward through the profiles, wrapping at the end
    pub fn next_profile(&mut self) -> Option<&Profile> {
        self.step_active(1)
    }

    /// Step backward through the profiles, wrapping at the start
    pub fn prev_profile(&mut self) -> Option<&Profile> {
        self.step_active(-1)
    }

    /// Add a wish at the top of a profile's list
    pub fn add_wish(&mut self, profile_id: &str, text: &str) -> StoreResult<Wish> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ProfileStoreError::Validation("Wish text cannot be empty".to_string()));
        }

        let now = self.clock.now();
        let profile = self.profile_mut(profile_id)?;
        let wish = Wish {
            id: profile.next_wish_id(now),
            text: text.to_string(),
            completed: false,
        };
        profile.wishes.insert(0, wish.clone());

        self.persist();
        info!("Added wish {} to profile {}", wish.id, profile_id);
        Ok(wish)
    }

    /// Flip a wish between pending and fulfilled
    pub fn toggle_wish(&mut self, profile_id: &str, wish_id: u64) -> StoreResult<Wish> {
        let profile = self.profile_mut(profile_id)?;
        let wish = profile
            .wishes
            .iter_mut()
            .find(|w| w.id == wish_id)
            .ok_or_else(|| ProfileStoreError::wish_not_found(wish_id))?;
        wish.completed = !wish.completed;
        let toggled = wish.clone();

        self.persist();
        info!(
            "Marked wish {} of profile {} as {}",
            wish_id,
            profile_id,
            if toggled.completed { "fulfilled" } else { "pending" }
        );
        Ok(toggled)
    }

    pub fn delete_wish(&mut self, profile_id: &str, wish_id: u64) -> StoreResult<()> {
        let profile = self.profile_mut(profile_id)?;
        let index = profile
            .wishes
            .iter()
            .position(|w| w.id == wish_id)
            .ok_or_else(|| ProfileStoreError::wish_not_found(wish_id))?;
        profile.wishes.remove(index);

        self.persist();
        info!("Deleted wish {} from profile {}", wish_id, profile_id);
        Ok(())
    }

    pub fn wish_list(&self, profile_id: &str) -> StoreResult<WishList> {
        self.get_profile(profile_id)
            .map(WishList::from_profile)
            .ok_or_else(|| ProfileStoreError::profile_not_found(profile_id))
    }

    fn profile_mut(&mut self, profile_id: &str) -> StoreResult<&mut Profile> {
        self.profiles
            .iter_mut()
            .find(|p| p.id == profile_id)
            .ok_or_else(|| ProfileStoreError::profile_not_found(profile_id))
    }

    fn fresh_profile_id(&self) -> String {
        loop {
            let id = shared::Profile::generate_id();
            if self.get_profile(&id).is_none() {
                return id;
            }
        }
    }

    fn step_active(&mut self, step: isize) -> Option<&Profile> {
        let len = self.profiles.len();
        if len <= 1 {
            return self.get_active_profile();
        }

        let current = self
            .active_profile_id
            .as_deref()
            .and_then(|id| self.profiles.iter().position(|p| p.id == id))
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(len as isize) as usize;

        self.active_profile_id = Some(self.profiles[next].id.clone());
        self.persist();
        debug!("Stepped active profile from index {} to {}", current, next);

        self.profiles.get(next)
    }

    /// Runs only while no profile collection has ever been stored
    fn migrate_legacy(&mut self, default_name: &str) {
        let record = LegacyRecord::read(&self.storage, &self.keys);
        if !record.has_dob() {
            debug!("No legacy data to migrate");
            return;
        }

        info!("Migrating legacy data to default profile");
        match legacy_to_profile(&record, default_name, self.clock.now()) {
            Ok(profile) => {
                if record.lifespan.is_none() {
                    debug!("Legacy record had no lifespan, using {}", LEGACY_DEFAULT_LIFESPAN);
                }
                self.active_profile_id = Some(profile.id.clone());
                info!("Migrated legacy data into profile {}", profile.id);
                self.profiles.push(profile);
                self.persist();
            }
            Err(e) => warn!("Skipping legacy migration: {}", e),
        }
    }

    /// Returns whether the active id had to change
    fn repair_active_id_in_memory(&mut self) -> bool {
        let valid = self
            .active_profile_id
            .as_deref()
            .is_some_and(|id| self.get_profile(id).is_some());
        if valid {
            return false;
        }

        let replacement = self.profiles.first().map(|p| p.id.clone());
        if replacement == self.active_profile_id {
            return false;
        }

        debug!(
            "Reassigning active profile from {:?} to {:?}",
            self.active_profile_id, replacement
        );
        self.active_profile_id = replacement;
        true
    }

    fn repair_active_profile_id(&mut self) {
        if self.repair_active_id_in_memory() && !self.profiles.is_empty() {
            self.persist_active_profile_id();
        }
    }

    fn persist(&mut self) {
        self.persist_profiles();
        self.persist_active_profile_id();
    }

    fn persist_profiles(&mut self) {
        let records: Vec<shared::Profile> = self.profiles.iter().map(ProfileMapper::to_dto).collect();
        let key = self.keys.profiles();

        match serde_json::to_string(&records) {
            Ok(json) => {
                if let Err(e) = self.storage.set(&key, &json) {
                    warn!("Failed to persist profiles: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize profiles: {}", e),
        }
    }

    fn persist_active_profile_id(&mut self) {
        let key = self.keys.active_profile_id();

        match serde_json::to_string(&self.active_profile_id) {
            Ok(json) => {
                if let Err(e) = self.storage.set(&key, &json) {
                    warn!("Failed to persist active profile id: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize active profile id: {}", e),
        }
    }
}

fn validate_name(name: &str) -> StoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProfileStoreError::Validation("Profile name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ProfileStoreError::Validation(format!(
            "Profile name cannot exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

fn validate_lifespan(lifespan: i64) -> StoreResult<u32> {
    u32::try_from(lifespan)
        .ok()
        .filter(|years| *years > 0)
        .ok_or_else(|| {
            ProfileStoreError::Validation(format!("Lifespan must be a positive number of years, got {}", lifespan))
        })
}

/// `None` when no readable collection is stored (missing key, unreadable
/// storage or malformed JSON). Unreadable records inside a collection are
/// skipped.
fn load_profiles<S: KeyValueStorage>(storage: &S, keys: &StorageKeys) -> Option<Vec<Profile>> {
    let key = keys.profiles();
    let raw = match storage.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored profiles");
            return None;
        }
        Err(e) => {
            warn!("Failed to read profiles, starting empty: {}", e);
            return None;
        }
    };

    let records: Vec<Value> = match serde_json::from_str::<Option<Vec<Value>>>(&raw) {
        Ok(records) => records.unwrap_or_default(),
        Err(e) => {
            warn!("Stored profiles are malformed, starting empty: {}", e);
            return None;
        }
    };

    let mut profiles: Vec<Profile> = Vec::with_capacity(records.len());
    for record in records {
        let loaded = serde_json::from_value::<shared::Profile>(record)
            .map_err(anyhow::Error::from)
            .and_then(ProfileMapper::to_domain);

        match loaded {
            Ok(profile) if profiles.iter().any(|p| p.id == profile.id) => {
                warn!("Skipping duplicate profile id {}", profile.id);
            }
            Ok(profile) => profiles.push(profile),
            Err(e) => warn!("Skipping unreadable profile record: {:#}", e),
        }
    }

    Some(profiles)
}

fn load_active_profile_id<S: KeyValueStorage>(storage: &S, keys: &StorageKeys) -> Option<String> {
    match storage.get(&keys.active_profile_id()) {
        Ok(Some(raw)) => match serde_json::from_str::<Option<String>>(&raw) {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(e) => {
                warn!("Stored active profile id is malformed: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read active profile id: {}", e);
            None
        }
    }
}

/// Default prefix of every key the app stores
pub const DEFAULT_KEY_PREFIX: &str = "lifebattery_";

/// Physical storage keys, derived from a prefix
#[derive(Debug, Clone, PartialEq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn profiles(&self) -> String {
        self.key("profiles")
    }

    pub fn active_profile_id(&self) -> String {
        self.key("active_profile_id")
    }

    pub fn legacy_dob(&self) -> String {
        self.key("dob")
    }

    pub fn legacy_lifespan(&self) -> String {
        self.key("lifespan")
    }

    pub fn legacy_theme(&self) -> String {
        self.key("theme")
    }

    pub fn legacy_wishes(&self) -> String {
        self.key("wishes")
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let keys = StorageKeys::default();
        assert_eq!(keys.profiles(), "lifebattery_profiles");
        assert_eq!(keys.active_profile_id(), "lifebattery_active_profile_id");
        assert_eq!(keys.legacy_dob(), "lifebattery_dob");
        assert_eq!(keys.legacy_wishes(), "lifebattery_wishes");
    }

    #[test]
    fn test_custom_prefix() {
        let keys = StorageKeys::new("");
        assert_eq!(keys.profiles(), "profiles");
        assert_eq!(keys.legacy_theme(), "theme");
    }
}

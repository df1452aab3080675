// lifebattery/src/backend/domain/commands.rs

//! Domain-level command types
//! These structs are the inputs of the profile store's mutating operations.
//! Front ends map their own arguments or the `shared` records onto them.

pub mod profile {
    use chrono::NaiveDate;

    use crate::backend::domain::models::{ProfileType, Theme};

    /// Input for creating a new profile.
    #[derive(Debug, Clone)]
    pub struct AddProfileCommand {
        pub name: String,
        pub profile_type: ProfileType,
        pub dob: NaiveDate,
        pub lifespan: i64,
        /// Baseline theme when absent
        pub theme: Option<Theme>,
    }

    /// Partial update of an existing profile.
    ///
    /// Only the present fields are merged. It has no `id` or
    /// `created_at` field.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateProfileCommand {
        pub name: Option<String>,
        pub profile_type: Option<ProfileType>,
        pub dob: Option<NaiveDate>,
        pub lifespan: Option<i64>,
        pub theme: Option<Theme>,
    }

    impl UpdateProfileCommand {
        pub fn is_empty(&self) -> bool {
            self.name.is_none()
                && self.profile_type.is_none()
                && self.dob.is_none()
                && self.lifespan.is_none()
                && self.theme.is_none()
        }
    }
}

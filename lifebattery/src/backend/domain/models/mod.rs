pub mod profile;
pub mod theme;

pub use profile::{Profile, ProfileStoreError, ProfileType, Wish, WishList, DATE_FORMAT, MAX_NAME_LENGTH};
pub use theme::Theme;

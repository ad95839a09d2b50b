//! Provider adapters implementing the [`ProviderAdapter`](crate::traits::adapter::ProviderAdapter) trait.
//!
//! Each adapter wraps one client crate and outputs uniform raw posts.

mod facebook;
mod mock;
mod twitter;

// `self::` disambiguates the submodules from the client crates of the
// same name.
pub use self::facebook::FacebookAdapter;
pub use self::mock::MockAdapter;
pub use self::twitter::TwitterAdapter;

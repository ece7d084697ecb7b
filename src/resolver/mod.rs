//! Resolution stages built on the oracle, search and metadata adapters.
//!
//! - [`name`]: dependency name → repository link or registry package name.
//! - [`license`]: repository link → license classification.

pub mod license;
pub mod name;

pub use license::LicenseResolver;
pub use name::NameResolver;

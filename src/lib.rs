#![doc = include_str!("../README.md")]

pub mod error;
pub mod license;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod token;
pub mod types;

// Re-exports for convenient access
pub use error::Error;
pub use license::{License, LicenseStatus, LicenseStore, ModuleAccess};
pub use token::{SessionClaims, TokenCodec};
pub use types::{JamiaId, ModuleKey, Role, UserId};

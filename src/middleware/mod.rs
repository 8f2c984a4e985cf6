//! Plug-and-play session/role/licensing gates for Axum.
//!
//! Every gated handler in a jamia backend goes through the same pipeline:
//! session cookie → token verification → role check → (for the super-admin
//! console) unlock check. This module packages that pipeline as extractors
//! plus a mountable auth router.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use jamia_auth::middleware::{auth_routes, AuthState, GateConfig, Identity};
//!
//! // 1. Implement CredentialVerifier and TenantResolver traits for your app
//! // 2. Configure from environment
//! let config = GateConfig::from_env()?;
//! let state = AuthState::new(config, directory.clone(), directory);
//!
//! // 3. Mount auth routes next to your own
//! let app = axum::Router::new()
//!     .route("/api/students", axum::routing::get(list_students))
//!     .with_state(state.clone())
//!     .merge(auth_routes(state));
//!
//! // 4. Gate handlers with the extractors
//! async fn list_students(identity: Identity) -> Result<String, GateError> {
//!     identity.require_role(&[Role::Admin, Role::Mudeer])?;
//!     // ...
//! }
//! ```

mod config;
mod cookies;
mod error;
mod extractor;
mod routes;
mod state;
mod traits;

pub use config::GateConfig;
pub use error::GateError;
pub use extractor::{Identity, UnlockedSuperAdmin};
pub use routes::auth_routes;
pub use state::AuthState;
pub use traits::{CredentialVerifier, Principal, TenantResolver};

/// Re-export cookie key type for builder API.
pub use axum_extra::extract::cookie::Key as CookieKey;

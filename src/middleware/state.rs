use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use super::config::{GateConfig, GateSettings};
use super::traits::{CredentialVerifier, CredentialVerifierDyn, TenantResolver, TenantResolverDyn};
use crate::token::TokenCodec;

/// Shared state for the gate extractors and auth route handlers.
///
/// Built once at startup and cloned into every router that needs gating —
/// the crate's only dependency bundle, nothing lives in ambient globals.
#[derive(Clone)]
pub struct AuthState {
    pub(super) codec: Arc<TokenCodec>,
    pub(super) verifier: Arc<dyn CredentialVerifierDyn>,
    pub(super) tenants: Arc<dyn TenantResolverDyn>,
    pub(super) settings: GateSettings,
}

impl AuthState {
    pub fn new<C, T>(config: GateConfig, verifier: C, tenants: T) -> Self
    where
        C: CredentialVerifier,
        T: TenantResolver,
    {
        Self {
            codec: Arc::new(config.codec),
            verifier: Arc::new(verifier),
            tenants: Arc::new(tenants),
            settings: config.settings,
        }
    }
}

// PrivateCookieJar requires Key to be extractable from state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.settings.cookie_key.clone()
    }
}

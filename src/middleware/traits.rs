use std::future::Future;
use std::pin::Pin;

use crate::types::{JamiaId, Role, UserId};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Authenticated principal returned by [`CredentialVerifier::verify_credentials`].
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

/// Consumer-provided credential check, called at login.
///
/// # Example
///
/// ```rust,ignore
/// impl CredentialVerifier for Directory {
///     async fn verify_credentials(
///         &self,
///         username: &str,
///         password: &str,
///     ) -> Result<Option<Principal>, Box<dyn std::error::Error + Send + Sync>> {
///         Ok(self.repo.check_password(username, password).await?)
///     }
/// }
/// ```
pub trait CredentialVerifier: Send + Sync + 'static {
    /// Returns the principal on a correct username/password pair, `None`
    /// otherwise. `None` becomes a 401; only infrastructure failures should
    /// be errors.
    fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<Option<Principal>, BoxError>> + Send;
}

/// Consumer-provided tenant lookup.
///
/// Resolves the jamia a user belongs to; part of the per-request identity,
/// never persisted. Super-admins and other tenant-less principals resolve to
/// `None`.
pub trait TenantResolver: Send + Sync + 'static {
    fn jamia_for(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<JamiaId>, BoxError>> + Send;
}

// ── Object-safe wrappers (needed for Arc<dyn> in AuthState) ────────

pub(super) trait CredentialVerifierDyn: Send + Sync {
    fn verify_credentials_dyn<'a>(
        &'a self,
        username: &'a str,
        password: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Principal>, BoxError>> + Send + 'a>>;
}

impl<T: CredentialVerifier> CredentialVerifierDyn for T {
    fn verify_credentials_dyn<'a>(
        &'a self,
        username: &'a str,
        password: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Principal>, BoxError>> + Send + 'a>> {
        Box::pin(self.verify_credentials(username, password))
    }
}

pub(super) trait TenantResolverDyn: Send + Sync {
    fn jamia_for_dyn<'a>(
        &'a self,
        user_id: &'a UserId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<JamiaId>, BoxError>> + Send + 'a>>;
}

impl<T: TenantResolver> TenantResolverDyn for T {
    fn jamia_for_dyn<'a>(
        &'a self,
        user_id: &'a UserId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<JamiaId>, BoxError>> + Send + 'a>> {
        Box::pin(self.jamia_for(user_id))
    }
}

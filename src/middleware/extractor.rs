use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::PrivateCookieJar;
use time::OffsetDateTime;

use super::error::GateError;
use super::state::AuthState;
use crate::types::{JamiaId, Role, UserId};

/// Authenticated identity, recomputed on every request from the session
/// cookie plus a tenant lookup. Never persisted.
///
/// Use as an Axum extractor in route handlers. Rejects with `401
/// Unauthorized` when the cookie is absent, tampered with, or expired — the
/// three cases are deliberately indistinguishable to the caller.
///
/// # Example
///
/// ```rust,ignore
/// async fn mark_attendance(identity: Identity) -> Result<impl IntoResponse, GateError> {
///     identity.require_role(&[Role::Admin, Role::Teacher])?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
    /// Tenant the user belongs to. `None` for tenant-less principals
    /// (super-admins).
    pub jamia_id: Option<JamiaId>,
}

impl Identity {
    /// The role gate: exact set membership, no hierarchy. A `SuperAdmin`
    /// credential hitting `&[Role::Admin]` is rejected — call sites must
    /// enumerate every role they accept.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Forbidden`] when the role is outside `allowed`.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), GateError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(GateError::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);

        let jar: PrivateCookieJar = PrivateCookieJar::from_request_parts(parts, &auth)
            .await
            .map_err(|_| GateError::Unauthenticated)?;

        let token = jar
            .get(&auth.settings.session_cookie_name)
            .map(|c| c.value().to_string())
            .ok_or(GateError::Unauthenticated)?;

        // Fail closed: a malformed token reads exactly like a missing one.
        let claims = auth
            .codec
            .verify(&token)
            .map_err(|_| GateError::Unauthenticated)?;

        let jamia_id = auth
            .tenants
            .jamia_for_dyn(&claims.user_id)
            .await
            .map_err(|e| GateError::Store(e.to_string()))?;

        Ok(Identity {
            user_id: claims.user_id,
            role: claims.role,
            jamia_id,
        })
    }
}

/// Super-admin identity with a verified unlock session.
///
/// The second barrier for the most sensitive console routes: first the role
/// gate with `{SuperAdmin}`, then the short-lived unlock cookie set by the
/// master-key endpoint. A locked console rejects with the same `403` as a
/// wrong role, so responses leak nothing about which barrier failed.
#[derive(Debug, Clone)]
pub struct UnlockedSuperAdmin {
    pub identity: Identity,
}

impl<S> FromRequestParts<S> for UnlockedSuperAdmin
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        identity.require_role(&[Role::SuperAdmin])?;

        let auth = AuthState::from_ref(state);
        let jar: PrivateCookieJar = PrivateCookieJar::from_request_parts(parts, &auth)
            .await
            .map_err(|_| GateError::Unauthenticated)?;

        // The cookie value is the issue timestamp; the window is enforced
        // here, not by Max-Age, which the holder controls.
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let window_secs = auth.settings.unlock_ttl_hours * 3600;
        let unlocked = jar
            .get(&auth.settings.unlock_cookie_name)
            .and_then(|c| c.value().parse::<i64>().ok())
            .is_some_and(|issued| issued <= now && now - issued < window_secs);

        if !unlocked {
            return Err(GateError::Forbidden);
        }

        Ok(Self { identity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: UserId::from("u-1".to_string()),
            role,
            jamia_id: Some(JamiaId::from("jamia-1".to_string())),
        }
    }

    #[test]
    fn role_gate_is_exact_membership() {
        let teacher = identity(Role::Teacher);
        assert!(teacher.require_role(&[Role::Admin, Role::Teacher]).is_ok());
        assert!(teacher.require_role(&[Role::Admin]).is_err());
    }

    #[test]
    fn no_role_hierarchy() {
        let root = identity(Role::SuperAdmin);
        assert!(root.require_role(&[Role::Admin]).is_err());
        assert!(root.require_role(&[Role::SuperAdmin]).is_ok());
    }

    #[test]
    fn empty_allow_list_rejects_everyone() {
        for role in Role::ALL {
            assert!(identity(role).require_role(&[]).is_err());
        }
    }
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{any, post};
use axum::{Json, Router};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::cookies;
use super::error::GateError;
use super::extractor::Identity;
use super::state::AuthState;
use crate::token::SessionClaims;
use crate::types::{JamiaId, Role, UserId};

/// Create the authentication router.
///
/// Mounts under the configured auth path (default `/api/auth`):
/// `POST /login`, `POST /logout`, `POST /unlock`, and the development-only
/// `/impersonate` (any method; hard 403 while disabled).
pub fn auth_routes(state: AuthState) -> Router {
    let auth_path = state.settings.auth_path.clone();

    Router::new()
        .route(&format!("{auth_path}/login"), post(login))
        .route(&format!("{auth_path}/logout"), post(logout))
        .route(&format!("{auth_path}/unlock"), post(unlock))
        .route(&format!("{auth_path}/impersonate"), any(impersonate))
        .with_state(state)
}

#[derive(Serialize)]
struct SessionResponse {
    user_id: UserId,
    role: Role,
    jamia_id: Option<JamiaId>,
}

// ── Login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

async fn login(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(PrivateCookieJar, Json<SessionResponse>), GateError> {
    let principal = state
        .verifier
        .verify_credentials_dyn(&body.username, &body.password)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Credential check failed");
            GateError::Store(e.to_string())
        })?
        .ok_or(GateError::Unauthenticated)?;

    let token = state
        .codec
        .sign(&SessionClaims {
            user_id: principal.user_id.clone(),
            role: principal.role,
        })
        .map_err(|e| GateError::Config(e.to_string()))?;

    let jamia_id = state
        .tenants
        .jamia_for_dyn(&principal.user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Tenant resolution failed");
            GateError::Store(e.to_string())
        })?;

    let cookie = cookies::session_cookie(
        &state.settings.session_cookie_name,
        &token,
        state.settings.session_ttl_days,
        state.settings.secure_cookies,
    );

    tracing::info!(user = %principal.user_id, role = %principal.role, "Login successful");

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            user_id: principal.user_id,
            role: principal.role,
            jamia_id,
        }),
    ))
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, StatusCode) {
    // `remove` only emits Set-Cookie for cookies present on the request;
    // `add` with Max-Age 0 always emits a removal, unlocked session or not.
    let jar = jar
        .add(cookies::clear_cookie(&state.settings.session_cookie_name))
        .add(cookies::clear_cookie(&state.settings.unlock_cookie_name));
    (jar, StatusCode::NO_CONTENT)
}

// ── Super-admin unlock ─────────────────────────────────────────────

#[derive(Deserialize)]
struct UnlockRequest {
    master_key: String,
}

/// Master-key verification. Requires an already-authenticated super-admin
/// session; the unlock cookie is a second barrier, not a substitute for the
/// role check.
async fn unlock(
    State(state): State<AuthState>,
    identity: Identity,
    jar: PrivateCookieJar,
    Json(body): Json<UnlockRequest>,
) -> Result<(PrivateCookieJar, StatusCode), GateError> {
    identity.require_role(&[Role::SuperAdmin])?;

    if !master_key_matches(&body.master_key, &state.settings.master_key) {
        tracing::warn!(user = %identity.user_id, "Master key mismatch");
        return Err(GateError::Unauthenticated);
    }

    let cookie = cookies::unlock_cookie(
        &state.settings.unlock_cookie_name,
        time::OffsetDateTime::now_utc(),
        state.settings.unlock_ttl_hours,
        state.settings.secure_cookies,
    );

    tracing::info!(user = %identity.user_id, "Super-admin console unlocked");

    Ok((jar.add(cookie), StatusCode::OK))
}

/// Exact match over SHA-256 digests, so comparison time does not depend on
/// where the submitted key diverges from the secret.
fn master_key_matches(submitted: &str, expected: &str) -> bool {
    Sha256::digest(submitted.as_bytes()) == Sha256::digest(expected.as_bytes())
}

// ── Dev impersonation ──────────────────────────────────────────────

/// Development-only impersonation: issues a super-admin credential without a
/// password. The route always exists so that production deployments answer
/// with a hard 403 on every method rather than leaking route topology
/// differences between environments.
async fn impersonate(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Json<SessionResponse>), GateError> {
    if !state.settings.impersonation_enabled {
        return Err(GateError::Forbidden);
    }

    let claims = SessionClaims {
        user_id: UserId::from("dev-super-admin".to_string()),
        role: Role::SuperAdmin,
    };

    let token = state
        .codec
        .sign(&claims)
        .map_err(|e| GateError::Config(e.to_string()))?;

    let cookie = cookies::session_cookie(
        &state.settings.session_cookie_name,
        &token,
        state.settings.session_ttl_days,
        state.settings.secure_cookies,
    );

    tracing::warn!("Dev impersonation credential issued");

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            user_id: claims.user_id,
            role: claims.role,
            jamia_id: None,
        }),
    ))
}

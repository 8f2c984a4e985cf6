use axum_extra::extract::cookie::Key;

use super::error::GateError;
use crate::token::TokenCodec;

/// Shared gate settings used by both config and runtime state.
#[derive(Clone)]
pub(crate) struct GateSettings {
    pub(crate) cookie_key: Key,
    pub(crate) session_cookie_name: String,
    pub(crate) unlock_cookie_name: String,
    pub(crate) session_ttl_days: i64,
    pub(crate) unlock_ttl_hours: i64,
    pub(crate) secure_cookies: bool,
    pub(crate) auth_path: String,
    pub(crate) master_key: String,
    pub(crate) impersonation_enabled: bool,
}

impl GateSettings {
    fn defaults(master_key: String) -> Self {
        Self {
            cookie_key: Key::generate(),
            session_cookie_name: "auth_token".into(),
            unlock_cookie_name: "sa_verified".into(),
            session_ttl_days: 7,
            unlock_ttl_hours: 2,
            secure_cookies: true,
            auth_path: "/api/auth".into(),
            master_key,
            impersonation_enabled: false,
        }
    }
}

/// Gate configuration.
///
/// Required fields (token codec, master key) are constructor parameters — no
/// runtime "missing field" errors.
///
/// Use [`from_env()`](GateConfig::from_env) for convention-based setup, or
/// [`new()`](GateConfig::new) with `with_*` methods for full control.
pub struct GateConfig {
    pub(super) codec: TokenCodec,
    pub(super) settings: GateSettings,
}

impl GateConfig {
    /// Create config with the required token codec and master key.
    ///
    /// All optional fields use production defaults (secure cookies on,
    /// impersonation off). Override with `with_*` methods.
    #[must_use]
    pub fn new(codec: TokenCodec, master_key: impl Into<String>) -> Self {
        Self {
            codec,
            settings: GateSettings::defaults(master_key.into()),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `JAMIA_TOKEN_SECRET`: hex-encoded 32-byte token signing secret
    /// - `JAMIA_MASTER_KEY`: super-admin console master key
    ///
    /// # Optional env vars
    /// - `COOKIE_KEY`: cookie encryption key bytes (at least 64 bytes)
    /// - `DEV_AUTH`: set to `"1"` or `"true"` to enable the impersonation
    ///   route and disable secure cookies
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] if required env vars are missing or
    /// malformed.
    pub fn from_env() -> Result<Self, GateError> {
        let secret_hex = std::env::var("JAMIA_TOKEN_SECRET")
            .map_err(|_| GateError::Config("JAMIA_TOKEN_SECRET is required".into()))?;
        let codec = TokenCodec::from_hex(&secret_hex)
            .map_err(|e| GateError::Config(format!("JAMIA_TOKEN_SECRET: {e}")))?;

        let master_key = std::env::var("JAMIA_MASTER_KEY")
            .map_err(|_| GateError::Config("JAMIA_MASTER_KEY is required".into()))?;

        let dev_auth = matches!(std::env::var("DEV_AUTH").as_deref(), Ok("1") | Ok("true"));

        let cookie_key = match std::env::var("COOKIE_KEY") {
            Ok(k) => Key::try_from(k.as_bytes()).map_err(|_| {
                GateError::Config(
                    "COOKIE_KEY is set but invalid (must be at least 64 bytes). \
                     Remove the env var to use an ephemeral key, or provide a valid key."
                        .into(),
                )
            })?,
            Err(_) => Key::generate(),
        };

        Ok(Self::new(codec, master_key)
            .with_cookie_key(cookie_key)
            .with_secure_cookies(!dev_auth)
            .with_impersonation_enabled(dev_auth))
    }

    #[must_use]
    pub fn with_cookie_key(mut self, key: Key) -> Self {
        self.settings.cookie_key = key;
        self
    }

    #[must_use]
    pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.session_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_unlock_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.unlock_cookie_name = name.into();
        self
    }

    /// Sets the session lifetime. Applies to both the cookie and the token's
    /// own expiry so neither outlives the other.
    #[must_use]
    pub fn with_session_ttl_days(mut self, days: i64) -> Self {
        self.settings.session_ttl_days = days;
        self.codec = self
            .codec
            .with_ttl(std::time::Duration::from_secs(days.max(0) as u64 * 24 * 60 * 60));
        self
    }

    #[must_use]
    pub fn with_unlock_ttl_hours(mut self, hours: i64) -> Self {
        self.settings.unlock_ttl_hours = hours;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.settings.auth_path = path.into();
        self
    }

    /// Enables the development-only impersonation route. Must stay off in
    /// production; the route hard-rejects with 403 while disabled.
    #[must_use]
    pub fn with_impersonation_enabled(mut self, enabled: bool) -> Self {
        self.settings.impersonation_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_production_safe() {
        let codec = TokenCodec::from_bytes(&[1u8; 32]).unwrap();
        let config = GateConfig::new(codec, "master");
        assert_eq!(config.settings.session_cookie_name, "auth_token");
        assert_eq!(config.settings.unlock_cookie_name, "sa_verified");
        assert_eq!(config.settings.session_ttl_days, 7);
        assert_eq!(config.settings.unlock_ttl_hours, 2);
        assert!(config.settings.secure_cookies);
        assert!(!config.settings.impersonation_enabled);
        assert_eq!(config.settings.auth_path, "/api/auth");
    }

    #[test]
    fn session_ttl_builder_keeps_token_in_step() {
        let codec = TokenCodec::from_bytes(&[1u8; 32]).unwrap();
        let config = GateConfig::new(codec, "master").with_session_ttl_days(2);
        assert_eq!(config.settings.session_ttl_days, 2);
        assert_eq!(
            config.codec.ttl(),
            std::time::Duration::from_secs(2 * 24 * 60 * 60)
        );
    }
}

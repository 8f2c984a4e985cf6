use std::time::Duration;

use pasetors::claims::{Claims, ClaimsValidationRules};
use pasetors::keys::SymmetricKey;
use pasetors::token::UntrustedToken;
use pasetors::version4::V4;
use pasetors::{local, Local};

use crate::error::Error;
use crate::types::{Role, UserId};

/// Default session credential lifetime.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Claims carried by a session credential.
///
/// Minted at login or impersonation, never mutated afterwards. Expiry lives
/// inside the token (`exp` claim), not here — a `SessionClaims` value only
/// exists after the codec has already checked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: UserId,
    pub role: Role,
}

/// Signs and verifies session credentials (PASETO v4.local).
///
/// Sole owner of the signing secret: no other component may mint
/// credentials. Tokens are symmetric-key encrypted and authenticated, so a
/// verified token proves both integrity and origin.
pub struct TokenCodec {
    key: SymmetricKey<V4>,
    ttl: Duration,
}

impl TokenCodec {
    /// Builds a codec from a raw 32-byte secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Key`] if the secret is not exactly 32 bytes.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, Error> {
        let key = SymmetricKey::<V4>::from(secret)
            .map_err(|_| Error::Key(format!("expected 32 bytes, got {}", secret.len())))?;
        Ok(Self {
            key,
            ttl: DEFAULT_SESSION_TTL,
        })
    }

    /// Builds a codec from a hex-encoded 32-byte secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Key`] if the hex is invalid or the decoded length is
    /// not 32 bytes.
    pub fn from_hex(secret_hex: &str) -> Result<Self, Error> {
        let bytes = hex::decode(secret_hex).map_err(|e| Error::Key(format!("invalid hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Overrides the credential lifetime (default 7 days).
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs a session credential carrying `{id, role}` plus an expiry of
    /// now + TTL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Token`] only on internal claim-encoding failure;
    /// with a constructed codec this is effectively unreachable.
    pub fn sign(&self, session: &SessionClaims) -> Result<String, Error> {
        let mut claims =
            Claims::new_expires_in(&self.ttl).map_err(|e| Error::Token(e.to_string()))?;
        claims
            .subject(session.user_id.as_str())
            .map_err(|e| Error::Token(e.to_string()))?;
        claims
            .add_additional("role", session.role.as_str())
            .map_err(|e| Error::Token(e.to_string()))?;

        local::encrypt(&self.key, &claims, None, None).map_err(|e| Error::Token(e.to_string()))
    }

    /// Verifies a session credential and returns its claims.
    ///
    /// Checks authenticity and expiry in one step. Any mismatch, corruption,
    /// expiry, or unrecognized role collapses into [`Error::Token`] — never a
    /// partial or ambiguous result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Token`] on any invalid token.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, Error> {
        // ClaimsValidationRules validates exp, nbf, iat by default
        let validation_rules = ClaimsValidationRules::new();

        let untrusted_token = UntrustedToken::<Local, V4>::try_from(token)
            .map_err(|e| Error::Token(e.to_string()))?;

        let trusted_token = local::decrypt(&self.key, &untrusted_token, &validation_rules, None, None)
            .map_err(|e| Error::Token(e.to_string()))?;

        let payload = trusted_token
            .payload_claims()
            .ok_or_else(|| Error::Token("missing payload".into()))?;

        let subject = payload
            .get_claim("sub")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Token("missing claim: sub".into()))?;

        let role = payload
            .get_claim("role")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Token("missing claim: role".into()))?
            .parse::<Role>()?;

        Ok(SessionClaims {
            user_id: UserId::from(subject.to_owned()),
            role,
        })
    }
}

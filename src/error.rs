#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Signing secret is missing or malformed (fatal misconfiguration).
    #[error("Signing key error: {0}")]
    Key(String),
    /// Invalid credential: bad format, failed decryption, expiry, or an
    /// unrecognized claim. One bucket on purpose — callers must not branch
    /// on why a token was bad.
    #[error("Token verification error: {0}")]
    Token(String),
}

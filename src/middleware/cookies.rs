use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

/// Create the session cookie carrying the signed credential.
pub(super) fn session_cookie(
    name: &str,
    token: &str,
    ttl_days: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::days(ttl_days))
        .build()
}

/// Create the super-admin unlock cookie.
///
/// The value is the issue timestamp (unix seconds), no identity. Max-Age is
/// advisory only — the extractor re-checks the window against this timestamp,
/// so a holder who ignores cookie expiry is still locked out.
pub(super) fn unlock_cookie(
    name: &str,
    issued_at: OffsetDateTime,
    ttl_hours: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name.to_string(), issued_at.unix_timestamp().to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::hours(ttl_hours))
        .build()
}

/// Create a removal cookie.
pub(super) fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("auth_token", "tok", 7, true);
        assert_eq!(cookie.name(), "auth_token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn unlock_cookie_attributes() {
        let issued_at = OffsetDateTime::from_unix_timestamp(1_770_000_000).unwrap();
        let cookie = unlock_cookie("sa_verified", issued_at, 2, false);
        assert_eq!(cookie.value(), "1770000000");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.max_age(), Some(Duration::hours(2)));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_cookie("auth_token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}

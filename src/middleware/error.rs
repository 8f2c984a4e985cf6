use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Gate-layer error taxonomy, one variant per HTTP outcome.
///
/// Auth rejections (`Unauthenticated`, `Forbidden`) are resolved by the gates
/// before any data access. Everything else is converted at the handler
/// boundary to the nearest entry here.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No valid session credential. Missing and invalid cookies are
    /// deliberately indistinguishable.
    #[error("not authenticated")]
    Unauthenticated,

    /// Valid credential, but the role is outside the allow-list or the
    /// super-admin console is locked.
    #[error("forbidden")]
    Forbidden,

    /// Referenced entity absent.
    #[error("not found")]
    NotFound,

    /// Unsupported HTTP verb on a route.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Persistent-store operation failed.
    #[error("store error: {0}")]
    Store(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            Self::Forbidden => (StatusCode::FORBIDDEN, self.to_string()).into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            Self::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, self.to_string()).into_response()
            }
            Self::Store(_) | Self::Config(_) => {
                // Log the detail, leak nothing.
                tracing::error!(error = %self, "Gate internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            GateError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GateError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            GateError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GateError::MethodNotAllowed.into_response().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            GateError::Store("db down".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GateError::Config("missing secret".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

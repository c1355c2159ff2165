//! Basic-auth gate in front of the admin console. Every request under the
//! admin prefix is re-authenticated; there are no sessions or tokens.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use configs::AdminConfig;

/// Middleware for the `/admin` subtree: pass authenticated requests
/// through, answer everything else with the matching plain-text rejection.
pub async fn require_basic_auth(
    State(expected): State<AdminConfig>,
    req: Request,
    next: Next,
) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    match check_credentials(&expected, authorization, req.uri().path()) {
        Ok(()) => next.run(req).await,
        Err(rejection) => rejection.into_response(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum AuthRejection {
    /// No usable `Basic` credential on the request.
    Challenge,
    /// The credential was present but not decodable.
    BadHeader,
    /// The credential decoded but did not match.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Challenge => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Admin Area\"")],
                "Auth required",
            )
                .into_response(),
            Self::BadHeader => (StatusCode::BAD_REQUEST, "Bad auth header").into_response(),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
        }
    }
}

fn check_credentials(
    expected: &AdminConfig,
    authorization: Option<&str>,
    path: &str,
) -> Result<(), AuthRejection> {
    let header = authorization.unwrap_or("");
    let (scheme, encoded) = header.split_once(' ').unwrap_or((header, ""));
    if scheme != "Basic" || encoded.is_empty() {
        return Err(AuthRejection::Challenge);
    }

    let decoded = BASE64
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or(AuthRejection::BadHeader)?;
    let (user, pass) = decoded.split_once(':').unwrap_or((decoded.as_str(), ""));

    // Lengths only; credential values never reach the log.
    tracing::debug!(
        path,
        user_len = user.len(),
        expected_user_len = expected.user.len(),
        "admin auth check"
    );

    // Unset expected credentials reject everything rather than matching
    // an empty submission.
    if expected.user.is_empty() || expected.pass.is_empty() {
        return Err(AuthRejection::Unauthorized);
    }
    if user != expected.user || pass != expected.pass {
        return Err(AuthRejection::Unauthorized);
    }
    Ok(())
}

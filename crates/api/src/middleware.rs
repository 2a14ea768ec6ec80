use axum::{
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use wareops_auth::SessionResolver;

use crate::app::errors;

/// Name of the session cookie consumed by every permission-checked route.
pub const SESSION_COOKIE: &str = "session";

#[derive(Clone)]
pub struct SessionState {
    pub resolver: SessionResolver,
}

/// Resolve the `session` cookie into an [`wareops_auth::AuthContext`] request
/// extension.
///
/// Requests without a resolvable session get `401 unauthenticated`; nothing
/// past this middleware runs for them. Permission checks are NOT done here —
/// each route calls the authz guard itself.
pub async fn session_middleware(
    axum::extract::State(state): axum::extract::State<SessionState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(cookie) = extract_session_cookie(req.headers()) else {
        return errors::unauthenticated("missing session cookie");
    };

    let Some(ctx) = state.resolver.resolve(&cookie).await else {
        return errors::unauthenticated("session does not resolve to a user");
    };

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Find the `session` cookie value across all `Cookie` headers.
///
/// The value is taken verbatim up to the next `;` — the cookie format here is
/// either a bare id or compact JSON, neither of which contains `;`.
fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        let Ok(raw) = header_value.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if name.trim() == SESSION_COOKIE {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let headers = headers("theme=dark; session=u1; lang=fi");
        assert_eq!(extract_session_cookie(&headers).as_deref(), Some("u1"));
    }

    #[test]
    fn json_cookie_value_survives_extraction() {
        let headers = headers(r#"session={"id":"u1"}"#);
        assert_eq!(
            extract_session_cookie(&headers).as_deref(),
            Some(r#"{"id":"u1"}"#)
        );
    }

    #[test]
    fn absent_cookie_yields_none() {
        let headers = headers("theme=dark");
        assert!(extract_session_cookie(&headers).is_none());
        assert!(extract_session_cookie(&HeaderMap::new()).is_none());
    }
}

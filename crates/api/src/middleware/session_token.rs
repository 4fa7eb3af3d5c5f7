use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::session_token::{validate_token, SESSION_ID_HEADER, SESSION_TOKEN_HEADER};
use crate::auth::AuthContext;
use crate::domain::DomainError;
use crate::state::AppState;

/// Resolves the session headers into an `AuthContext` request extension.
/// Never rejects: resolvers decide whether a missing context is an error.
pub async fn session_token_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some((session_id, token)) = session_headers(request.headers()) {
        match validate_token(&state.db, &session_id, &token).await {
            Ok(auth) => {
                request.extensions_mut().insert::<AuthContext>(auth);
            }
            Err(DomainError::Unauthorized) => {
                tracing::debug!(%session_id, "session token rejected");
            }
            Err(e) => {
                tracing::error!(error = %e, "session token validation failed");
            }
        }
    }

    next.run(request).await
}

/// Both headers trimmed; a blank value counts as missing.
fn session_headers(headers: &HeaderMap) -> Option<(String, String)> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    Some((read(SESSION_ID_HEADER)?, read(SESSION_TOKEN_HEADER)?))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn requires_both_headers_and_trims_them() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_ID_HEADER, HeaderValue::from_static(" abc "));
        assert_eq!(session_headers(&headers), None);

        headers.insert(SESSION_TOKEN_HEADER, HeaderValue::from_static("   "));
        assert_eq!(session_headers(&headers), None);

        headers.insert(SESSION_TOKEN_HEADER, HeaderValue::from_static("tok "));
        assert_eq!(
            session_headers(&headers),
            Some(("abc".to_string(), "tok".to_string()))
        );
    }
}

//! Session middleware.
//!
//! Resolves the visitor's session from the session cookie and injects it
//! into the request extensions, so handlers and services receive the
//! session as an explicit value. A fresh session gets its id sent back
//! in a Set-Cookie header.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;

/// Resolve or create the session for the incoming request.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_id = session_id_from_cookies(request.headers());
    let (session, created) = state.sessions.resolve(cookie_id.as_deref());

    let set_cookie = created.then(|| {
        format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/",
            SESSION_COOKIE_NAME,
            session.id()
        )
    });

    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;

    if let Some(cookie) = set_cookie {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Extract the session id from the Cookie header, if present.
fn session_id_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(SESSION_COOKIE_NAME), Some(value)) if !value.is_empty() => {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
}

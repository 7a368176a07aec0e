//! HTTP handlers for Bookshelf pages

pub mod auth;
pub mod books;
pub mod health;
pub mod register;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    config::{SessionConfig, MAX_SESSION_TTL_HOURS},
    services::sessions::Session,
    AppState,
};

/// Where unauthenticated requests are sent
pub const LOGIN_PATH: &str = "/login";

/// Route gate: a request carrying a live session cookie.
///
/// Anything else (no cookie, unknown or expired token, store failure)
/// is redirected to the login page instead of getting an error status.
pub struct AuthenticatedUser {
    pub token: String,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&state.config.session.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| Redirect::to(LOGIN_PATH))?;

        match state.services.sessions.lookup(&token).await {
            Ok(Some(session)) => Ok(AuthenticatedUser { token, session }),
            Ok(None) => Err(Redirect::to(LOGIN_PATH)),
            Err(e) => {
                tracing::error!("Session lookup failed: {}", e);
                Err(Redirect::to(LOGIN_PATH))
            }
        }
    }
}

/// Cookie carrying a freshly issued session token
pub fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(
            config.ttl_hours.min(MAX_SESSION_TTL_HOURS) as i64,
        ))
        .build()
}

/// Cookie matching the session cookie's name and path, for removal
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .build()
}

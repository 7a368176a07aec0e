//! Login and logout

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::Credentials,
    services::auth::AuthOutcome,
    views, AppState,
};

use super::{removal_cookie, session_cookie, AuthenticatedUser, LOGIN_PATH};

pub async fn login_form() -> Html<String> {
    views::login(&[])
}

/// Check credentials and start a session.
///
/// Malformed input re-renders the form. Every other failure, including
/// infrastructure errors, lands back on the login page without detail.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Response {
    let credentials = credentials.normalized();
    if let Err(errors) = credentials.validate() {
        let messages = AppError::from(errors).user_messages();
        return (StatusCode::BAD_REQUEST, views::login(&messages)).into_response();
    }

    let user = match state
        .services
        .auth
        .verify(&credentials.username, &credentials.password)
        .await
    {
        Ok(AuthOutcome::Authenticated(user)) => user,
        Ok(_) => return Redirect::to(LOGIN_PATH).into_response(),
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            return Redirect::to(LOGIN_PATH).into_response();
        }
    };

    match state.services.sessions.create(user.id).await {
        Ok(token) => {
            let jar = jar.add(session_cookie(&state.config.session, token));
            (jar, Redirect::to("/")).into_response()
        }
        Err(e) => {
            tracing::error!(user_id = user.id, "Could not create session: {}", e);
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

/// End the session, clear the cookie and forbid caching of the response
pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Err(e) = state.services.sessions.destroy(&user.token).await {
        tracing::error!(user_id = user.session.user_id, "Error destroying session: {}", e);
    }

    let jar = jar.remove(removal_cookie(&state.config.session));
    (
        jar,
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate, proxy-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Redirect::to(LOGIN_PATH),
    )
}

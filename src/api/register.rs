//! Account registration

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::{error::AppError, models::user::Credentials, views, AppState};

use super::LOGIN_PATH;

pub async fn register_form() -> Html<String> {
    views::register(&[])
}

/// Create an account and send the user to the login page.
///
/// A taken email re-renders the form with a "User exists" message.
pub async fn register(State(state): State<AppState>, Form(credentials): Form<Credentials>) -> Response {
    match state.services.auth.register(credentials).await {
        Ok(_) => Redirect::to(LOGIN_PATH).into_response(),
        Err(e) => {
            let status = match &e {
                AppError::Validation(_) | AppError::Conflict(_) => e.status_code(),
                _ => {
                    tracing::error!("Registration failed: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, views::register(&e.user_messages())).into_response()
        }
    }
}

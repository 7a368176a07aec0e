//! Book list, ingestion, detail, reviews and deletion

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::{
    error::{AppError, AppResult},
    models::{book::NewBookForm, review::ReviewForm},
    views, AppState,
};

use super::{AuthenticatedUser, LOGIN_PATH};

/// Shown for any ingestion failure after the ISBN passed validation
pub const INGESTION_FAILED: &str = "Not a valid ISBN, try again.";

pub async fn index(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Response> {
    let current = match state.services.auth.current_user(&user.session).await {
        Ok(current) => current,
        // Session outlived its user row
        Err(AppError::NotFound(_)) => {
            tracing::warn!(user_id = user.session.user_id, "Session refers to a missing user");
            return Ok(Redirect::to(LOGIN_PATH).into_response());
        }
        Err(e) => return Err(e),
    };
    let books = state.services.books.list().await?;
    Ok(views::index(&books, &current.email).into_response())
}

pub async fn new_form(_user: AuthenticatedUser) -> Html<String> {
    views::new_book(&[])
}

/// Add a book by ISBN
pub async fn create(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Form(form): Form<NewBookForm>,
) -> Response {
    match state.services.books.add_by_isbn(&form.isbn).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(AppError::Validation(messages)) => {
            (StatusCode::BAD_REQUEST, views::new_book(&messages)).into_response()
        }
        Err(e) => {
            tracing::warn!("Book ingestion for {:?} failed: {}", form.isbn, e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                views::new_book(&[INGESTION_FAILED.to_string()]),
            )
                .into_response()
        }
    }
}

pub async fn detail(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let detail = state.services.books.detail(id).await?;
    Ok(views::book_detail(&detail))
}

/// Post a review. Failures are logged only; the redirect always happens.
pub async fn add_review(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(book_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Redirect {
    let Ok(book_id) = book_id.parse::<i32>() else {
        tracing::warn!(book_id = %book_id, "Review posted for a malformed book id");
        return Redirect::to("/");
    };
    match state.services.books.add_review(book_id, &form.review_text).await {
        Ok(review_id) => tracing::debug!(book_id, review_id, "Review added"),
        Err(AppError::Validation(_)) => tracing::warn!(book_id, "Ignoring empty review"),
        Err(e) => tracing::error!(book_id, "Could not add review: {}", e),
    }
    Redirect::to(&format!("/book/{}", book_id))
}

/// Delete a book and its reviews. Failures are logged only.
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(book_id): Path<String>,
) -> Redirect {
    let Ok(book_id) = book_id.parse::<i32>() else {
        tracing::warn!(book_id = %book_id, "Delete requested for a malformed book id");
        return Redirect::to("/");
    };
    if let Err(e) = state.services.books.delete(book_id).await {
        tracing::error!(book_id, "Could not delete book: {}", e);
    }
    Redirect::to("/")
}

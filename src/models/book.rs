//! Book model, ISBN validation and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

static ISBN_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9-]+$").expect("valid ISBN regex"));

/// Book row joined with its author's name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub author_id: i32,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload, built from catalog metadata plus a resolved author
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub isbn: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub author_id: i32,
}

/// Add-book form body
#[derive(Debug, Deserialize)]
pub struct NewBookForm {
    #[serde(default)]
    pub isbn: String,
}

/// Book detail page data
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    pub book: Book,
    pub reviews: Vec<String>,
}

/// Validate a user-supplied ISBN and return its digits.
///
/// Accepts 10 or 13 digits with optional hyphens anywhere between them.
pub fn parse_isbn(input: &str) -> Result<String, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::Validation(vec!["ISBN is required.".to_string()]));
    }

    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if !ISBN_CHARS.is_match(input) || !matches!(digits.len(), 10 | 13) {
        return Err(AppError::Validation(vec!["Invalid ISBN format.".to_string()]));
    }

    Ok(digits)
}

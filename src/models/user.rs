//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Login and registration form body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[serde(default)]
    #[validate(email(message = "Please provide a valid email address"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "invalid password"))]
    pub password: String,
}

impl Credentials {
    /// Trim and lowercase the email so lookups and uniqueness are case-insensitive
    pub fn normalized(mut self) -> Self {
        self.username = normalize_email(&self.username);
        self
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

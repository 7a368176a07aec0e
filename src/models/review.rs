//! Review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i32,
    pub book_id: i32,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

/// Review form body
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub review_text: String,
}

//! Reviews repository for database operations

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::review::Review};

#[derive(Clone)]
pub struct ReviewsRepository {
    pool: Pool<Postgres>,
}

impl ReviewsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, book_id, review, created_at FROM reviews WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    /// Insert a review. No existence check on the book; the FK decides.
    pub async fn create(&self, book_id: i32, text: &str) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO reviews (book_id, review) VALUES ($1, $2) RETURNING id",
        )
        .bind(book_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn delete_for_book(&self, book_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM reviews WHERE book_id = $1")
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

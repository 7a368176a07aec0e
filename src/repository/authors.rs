//! Authors repository: name to id resolution

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::normalize_author_name,
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Return the id of the author with this name, inserting it if absent.
    ///
    /// One statement against the UNIQUE(name) constraint, so concurrent
    /// callers resolving the same new name all get the same row. The no-op
    /// update makes RETURNING yield the existing id on conflict.
    pub async fn resolve(&self, name: &str) -> AppResult<i32> {
        let name = normalize_author_name(name);
        if name.is_empty() {
            return Err(AppError::Validation(vec!["Author name is empty".to_string()]));
        }

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO authors (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(&name)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}

//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.isbn, b.description, b.date, b.image_url, b.rating,
    b.author_id, a.name AS author_name, b.created_at
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All books, newest first
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id ORDER BY b.id DESC",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&query).fetch_all(&self.pool).await?;
        Ok(books)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let query = format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id WHERE b.id = $1",
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Insert a book and return its id
    pub async fn create(&self, book: &NewBook) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, isbn, description, date, image_url, rating, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(&book.description)
        .bind(&book.date)
        .bind(&book.image_url)
        .bind(book.rating)
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Delete a book row. Reviews must already be gone or the FK rejects this.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

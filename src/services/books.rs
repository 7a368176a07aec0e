//! Book catalog service: listing, ISBN ingestion, reviews and deletion

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{parse_isbn, Book, BookDetail, NewBook},
    repository::Repository,
    services::catalog::BookLookup,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    catalog: Arc<dyn BookLookup>,
}

impl BooksService {
    pub fn new(repository: Repository, catalog: Arc<dyn BookLookup>) -> Self {
        Self { repository, catalog }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Book with its author name and reviews
    pub async fn detail(&self, id: i32) -> AppResult<BookDetail> {
        let book = self
            .repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        let reviews = self.reviews_for(id).await?;
        Ok(BookDetail { book, reviews })
    }

    pub async fn reviews_for(&self, book_id: i32) -> AppResult<Vec<String>> {
        let reviews = self.repository.reviews.list_for_book(book_id).await?;
        Ok(reviews.into_iter().map(|r| r.review).collect())
    }

    /// Validate the ISBN, fetch its metadata, resolve the author and store the book.
    ///
    /// Nothing is fetched for an invalid ISBN. If the book insert fails after
    /// the author was resolved, the author row stays.
    pub async fn add_by_isbn(&self, isbn_input: &str) -> AppResult<i32> {
        let isbn = parse_isbn(isbn_input)?;

        let metadata = self.catalog.lookup(&isbn).await?;
        tracing::debug!("Catalog matched ISBN {} to \"{}\"", isbn, metadata.title);

        let author_id = self.repository.authors.resolve(&metadata.author).await?;

        let book = NewBook {
            title: metadata.title,
            isbn: metadata.isbn,
            description: metadata.description,
            date: metadata.date,
            image_url: metadata.image,
            rating: metadata.rating,
            author_id,
        };
        let id = self.repository.books.create(&book).await?;

        tracing::info!(book_id = id, author_id, "Book added for ISBN {}", isbn);
        Ok(id)
    }

    /// Attach a review to a book. The book id is not checked beforehand.
    pub async fn add_review(&self, book_id: i32, text: &str) -> AppResult<i32> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation(vec!["Review is empty".to_string()]));
        }
        self.repository.reviews.create(book_id, text).await
    }

    /// Delete a book's reviews, then the book. Two separate statements;
    /// if the first fails the book is left alone.
    pub async fn delete(&self, book_id: i32) -> AppResult<()> {
        let reviews = self.repository.reviews.delete_for_book(book_id).await?;
        let books = self.repository.books.delete(book_id).await?;
        tracing::info!(book_id, reviews, books, "Book deleted");
        Ok(())
    }
}

//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod catalog;
pub mod review;
pub mod user;

pub use author::Author;
pub use book::{Book, BookDetail, NewBook};
pub use catalog::CatalogBook;
pub use review::Review;
pub use user::{Credentials, User};

//! sea-orm entities for the tables the social service reads and writes.
//!
//! `users`, `books`, `genres` and `book_genres` are owned by the catalogue and
//! account services; they are mapped here only so the aggregations can join them.

pub mod book_genres;
pub mod books;
pub mod comments;
pub mod follows;
pub mod genres;
pub mod ratings;
pub mod review_likes;
pub mod users;

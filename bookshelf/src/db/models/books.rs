//! Database models for books.

use crate::api::models::books::BookRequest;
use crate::types::{BookId, UserId};
use sqlx::{FromRow, Row, postgres::PgRow};

/// Transport shape shared by every persistence strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDto {
    pub id: Option<BookId>,
    /// Owner; stored as `person_id`
    pub user_id: Option<UserId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: Option<i64>,
}

impl BookDto {
    /// Decode a `book` row by column name
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("person_id")?,
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            page_count: row.try_get("page_count")?,
        })
    }

    /// Overwrite every field except `id` and the owner with the values from `update`
    pub fn apply_update(mut self, update: &BookDto) -> Self {
        self.title = update.title.clone();
        self.author = update.author.clone();
        self.page_count = update.page_count;
        self
    }
}

/// Entity decoded straight from a `book` row. An entity without an id has not been saved yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: Option<BookId>,
    pub person_id: Option<UserId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: Option<i64>,
}

impl Book {
    /// Overwrite every field except `id` and `person_id` with the values from `update`
    pub fn apply_update(mut self, update: &BookDto) -> Self {
        self.title = update.title.clone();
        self.author = update.author.clone();
        self.page_count = update.page_count;
        self
    }
}

impl From<BookRequest> for BookDto {
    fn from(request: BookRequest) -> Self {
        Self {
            id: None,
            user_id: request.user_id,
            title: request.title,
            author: request.author,
            page_count: request.page_count,
        }
    }
}

impl From<BookDto> for BookRequest {
    fn from(dto: BookDto) -> Self {
        Self {
            user_id: dto.user_id,
            title: dto.title,
            author: dto.author,
            page_count: dto.page_count,
        }
    }
}

impl From<BookDto> for Book {
    fn from(dto: BookDto) -> Self {
        Self {
            id: dto.id,
            person_id: dto.user_id,
            title: dto.title,
            author: dto.author,
            page_count: dto.page_count,
        }
    }
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            user_id: book.person_id,
            title: book.title,
            author: book.author,
            page_count: book.page_count,
        }
    }
}

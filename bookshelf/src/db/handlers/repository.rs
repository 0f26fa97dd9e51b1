//! Repository traits for users and books.
//!
//! A repository is a data access layer for one postgres table. Each persistence strategy
//! provides one implementation of each trait; callers hold them as trait objects so the strategy
//! can be picked from configuration at runtime.

use crate::db::errors::{DbError, Result};
use crate::db::models::{books::BookDto, users::UserDto};
use crate::types::{BookId, UserId};

/// Data access for the `person` table
#[async_trait::async_trait]
pub trait UserRepository: Send {
    /// Insert a new user; returns it with the generated id
    async fn create(&mut self, user: &UserDto) -> Result<UserDto>;

    /// Overwrite an existing user (id excluded). NotFound if absent
    async fn update(&mut self, id: UserId, user: &UserDto) -> Result<UserDto>;

    /// Fetch a user. NotFound if absent
    async fn get_by_id(&mut self, id: UserId) -> Result<UserDto>;

    /// Delete a user; returns whether a row was removed
    async fn delete(&mut self, id: UserId) -> Result<bool>;
}

/// Data access for the `book` table
#[async_trait::async_trait]
pub trait BookRepository: Send {
    /// Insert a new book; returns it with the generated id
    async fn create(&mut self, book: &BookDto) -> Result<BookDto>;

    /// Overwrite an existing book (id and owner excluded). NotFound if absent
    async fn update(&mut self, id: BookId, book: &BookDto) -> Result<BookDto>;

    /// Fetch a book. NotFound if absent
    async fn get_by_id(&mut self, id: BookId) -> Result<BookDto>;

    /// All books of an owner ordered by id. NotFound when the owner has none
    async fn list_by_owner(&mut self, owner_id: UserId) -> Result<Vec<BookDto>>;

    /// Delete a book; returns whether a row was removed
    async fn delete(&mut self, id: BookId) -> Result<bool>;

    /// Delete every book of an owner; returns how many were removed
    async fn delete_by_owner(&mut self, owner_id: UserId) -> Result<u64>;
}

pub(crate) fn user_not_found(id: UserId) -> DbError {
    DbError::not_found(format!("User with id {id} not found"))
}

pub(crate) fn book_not_found(id: BookId) -> DbError {
    DbError::not_found(format!("Book with id {id} not found"))
}

pub(crate) fn owner_books_not_found(owner_id: UserId) -> DbError {
    DbError::not_found(format!("Books of the User with id {owner_id} not found"))
}

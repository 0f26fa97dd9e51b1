//! Operations on a user together with the books it owns.
//!
//! Every operation runs in a single transaction: a failure part-way through (a duplicate book
//! title, say) leaves neither the user nor any of its books changed.

use crate::api::models::books::BookRequest;
use crate::api::models::users::{UserBookResponse, UserRequest};
use crate::config::PersistenceStrategy;
use crate::db::errors::DbError;
use crate::db::models::{books::BookDto, users::UserDto};
use crate::errors::{Error, Result};
use crate::types::{BookId, Resource, UserId};
use crate::validation::{require_dto, require_id};
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

#[derive(Clone)]
pub struct UserBookService {
    db: PgPool,
    strategy: PersistenceStrategy,
}

impl UserBookService {
    pub fn new(db: PgPool, strategy: PersistenceStrategy) -> Self {
        Self { db, strategy }
    }

    /// Create a user and each of its books; returns the new ids in request order
    #[instrument(skip(self, user_request, book_requests), err)]
    pub async fn create_user_with_books(&self, user_request: Option<UserRequest>, book_requests: Vec<BookRequest>) -> Result<UserBookResponse> {
        let user = UserDto::from(require_dto(user_request, Resource::User)?);

        let mut tx = self.db.begin().await.map_err(|e| Error::Database(e.into()))?;

        let created = self.strategy.users(&mut tx).create(&user).await?;
        let user_id = require_id(created.id, Resource::User)?;
        info!(user_id, "Created user");

        let books_id_list = self.create_books(&mut tx, user_id, book_requests).await?;

        tx.commit().await.map_err(|e| Error::Database(e.into()))?;

        Ok(UserBookResponse { user_id, books_id_list })
    }

    /// Overwrite a user and replace its whole book list
    #[instrument(skip(self, user_request, book_requests), err)]
    pub async fn update_user_with_books(
        &self,
        user_id: UserId,
        user_request: Option<UserRequest>,
        book_requests: Vec<BookRequest>,
    ) -> Result<UserBookResponse> {
        let user = UserDto::from(require_dto(user_request, Resource::User)?);

        let mut tx = self.db.begin().await.map_err(|e| Error::Database(e.into()))?;

        self.strategy.users(&mut tx).update(user_id, &user).await?;
        info!(user_id, "Updated user");

        let removed = self.strategy.books(&mut tx).delete_by_owner(user_id).await?;
        info!(user_id, removed, "Removed previous books");

        let books_id_list = self.create_books(&mut tx, user_id, book_requests).await?;

        tx.commit().await.map_err(|e| Error::Database(e.into()))?;

        Ok(UserBookResponse { user_id, books_id_list })
    }

    /// Fetch a user id with its book ids. A user without books is reported as not found.
    #[instrument(skip(self), err)]
    pub async fn get_user_with_books(&self, user_id: UserId) -> Result<UserBookResponse> {
        let mut tx = self.db.begin().await.map_err(|e| Error::Database(e.into()))?;

        let user = self.strategy.users(&mut tx).get_by_id(user_id).await?;
        let user_id = require_id(user.id, Resource::User)?;

        let books = self.strategy.books(&mut tx).list_by_owner(user_id).await?;
        let books_id_list = books.into_iter().filter_map(|book| book.id).collect();

        tx.commit().await.map_err(|e| Error::Database(e.into()))?;

        Ok(UserBookResponse { user_id, books_id_list })
    }

    /// Delete a user's books and then the user
    #[instrument(skip(self), err)]
    pub async fn delete_user_with_books(&self, user_id: UserId) -> Result<()> {
        let mut tx = self.db.begin().await.map_err(|e| Error::Database(e.into()))?;

        self.strategy.users(&mut tx).get_by_id(user_id).await?;

        let book_ids: Vec<BookId> = match self.strategy.books(&mut tx).list_by_owner(user_id).await {
            Ok(books) => books.into_iter().filter_map(|book| book.id).collect(),
            Err(DbError::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!(user_id, ?book_ids, "Deleting user with books");

        self.strategy.books(&mut tx).delete_by_owner(user_id).await?;
        self.strategy.users(&mut tx).delete(user_id).await?;

        tx.commit().await.map_err(|e| Error::Database(e.into()))?;

        Ok(())
    }

    async fn create_books(&self, db: &mut PgConnection, owner_id: UserId, requests: Vec<BookRequest>) -> Result<Vec<BookId>> {
        let mut books = self.strategy.books(db);
        let mut ids = Vec::with_capacity(requests.len());

        for request in requests {
            let book = BookDto {
                user_id: Some(owner_id),
                ..BookDto::from(request)
            };
            let created = books.create(&book).await?;
            ids.push(require_id(created.id, Resource::Book)?);
        }

        info!(owner_id, ?ids, "Created books");
        Ok(ids)
    }
}

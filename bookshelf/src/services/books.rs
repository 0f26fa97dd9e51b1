//! Single-book operations.

use crate::api::models::books::BookRequest;
use crate::config::PersistenceStrategy;
use crate::db::models::books::BookDto;
use crate::errors::{Error, Result};
use crate::types::{BookId, Resource};
use crate::validation::require_dto;
use sqlx::{PgPool, Postgres, pool::PoolConnection};
use tracing::{info, instrument};

#[derive(Clone)]
pub struct BookService {
    db: PgPool,
    strategy: PersistenceStrategy,
}

impl BookService {
    pub fn new(db: PgPool, strategy: PersistenceStrategy) -> Self {
        Self { db, strategy }
    }

    async fn connection(&self) -> Result<PoolConnection<Postgres>> {
        self.db.acquire().await.map_err(|e| Error::Database(e.into()))
    }

    /// Create a book; the request's `userId` names the owner
    #[instrument(skip(self, request), err)]
    pub async fn create_book(&self, request: Option<BookRequest>) -> Result<BookDto> {
        let book = BookDto::from(require_dto(request, Resource::Book)?);

        let mut conn = self.connection().await?;
        let created = self.strategy.books(&mut conn).create(&book).await?;
        info!(book_id = ?created.id, owner_id = ?created.user_id, "Created book");

        Ok(created)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update_book(&self, id: BookId, request: Option<BookRequest>) -> Result<BookDto> {
        let book = BookDto::from(require_dto(request, Resource::Book)?);

        let mut conn = self.connection().await?;
        let updated = self.strategy.books(&mut conn).update(id, &book).await?;
        info!(book_id = id, "Updated book");

        Ok(updated)
    }

    #[instrument(skip(self), err)]
    pub async fn get_book(&self, id: BookId) -> Result<BookDto> {
        let mut conn = self.connection().await?;
        let book = self.strategy.books(&mut conn).get_by_id(id).await?;

        Ok(book)
    }

    /// Delete a book. Unknown ids are not found rather than silently accepted.
    #[instrument(skip(self), err)]
    pub async fn delete_book(&self, id: BookId) -> Result<()> {
        let mut conn = self.connection().await?;
        let mut books = self.strategy.books(&mut conn);

        let book = books.get_by_id(id).await?;
        books.delete(id).await?;
        info!(book_id = id, title = ?book.title, "Deleted book");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use crate::services::user_books::UserBookService;
    use crate::test_utils::user_request;

    async fn create_owner(pool: &PgPool, strategy: PersistenceStrategy) -> i64 {
        UserBookService::new(pool.clone(), strategy)
            .create_user_with_books(Some(user_request("Test Test")), vec![])
            .await
            .unwrap()
            .user_id
    }

    fn request(owner: Option<i64>, title: &str) -> BookRequest {
        BookRequest {
            user_id: owner,
            title: Some(title.to_string()),
            author: Some("Test Author".to_string()),
            page_count: Some(1000),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_book_lifecycle(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let owner = create_owner(&pool, strategy).await;
            let service = BookService::new(pool.clone(), strategy);

            let created = service.create_book(Some(request(Some(owner), &format!("test-{strategy:?}")))).await.unwrap();
            let id = created.id.unwrap();
            assert_eq!(service.get_book(id).await.unwrap(), created);

            let updated = service
                .update_book(id, Some(request(None, &format!("renamed-{strategy:?}"))))
                .await
                .unwrap();
            assert_eq!(updated.user_id, Some(owner), "{strategy:?}");
            assert_eq!(updated.title, Some(format!("renamed-{strategy:?}")));

            service.delete_book(id).await.unwrap();
            assert!(matches!(service.get_book(id).await, Err(Error::Database(DbError::NotFound { .. }))));
            assert!(matches!(service.delete_book(id).await, Err(Error::Database(DbError::NotFound { .. }))));
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_unknown_book_is_not_found(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let service = BookService::new(pool.clone(), strategy);

            let err = service.get_book(424_242).await.unwrap_err();
            assert_eq!(err.user_message(), "Book with id 424242 not found", "{strategy:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_missing_request_is_invalid_input(pool: PgPool) {
        let service = BookService::new(pool, PersistenceStrategy::RawSql);

        assert!(matches!(
            service.create_book(None).await,
            Err(Error::InvalidInput { resource: Resource::Book, .. })
        ));
        assert!(matches!(
            service.update_book(1, None).await,
            Err(Error::InvalidInput { resource: Resource::Book, .. })
        ));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_without_owner_is_integrity_error(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let service = BookService::new(pool.clone(), strategy);

            let err = service.create_book(Some(request(None, "ownerless"))).await.unwrap_err();
            assert!(matches!(err, Error::Database(DbError::NotNullViolation { .. })), "{strategy:?}: {err:?}");
        }
    }
}

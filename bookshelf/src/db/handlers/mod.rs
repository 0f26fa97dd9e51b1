//! Repository implementations for database access.
//!
//! Each persistence strategy lives in its own module and provides a `Users` and a `Books`
//! repository implementing [`UserRepository`] and [`BookRepository`]:
//!
//! - [`orm`]: entities decoded with `sqlx::FromRow`, written back with an insert-or-update `save`
//! - [`raw_sql`]: hand-written statements, columns read by position
//! - [`sql_helper`]: statements run through [`crate::db::helper::SqlHelper`], columns read by name
//!
//! All three behave identically. Which one backs the service layer is decided by
//! [`PersistenceStrategy`], read from configuration.
//!
//! # Common Pattern
//!
//! ```ignore
//! use bookshelf::config::PersistenceStrategy;
//!
//! async fn example(pool: &sqlx::PgPool, strategy: PersistenceStrategy) -> anyhow::Result<()> {
//!     let mut tx = pool.begin().await?;
//!
//!     let user = strategy.users(&mut tx).create(&user_dto).await?;
//!     let book = strategy.books(&mut tx).create(&book_dto).await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod orm;
pub mod raw_sql;
pub mod repository;
pub mod sql_helper;

pub use repository::{BookRepository, UserRepository};

use crate::config::PersistenceStrategy;
use sqlx::PgConnection;

impl PersistenceStrategy {
    /// User repository of this strategy over the given connection or transaction
    pub fn users<'c>(self, db: &'c mut PgConnection) -> Box<dyn UserRepository + 'c> {
        match self {
            PersistenceStrategy::Orm => Box::new(orm::Users::new(db)),
            PersistenceStrategy::RawSql => Box::new(raw_sql::Users::new(db)),
            PersistenceStrategy::SqlHelper => Box::new(sql_helper::Users::new(db)),
        }
    }

    /// Book repository of this strategy over the given connection or transaction
    pub fn books<'c>(self, db: &'c mut PgConnection) -> Box<dyn BookRepository + 'c> {
        match self {
            PersistenceStrategy::Orm => Box::new(orm::Books::new(db)),
            PersistenceStrategy::RawSql => Box::new(raw_sql::Books::new(db)),
            PersistenceStrategy::SqlHelper => Box::new(sql_helper::Books::new(db)),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Every test runs against all three strategies.

    use super::*;
    use crate::db::errors::DbError;
    use crate::db::models::books::BookDto;
    use crate::test_utils::{book_dto, user_dto};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_get_user(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let mut users = strategy.users(&mut conn);

            let created = users.create(&user_dto("Test Test")).await.unwrap();
            assert!(created.id.is_some(), "{strategy:?}");
            assert_eq!(created.full_name.as_deref(), Some("Test Test"));

            let fetched = users.get_by_id(created.id.unwrap()).await.unwrap();
            assert_eq!(fetched, created, "{strategy:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_user_ignores_supplied_id(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let mut users = strategy.users(&mut conn);

            let mut dto = user_dto("Has Id");
            dto.id = Some(987_654);
            let created = users.create(&dto).await.unwrap();

            assert_ne!(created.id, Some(987_654), "{strategy:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_user_missing_field_is_integrity_error(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let mut users = strategy.users(&mut conn);

            let mut dto = user_dto("No Country");
            dto.country = None;

            let err = users.create(&dto).await.unwrap_err();
            assert!(matches!(err, DbError::NotNullViolation { .. }), "{strategy:?}: {err:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_user_keeps_id(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let mut users = strategy.users(&mut conn);

            let created = users.create(&user_dto("Before")).await.unwrap();
            let id = created.id.unwrap();

            let mut update = user_dto("After");
            update.id = Some(id + 100);
            update.age = Some(12);

            let updated = users.update(id, &update).await.unwrap();
            assert_eq!(updated.id, Some(id), "{strategy:?}");
            assert_eq!(updated.full_name.as_deref(), Some("After"));
            assert_eq!(updated.age, Some(12));

            assert_eq!(users.get_by_id(id).await.unwrap(), updated, "{strategy:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_missing_user_is_not_found(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let mut users = strategy.users(&mut conn);

            assert!(matches!(users.get_by_id(424_242).await, Err(DbError::NotFound { .. })), "{strategy:?}");
            assert!(
                matches!(users.update(424_242, &user_dto("Nobody")).await, Err(DbError::NotFound { .. })),
                "{strategy:?}"
            );
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_user_is_idempotent(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let mut users = strategy.users(&mut conn);

            let id = users.create(&user_dto("Short Lived")).await.unwrap().id.unwrap();

            assert!(users.delete(id).await.unwrap(), "{strategy:?}");
            assert!(!users.delete(id).await.unwrap(), "{strategy:?}");
            assert!(matches!(users.get_by_id(id).await, Err(DbError::NotFound { .. })));
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_book_and_list_by_owner(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();

            let owner = strategy
                .users(&mut conn)
                .create(&user_dto("Test Test"))
                .await
                .unwrap()
                .id
                .unwrap();

            let mut books = strategy.books(&mut conn);
            let created = books
                .create(&book_dto(owner, &format!("test-{strategy:?}")))
                .await
                .unwrap();
            assert_eq!(books.get_by_id(created.id.unwrap()).await.unwrap(), created, "{strategy:?}");

            let listed = books.list_by_owner(owner).await.unwrap();
            assert_eq!(listed.len(), 1, "{strategy:?}");
            assert_eq!(listed[0].page_count, Some(1000));
            assert_eq!(listed[0].user_id, Some(owner));
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_by_owner_is_ordered_by_id(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let owner = strategy.users(&mut conn).create(&user_dto("Reader")).await.unwrap().id.unwrap();

            let mut books = strategy.books(&mut conn);
            let mut ids = Vec::new();
            for i in 0..3 {
                let book = books.create(&book_dto(owner, &format!("{strategy:?}-{i}"))).await.unwrap();
                ids.push(book.id.unwrap());
            }

            let listed: Vec<_> = books.list_by_owner(owner).await.unwrap().into_iter().filter_map(|b| b.id).collect();
            assert_eq!(listed, ids, "{strategy:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_by_owner_without_books_is_not_found(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let owner = strategy.users(&mut conn).create(&user_dto("No Books")).await.unwrap().id.unwrap();

            let result = strategy.books(&mut conn).list_by_owner(owner).await;
            assert!(matches!(result, Err(DbError::NotFound { .. })), "{strategy:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_book_keeps_id_and_owner(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let owner = strategy.users(&mut conn).create(&user_dto("Owner")).await.unwrap().id.unwrap();
            let other = strategy.users(&mut conn).create(&user_dto("Other")).await.unwrap().id.unwrap();

            let mut books = strategy.books(&mut conn);
            let created = books.create(&book_dto(owner, &format!("orig-{strategy:?}"))).await.unwrap();
            let id = created.id.unwrap();

            let update = BookDto {
                id: Some(id + 50),
                user_id: Some(other),
                title: Some(format!("renamed-{strategy:?}")),
                author: Some("New Author".to_string()),
                page_count: Some(7),
            };
            let updated = books.update(id, &update).await.unwrap();

            assert_eq!(updated.id, Some(id), "{strategy:?}");
            assert_eq!(updated.user_id, Some(owner), "{strategy:?}");
            assert_eq!(updated.page_count, Some(7));
            assert_eq!(books.get_by_id(id).await.unwrap(), updated, "{strategy:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_title_is_unique_violation(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let owner = strategy.users(&mut conn).create(&user_dto("Owner")).await.unwrap().id.unwrap();

            let mut books = strategy.books(&mut conn);
            let title = format!("same-{strategy:?}");
            books.create(&book_dto(owner, &title)).await.unwrap();

            let err = books.create(&book_dto(owner, &title)).await.unwrap_err();
            assert!(matches!(err, DbError::UniqueViolation { .. }), "{strategy:?}: {err:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_book_with_unknown_owner_is_foreign_key_violation(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();

            let err = strategy
                .books(&mut conn)
                .create(&book_dto(999_999, &format!("orphan-{strategy:?}")))
                .await
                .unwrap_err();
            assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{strategy:?}: {err:?}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_book_and_delete_by_owner(pool: PgPool) {
        for strategy in PersistenceStrategy::ALL {
            let mut conn = pool.acquire().await.unwrap();
            let owner = strategy.users(&mut conn).create(&user_dto("Owner")).await.unwrap().id.unwrap();

            let mut books = strategy.books(&mut conn);
            let first = books.create(&book_dto(owner, &format!("a-{strategy:?}"))).await.unwrap().id.unwrap();
            books.create(&book_dto(owner, &format!("b-{strategy:?}"))).await.unwrap();
            books.create(&book_dto(owner, &format!("c-{strategy:?}"))).await.unwrap();

            assert!(books.delete(first).await.unwrap(), "{strategy:?}");
            assert!(!books.delete(first).await.unwrap(), "{strategy:?}");
            assert!(matches!(books.get_by_id(first).await, Err(DbError::NotFound { .. })));

            assert_eq!(books.delete_by_owner(owner).await.unwrap(), 2, "{strategy:?}");
            // An owner without books is fine
            assert_eq!(books.delete_by_owner(owner).await.unwrap(), 0, "{strategy:?}");
            assert!(matches!(books.list_by_owner(owner).await, Err(DbError::NotFound { .. })));
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_strategies_read_each_others_rows(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let owner = PersistenceStrategy::Orm
            .users(&mut conn)
            .create(&user_dto("Shared"))
            .await
            .unwrap();
        let book = PersistenceStrategy::RawSql
            .books(&mut conn)
            .create(&book_dto(owner.id.unwrap(), "shared-book"))
            .await
            .unwrap();

        for strategy in PersistenceStrategy::ALL {
            assert_eq!(strategy.users(&mut conn).get_by_id(owner.id.unwrap()).await.unwrap(), owner);
            assert_eq!(strategy.books(&mut conn).get_by_id(book.id.unwrap()).await.unwrap(), book);
        }
    }
}

//! Persistence through [`SqlHelper`], with the named-column row mappers on the DTOs.

use crate::db::{
    errors::Result,
    handlers::repository::{BookRepository, UserRepository, book_not_found, owner_books_not_found, user_not_found},
    helper::{SqlHelper, SqlParam},
    models::{books::BookDto, users::UserDto},
};
use crate::types::{BookId, UserId};
use sqlx::PgConnection;
use tracing::instrument;

fn user_params(user: &UserDto) -> Vec<SqlParam> {
    vec![
        user.full_name.clone().into(),
        user.title.clone().into(),
        user.age.into(),
        user.country.clone().into(),
    ]
}

fn book_params(book: &BookDto) -> Vec<SqlParam> {
    vec![book.title.clone().into(), book.author.clone().into(), book.page_count.into()]
}

pub struct Users<'c> {
    helper: SqlHelper<'c>,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self {
            helper: SqlHelper::new(db),
        }
    }
}

#[async_trait::async_trait]
impl<'c> UserRepository for Users<'c> {
    #[instrument(skip(self, user), err)]
    async fn create(&mut self, user: &UserDto) -> Result<UserDto> {
        let id = self
            .helper
            .insert_returning_key(
                "INSERT INTO person (full_name, title, age, country) VALUES ($1, $2, $3, $4)",
                &user_params(user),
                "id",
            )
            .await?;

        Ok(UserDto {
            id: Some(id),
            ..user.clone()
        })
    }

    #[instrument(skip(self, user), err)]
    async fn update(&mut self, id: UserId, user: &UserDto) -> Result<UserDto> {
        let updated = self.get_by_id(id).await?.apply_update(user);

        let mut params = user_params(&updated);
        params.push(id.into());
        self.helper
            .update(
                "UPDATE person SET full_name = $1, title = $2, age = $3, country = $4 WHERE id = $5",
                &params,
            )
            .await?;

        Ok(updated)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: UserId) -> Result<UserDto> {
        self.helper
            .query("SELECT * FROM person WHERE id = $1", &[id.into()], UserDto::from_row)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: UserId) -> Result<bool> {
        let affected = self.helper.update("DELETE FROM person WHERE id = $1", &[id.into()]).await?;

        Ok(affected > 0)
    }
}

pub struct Books<'c> {
    helper: SqlHelper<'c>,
}

impl<'c> Books<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self {
            helper: SqlHelper::new(db),
        }
    }

    async fn select_by_owner(&mut self, owner_id: UserId) -> Result<Vec<BookDto>> {
        self.helper
            .query(
                "SELECT * FROM book WHERE person_id = $1 ORDER BY id",
                &[owner_id.into()],
                BookDto::from_row,
            )
            .await
    }
}

#[async_trait::async_trait]
impl<'c> BookRepository for Books<'c> {
    #[instrument(skip(self, book), err)]
    async fn create(&mut self, book: &BookDto) -> Result<BookDto> {
        let mut params = book_params(book);
        params.push(book.user_id.into());

        let id = self
            .helper
            .insert_returning_key(
                "INSERT INTO book (title, author, page_count, person_id) VALUES ($1, $2, $3, $4)",
                &params,
                "id",
            )
            .await?;

        Ok(BookDto {
            id: Some(id),
            ..book.clone()
        })
    }

    #[instrument(skip(self, book), err)]
    async fn update(&mut self, id: BookId, book: &BookDto) -> Result<BookDto> {
        let updated = self.get_by_id(id).await?.apply_update(book);

        let mut params = book_params(&updated);
        params.push(id.into());
        self.helper
            .update("UPDATE book SET title = $1, author = $2, page_count = $3 WHERE id = $4", &params)
            .await?;

        Ok(updated)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: BookId) -> Result<BookDto> {
        self.helper
            .query("SELECT * FROM book WHERE id = $1", &[id.into()], BookDto::from_row)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| book_not_found(id))
    }

    #[instrument(skip(self), err)]
    async fn list_by_owner(&mut self, owner_id: UserId) -> Result<Vec<BookDto>> {
        let books = self.select_by_owner(owner_id).await?;
        if books.is_empty() {
            return Err(owner_books_not_found(owner_id));
        }

        Ok(books)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: BookId) -> Result<bool> {
        let affected = self.helper.update("DELETE FROM book WHERE id = $1", &[id.into()]).await?;

        Ok(affected > 0)
    }

    #[instrument(skip(self), err)]
    async fn delete_by_owner(&mut self, owner_id: UserId) -> Result<u64> {
        let books = self.select_by_owner(owner_id).await?;
        tracing::debug!(owner_id, count = books.len(), "Deleting books of owner");

        self.helper.update("DELETE FROM book WHERE person_id = $1", &[owner_id.into()]).await
    }
}

//! Hand-written parameterized statements with positional column access.

use crate::db::{
    errors::Result,
    handlers::repository::{BookRepository, UserRepository, book_not_found, owner_books_not_found, user_not_found},
    models::{books::BookDto, users::UserDto},
};
use crate::types::{BookId, UserId};
use sqlx::{PgConnection, Row, postgres::PgRow};
use tracing::instrument;

const SELECT_USER: &str = "SELECT id, full_name, title, age, country FROM person WHERE id = $1";
const SELECT_BOOK: &str = "SELECT id, person_id, title, author, page_count FROM book WHERE id = $1";
const SELECT_BOOKS_BY_OWNER: &str = "SELECT id, person_id, title, author, page_count FROM book WHERE person_id = $1 ORDER BY id";

// Column positions follow SELECT_USER
fn user_from_row(row: &PgRow) -> std::result::Result<UserDto, sqlx::Error> {
    Ok(UserDto {
        id: row.try_get(0)?,
        full_name: row.try_get(1)?,
        title: row.try_get(2)?,
        age: row.try_get(3)?,
        country: row.try_get(4)?,
    })
}

// Column positions follow SELECT_BOOK
fn book_from_row(row: &PgRow) -> std::result::Result<BookDto, sqlx::Error> {
    Ok(BookDto {
        id: row.try_get(0)?,
        user_id: row.try_get(1)?,
        title: row.try_get(2)?,
        author: row.try_get(3)?,
        page_count: row.try_get(4)?,
    })
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> UserRepository for Users<'c> {
    #[instrument(skip(self, user), err)]
    async fn create(&mut self, user: &UserDto) -> Result<UserDto> {
        let row = sqlx::query("INSERT INTO person (full_name, title, age, country) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(user.full_name.as_deref())
            .bind(user.title.as_deref())
            .bind(user.age)
            .bind(user.country.as_deref())
            .fetch_one(&mut *self.db)
            .await?;

        Ok(UserDto {
            id: Some(row.try_get(0)?),
            ..user.clone()
        })
    }

    #[instrument(skip(self, user), err)]
    async fn update(&mut self, id: UserId, user: &UserDto) -> Result<UserDto> {
        let updated = self.get_by_id(id).await?.apply_update(user);

        sqlx::query("UPDATE person SET full_name = $1, title = $2, age = $3, country = $4 WHERE id = $5")
            .bind(updated.full_name.as_deref())
            .bind(updated.title.as_deref())
            .bind(updated.age)
            .bind(updated.country.as_deref())
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(updated)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: UserId) -> Result<UserDto> {
        let row = sqlx::query(SELECT_USER)
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        Ok(user_from_row(&row)?)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM person WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct Books<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Books<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    async fn select_by_owner(&mut self, owner_id: UserId) -> Result<Vec<BookDto>> {
        let rows = sqlx::query(SELECT_BOOKS_BY_OWNER).bind(owner_id).fetch_all(&mut *self.db).await?;

        Ok(rows.iter().map(book_from_row).collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

#[async_trait::async_trait]
impl<'c> BookRepository for Books<'c> {
    #[instrument(skip(self, book), err)]
    async fn create(&mut self, book: &BookDto) -> Result<BookDto> {
        let row = sqlx::query("INSERT INTO book (title, author, page_count, person_id) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(book.title.as_deref())
            .bind(book.author.as_deref())
            .bind(book.page_count)
            .bind(book.user_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(BookDto {
            id: Some(row.try_get(0)?),
            ..book.clone()
        })
    }

    #[instrument(skip(self, book), err)]
    async fn update(&mut self, id: BookId, book: &BookDto) -> Result<BookDto> {
        let updated = self.get_by_id(id).await?.apply_update(book);

        sqlx::query("UPDATE book SET title = $1, author = $2, page_count = $3 WHERE id = $4")
            .bind(updated.title.as_deref())
            .bind(updated.author.as_deref())
            .bind(updated.page_count)
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(updated)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: BookId) -> Result<BookDto> {
        let row = sqlx::query(SELECT_BOOK)
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?
            .ok_or_else(|| book_not_found(id))?;

        Ok(book_from_row(&row)?)
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
        let result = sqlx::query("DELETE FROM book WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn delete_by_owner(&mut self, owner_id: UserId) -> Result<u64> {
        let books = self.select_by_owner(owner_id).await?;
        tracing::debug!(owner_id, ids = ?books.iter().filter_map(|b| b.id).collect::<Vec<_>>(), "Deleting books of owner");

        let result = sqlx::query("DELETE FROM book WHERE person_id = $1")
            .bind(owner_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }
}

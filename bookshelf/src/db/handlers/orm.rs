//! Entity-mapping persistence.
//!
//! Rows decode into [`Person`] and [`Book`] entities through `sqlx::FromRow` and are written back
//! with `save`, which inserts an entity without an id and updates one that has it.

use crate::db::{
    errors::Result,
    handlers::repository::{BookRepository, UserRepository, book_not_found, owner_books_not_found, user_not_found},
    models::{
        books::{Book, BookDto},
        users::{Person, UserDto},
    },
};
use crate::types::{BookId, UserId};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert when `person.id` is `None`, otherwise overwrite the row with that id
    pub async fn save(&mut self, person: Person) -> Result<Person> {
        match person.id {
            None => Ok(sqlx::query_as::<_, Person>(
                r#"
                INSERT INTO person (full_name, title, age, country)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(person.full_name)
            .bind(person.title)
            .bind(person.age)
            .bind(person.country)
            .fetch_one(&mut *self.db)
            .await?),
            Some(id) => sqlx::query_as::<_, Person>(
                r#"
                UPDATE person
                SET full_name = $2, title = $3, age = $4, country = $5
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(person.full_name)
            .bind(person.title)
            .bind(person.age)
            .bind(person.country)
            .fetch_optional(&mut *self.db)
            .await?
            .ok_or_else(|| user_not_found(id)),
        }
    }

    pub async fn find_by_id(&mut self, id: UserId) -> Result<Option<Person>> {
        let person = sqlx::query_as::<_, Person>("SELECT * FROM person WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(person)
    }

    /// Remove a saved entity; `false` if it has no id or is already gone
    pub async fn remove(&mut self, person: &Person) -> Result<bool> {
        let Some(id) = person.id else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM person WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> UserRepository for Users<'c> {
    #[instrument(skip(self, user), err)]
    async fn create(&mut self, user: &UserDto) -> Result<UserDto> {
        let person = Person {
            id: None,
            ..Person::from(user.clone())
        };

        Ok(self.save(person).await?.into())
    }

    #[instrument(skip(self, user), err)]
    async fn update(&mut self, id: UserId, user: &UserDto) -> Result<UserDto> {
        let current = self.find_by_id(id).await?.ok_or_else(|| user_not_found(id))?;

        Ok(self.save(current.apply_update(user)).await?.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: UserId) -> Result<UserDto> {
        self.find_by_id(id).await?.map(UserDto::from).ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: UserId) -> Result<bool> {
        match self.find_by_id(id).await? {
            Some(person) => self.remove(&person).await,
            None => Ok(false),
        }
    }
}

pub struct Books<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Books<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert when `book.id` is `None`, otherwise overwrite the row with that id (owner excluded)
    pub async fn save(&mut self, book: Book) -> Result<Book> {
        match book.id {
            None => Ok(sqlx::query_as::<_, Book>(
                r#"
                INSERT INTO book (title, author, page_count, person_id)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(book.title)
            .bind(book.author)
            .bind(book.page_count)
            .bind(book.person_id)
            .fetch_one(&mut *self.db)
            .await?),
            Some(id) => sqlx::query_as::<_, Book>(
                r#"
                UPDATE book
                SET title = $2, author = $3, page_count = $4
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(book.title)
            .bind(book.author)
            .bind(book.page_count)
            .fetch_optional(&mut *self.db)
            .await?
            .ok_or_else(|| book_not_found(id)),
        }
    }

    pub async fn find_by_id(&mut self, id: BookId) -> Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM book WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(book)
    }

    pub async fn find_by_person_id(&mut self, person_id: UserId) -> Result<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM book WHERE person_id = $1 ORDER BY id")
            .bind(person_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(books)
    }

    pub async fn remove(&mut self, book: &Book) -> Result<bool> {
        let Some(id) = book.id else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM book WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_person_id(&mut self, person_id: UserId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM book WHERE person_id = $1")
            .bind(person_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait::async_trait]
impl<'c> BookRepository for Books<'c> {
    #[instrument(skip(self, book), err)]
    async fn create(&mut self, book: &BookDto) -> Result<BookDto> {
        let entity = Book {
            id: None,
            ..Book::from(book.clone())
        };

        Ok(self.save(entity).await?.into())
    }

    #[instrument(skip(self, book), err)]
    async fn update(&mut self, id: BookId, book: &BookDto) -> Result<BookDto> {
        let current = self.find_by_id(id).await?.ok_or_else(|| book_not_found(id))?;

        Ok(self.save(current.apply_update(book)).await?.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: BookId) -> Result<BookDto> {
        self.find_by_id(id).await?.map(BookDto::from).ok_or_else(|| book_not_found(id))
    }

    #[instrument(skip(self), err)]
    async fn list_by_owner(&mut self, owner_id: UserId) -> Result<Vec<BookDto>> {
        let books = self.find_by_person_id(owner_id).await?;
        if books.is_empty() {
            return Err(owner_books_not_found(owner_id));
        }

        Ok(books.into_iter().map(BookDto::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: BookId) -> Result<bool> {
        match self.find_by_id(id).await? {
            Some(book) => self.remove(&book).await,
            None => Ok(false),
        }
    }

    #[instrument(skip(self), err)]
    async fn delete_by_owner(&mut self, owner_id: UserId) -> Result<u64> {
        let books = self.find_by_person_id(owner_id).await?;
        tracing::debug!(owner_id, count = books.len(), "Deleting books of owner");

        self.delete_by_person_id(owner_id).await
    }
}

//! Database models for users (stored in the `person` table).

use crate::api::models::users::UserRequest;
use crate::types::UserId;
use sqlx::{FromRow, Row, postgres::PgRow};

/// Transport shape shared by every persistence strategy.
///
/// Fields are optional because callers may omit them; a missing value reaches the store as NULL
/// and is rejected there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDto {
    pub id: Option<UserId>,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub age: Option<i32>,
    pub country: Option<String>,
}

impl UserDto {
    /// Decode a `person` row by column name
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            title: row.try_get("title")?,
            age: row.try_get("age")?,
            country: row.try_get("country")?,
        })
    }

    /// Overwrite every field except `id` with the values from `update`
    pub fn apply_update(mut self, update: &UserDto) -> Self {
        self.full_name = update.full_name.clone();
        self.title = update.title.clone();
        self.age = update.age;
        self.country = update.country.clone();
        self
    }
}

/// Entity decoded straight from a `person` row. An entity without an id has not been saved yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct Person {
    pub id: Option<UserId>,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub age: Option<i32>,
    pub country: Option<String>,
}

impl Person {
    /// Overwrite every field except `id` with the values from `update`
    pub fn apply_update(mut self, update: &UserDto) -> Self {
        self.full_name = update.full_name.clone();
        self.title = update.title.clone();
        self.age = update.age;
        self.country = update.country.clone();
        self
    }
}

impl From<UserRequest> for UserDto {
    fn from(request: UserRequest) -> Self {
        Self {
            id: None,
            full_name: request.full_name,
            title: request.title,
            age: request.age,
            country: request.country,
        }
    }
}

impl From<UserDto> for UserRequest {
    fn from(dto: UserDto) -> Self {
        Self {
            full_name: dto.full_name,
            title: dto.title,
            age: dto.age,
            country: dto.country,
        }
    }
}

impl From<UserDto> for Person {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            full_name: dto.full_name,
            title: dto.title,
            age: dto.age,
            country: dto.country,
        }
    }
}

impl From<Person> for UserDto {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            full_name: person.full_name,
            title: person.title,
            age: person.age,
            country: person.country,
        }
    }
}

//! A small statement runner: bind a parameter list, map rows with a closure, fetch generated keys.
//!
//! ```ignore
//! let mut helper = SqlHelper::new(&mut conn);
//! let books = helper
//!     .query("SELECT * FROM book WHERE person_id = $1", &[SqlParam::from(owner_id)], BookDto::from_row)
//!     .await?;
//! ```

use crate::db::errors::Result;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgConnection, Postgres, Row};
use tracing::instrument;

/// A positional statement parameter. `None` binds SQL NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    BigInt(Option<i64>),
    Int(Option<i32>),
    Text(Option<String>),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::BigInt(Some(value))
    }
}

impl From<Option<i64>> for SqlParam {
    fn from(value: Option<i64>) -> Self {
        SqlParam::BigInt(value)
    }
}

impl From<Option<i32>> for SqlParam {
    fn from(value: Option<i32>) -> Self {
        SqlParam::Int(value)
    }
}

impl From<Option<String>> for SqlParam {
    fn from(value: Option<String>) -> Self {
        SqlParam::Text(value)
    }
}

pub struct SqlHelper<'c> {
    db: &'c mut PgConnection,
}

impl<'c> SqlHelper<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    fn bind_all<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, Postgres, PgArguments> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                SqlParam::BigInt(value) => query.bind(*value),
                SqlParam::Int(value) => query.bind(*value),
                SqlParam::Text(value) => query.bind(value.as_deref()),
            };
        }
        query
    }

    /// Run a query and map every returned row
    #[instrument(skip(self, params, mapper), err)]
    pub async fn query<T, F>(&mut self, sql: &str, params: &[SqlParam], mapper: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&PgRow) -> std::result::Result<T, sqlx::Error> + Send,
    {
        let rows = Self::bind_all(sql, params).fetch_all(&mut *self.db).await?;
        let mapped = rows.iter().map(mapper).collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(mapped)
    }

    /// Run a data-modifying statement; returns the number of affected rows
    #[instrument(skip(self, params), err)]
    pub async fn update(&mut self, sql: &str, params: &[SqlParam]) -> Result<u64> {
        let result = Self::bind_all(sql, params).execute(&mut *self.db).await?;
        Ok(result.rows_affected())
    }

    /// Run an INSERT and return the generated value of `key_column`
    #[instrument(skip(self, params), err)]
    pub async fn insert_returning_key(&mut self, sql: &str, params: &[SqlParam], key_column: &str) -> Result<i64> {
        let sql = format!("{sql} RETURNING {key_column}");
        let row = Self::bind_all(&sql, params).fetch_one(&mut *self.db).await?;
        Ok(row.try_get(key_column)?)
    }
}

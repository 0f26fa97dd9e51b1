//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern, with three interchangeable implementations
//! of each repository.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Services   │  (services - transactions spanning users and books)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - one module per persistence strategy)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - DTOs, entities and row mappers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository traits and their implementations
//! - [`models`]: Database record structures matching table schemas
//! - [`helper`]: Statement runner used by the helper strategy
//! - [`pool`]: Connection pool construction
//! - [`errors`]: Database-specific error types
//!
//! # Transactions
//!
//! Repositories borrow a `PgConnection`, so they work the same over a pooled connection or a
//! transaction:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let user = strategy.users(&mut tx).create(&dto).await?;
//! tx.commit().await?;
//! ```
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! bookshelf::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod helper;
pub mod models;
pub mod pool;

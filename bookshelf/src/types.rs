//! Common type definitions.
//!
//! - Type aliases for entity IDs ([`UserId`], [`BookId`])
//! - [`Resource`], naming which entity an error or log line is about

use std::fmt;

// Type aliases for IDs. Both are BIGSERIAL in the store.
pub type UserId = i64;
pub type BookId = i64;

// Resources exposed over the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    User,
    Book,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::User => write!(f, "User"),
            Resource::Book => write!(f, "Book"),
        }
    }
}

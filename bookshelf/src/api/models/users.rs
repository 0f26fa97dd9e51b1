//! API request/response models for users.

use super::books::BookRequest;
use crate::types::{BookId, UserId};
use serde::{Deserialize, Serialize};

// User request models
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub country: Option<String>,
    pub age: Option<i32>,
}

/// A user together with the books it should own. Null entries in `bookRequests` are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookRequest {
    pub user_request: Option<UserRequest>,
    #[serde(default)]
    pub book_requests: Option<Vec<Option<BookRequest>>>,
}

impl UserBookRequest {
    /// The non-null book requests, in order
    pub fn books(self) -> Vec<BookRequest> {
        self.book_requests.unwrap_or_default().into_iter().flatten().collect()
    }
}

// User response models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookResponse {
    pub user_id: UserId,
    pub books_id_list: Vec<BookId>,
}

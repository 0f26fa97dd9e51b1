//! API request/response models for books.

use crate::db::models::books::BookDto;
use crate::types::{BookId, UserId};
use serde::{Deserialize, Serialize};

/// `userId` names the owner on create and is ignored on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub user_id: Option<UserId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: Option<BookId>,
    pub user_id: Option<UserId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: Option<i64>,
}

impl From<BookDto> for BookResponse {
    fn from(dto: BookDto) -> Self {
        Self {
            id: dto.id,
            user_id: dto.user_id,
            title: dto.title,
            author: dto.author,
            page_count: dto.page_count,
        }
    }
}

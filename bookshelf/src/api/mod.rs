//! HTTP API layer.
//!
//! All routes are mounted under the configured `api.base_path` (default `/api/v1`):
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | POST | `/book/create` | [`handlers::books::create_book`] |
//! | PUT | `/book/update/{bookId}` | [`handlers::books::update_book`] |
//! | GET | `/book/get/{bookId}` | [`handlers::books::get_book`] |
//! | DELETE | `/book/delete/{bookId}` | [`handlers::books::delete_book`] |
//! | POST | `/user/create` | [`handlers::users::create_user_with_books`] |
//! | PUT | `/user/update/{userId}` | [`handlers::users::update_user_with_books`] |
//! | GET | `/user/get/{userId}` | [`handlers::users::get_user_with_books`] |
//! | DELETE | `/user/delete/{userId}` | [`handlers::users::delete_user_with_books`] |
//!
//! Both create routes require the request-id header.

pub mod extractors;
pub mod handlers;
pub mod models;

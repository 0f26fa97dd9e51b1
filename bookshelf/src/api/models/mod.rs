//! API request and response data models.
//!
//! These types define the JSON shapes of the HTTP surface. All of them use camelCase field
//! names. Request fields are optional; absent values are reported by the validation layer or
//! rejected by the store.

pub mod books;
pub mod users;

//! Operations exposed to the HTTP handlers.
//!
//! Services own connection and transaction handling and pick repositories according to the
//! configured [`crate::config::PersistenceStrategy`].

pub mod books;
pub mod user_books;

pub use books::BookService;
pub use user_books::UserBookService;

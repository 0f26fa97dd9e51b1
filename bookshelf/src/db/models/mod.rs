//! Database record models matching table schemas.
//!
//! Each file carries two shapes per table:
//!
//! - a DTO (`UserDto`, `BookDto`) that every persistence strategy accepts and returns, with a
//!   named-column row mapper (`from_row`) used by the helper strategy
//! - an entity (`Person`, `Book`) deriving `sqlx::FromRow`, used by the ORM strategy
//!
//! Conversions between the API request types, DTOs and entities are `From` impls. The only
//! field rename is the book owner: `user_id` on the DTO, `person_id` on the entity.

pub mod books;
pub mod users;

//! SeaORM entity definitions.
//!
//! These entities are used for database access only and are kept separate
//! from the business entities in the models module. The storage layer
//! performs CRUD with them and converts into the business entities.

pub mod prelude;

pub mod essays;
pub mod evaluations;
pub mod users;

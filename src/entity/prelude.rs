pub use super::essays::Entity as Essays;
pub use super::evaluations::Entity as Evaluations;
pub use super::users::Entity as Users;

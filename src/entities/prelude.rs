pub use super::cases::Entity as Cases;
pub use super::proceedings::Entity as Proceedings;
pub use super::users::Entity as Users;

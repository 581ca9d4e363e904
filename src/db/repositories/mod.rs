pub mod case;
pub mod proceeding;
pub mod user;

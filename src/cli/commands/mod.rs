mod add_user;

pub use add_user::cmd_add_user;

pub mod prelude;

pub mod cases;
pub mod proceedings;
pub mod users;

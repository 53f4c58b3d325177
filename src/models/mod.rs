pub mod account;
pub mod user;

pub use account::*;
pub use user::*;

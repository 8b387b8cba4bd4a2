pub mod auth_service;
pub mod container;
pub mod user_service;

pub use auth_service::*;
pub use container::*;
pub use user_service::*;

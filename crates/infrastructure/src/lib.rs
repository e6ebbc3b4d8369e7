pub mod dynamodb;
pub mod models;
pub mod repositories;
pub mod retry;

pub use dynamodb::*;
pub use models::*;
pub use repositories::*;
pub use retry::*;

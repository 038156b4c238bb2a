pub mod connection;
pub mod histories;
pub mod matches;
pub mod models;
pub mod players;
pub mod setup;
pub mod tournaments;
pub mod users;

pub use connection::{create_memory_pool, create_pool, get_connection, DbPool};
pub use models::*;

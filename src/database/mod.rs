pub mod manager;
pub mod models;
pub mod params;

pub use manager::{DatabaseError, DatabaseManager};

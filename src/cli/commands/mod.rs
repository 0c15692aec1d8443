pub mod health;
pub mod password;
pub mod token;

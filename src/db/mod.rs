pub mod auth;
pub mod connection;
pub mod valuations;

pub use connection::{init_db, Database};

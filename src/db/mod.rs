pub mod models;
pub mod pool;
pub mod sqlite;
pub mod store;

pub mod auth;
pub mod logs;
pub mod products;
pub mod stats;
pub mod users;

pub mod auth;
pub mod log;
pub mod product;
pub mod stats;

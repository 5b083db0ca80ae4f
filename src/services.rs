pub mod auth;
pub mod product_service;
pub mod stats_service;
pub mod user_service;

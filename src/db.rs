pub mod log_repo;
pub mod product_repo;
pub mod stats_repo;
pub mod user_repo;

pub use log_repo::LogRepository;
pub use product_repo::ProductRepository;
pub use stats_repo::StatsRepository;
pub use user_repo::UserRepository;

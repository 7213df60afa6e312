pub mod app_config;
pub mod database;
pub mod memory;
pub mod tee_time_repo;

pub use app_config::Config;
pub use database::DbClient;
pub use memory::MemoryTeeTimeRepository;
pub use tee_time_repo::PgTeeTimeRepository;

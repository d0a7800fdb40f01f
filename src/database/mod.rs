pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryProjectRepository;
pub use repository::{PgProjectRepository, ProjectRepository};

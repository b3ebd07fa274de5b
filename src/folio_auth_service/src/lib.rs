pub mod auth_service;
pub mod helpers;
pub mod sweeper;
pub mod tracing;

pub use auth_service::AuthService;
pub use helpers::{configure_postgresql, get_postgres_pool};
pub use sweeper::spawn_expiry_sweeper;
pub use tracing::init_tracing;

// Client infrastructure implementations
pub mod repository;
pub mod service;

// Re-export for convenience
pub use repository::PgClientRepository;
pub use service::ClientServiceImpl;

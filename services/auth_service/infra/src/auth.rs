// Auth infrastructure implementations
pub mod repository;
pub mod service;
pub mod session_repository;

// Re-export for convenience
pub use repository::PgUserRepository;
pub use service::AuthServiceImpl;
pub use session_repository::PgSessionRepository;

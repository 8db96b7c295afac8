// OAuth infrastructure implementations
pub mod bootstrap;
pub mod code_repository;
pub mod consent_repository;
pub mod scope_repository;
pub mod service;

// Re-export for convenience
pub use bootstrap::ensure_system_client;
pub use code_repository::PgAuthorizationCodeRepository;
pub use consent_repository::PgConsentRepository;
pub use scope_repository::PgScopeRepository;
pub use service::OAuthServiceImpl;

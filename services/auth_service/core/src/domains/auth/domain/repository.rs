use super::model::{Session, User};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// User repository trait
///
/// Defines the interface for user data access. Email lookups are
/// case-insensitive; the stored email is always lowercased.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Find user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Find user by username (exact match)
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Create a new user
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Update a user
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Check if a username is already taken
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
}

/// Session repository trait
///
/// Lookup semantics: a session read at or past its expiry is deleted within
/// the same call and reported as absent.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session
    async fn create(&self, session: &Session) -> Result<Session, AppError>;

    /// Find a live session by id, atomically deleting it when expired
    async fn find_valid_by_id(&self, id: &str) -> Result<Option<Session>, AppError>;

    /// All non-expired sessions for a user
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, AppError>;

    /// Delete a session by id (idempotent)
    async fn delete_by_id(&self, id: &str) -> Result<(), AppError>;

    /// Delete all sessions for a user, returning the count removed
    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, AppError>;

    /// Delete all expired sessions, returning the count removed
    async fn delete_expired(&self) -> Result<u64, AppError>;
}

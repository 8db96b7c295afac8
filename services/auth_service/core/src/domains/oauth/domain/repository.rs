use super::model::{AuthorizationCode, Consent, ScopeDefinition};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_error::AppError;
use uuid::Uuid;

/// Authorization code repository trait
#[async_trait]
pub trait AuthorizationCodeRepository: Send + Sync {
    /// Persist a freshly issued code
    async fn create(&self, code: &AuthorizationCode) -> Result<AuthorizationCode, AppError>;

    /// Find a code by its opaque value
    async fn find_by_code(&self, code: &str) -> Result<Option<AuthorizationCode>, AppError>;

    /// Compare-and-set the single-use flag. Returns true when this call
    /// performed the transition; a concurrent second exchange sees false.
    async fn mark_used(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError>;

    /// Delete expired codes, returning the count removed
    async fn delete_expired(&self) -> Result<u64, AppError>;
}

/// Consent ledger repository trait
///
/// Invariant: at most one row per `(user_id, client_id)` has
/// `revoked_at IS NULL`, enforced by a partial unique index.
#[async_trait]
pub trait ConsentRepository: Send + Sync {
    /// The active consent for a user/client pair, if any
    async fn find_active(&self, user_id: Uuid, client_id: Uuid)
        -> Result<Option<Consent>, AppError>;

    /// Full ledger (active and revoked) for a user
    async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Consent>, AppError>;

    /// Active consents for a user
    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<Consent>, AppError>;

    /// Find a consent row by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Consent>, AppError>;

    /// Auto-revoke swap: within one transaction, revoke the active row for
    /// the pair (if any) and insert the new row. No observer sees two active
    /// rows nor zero during the swap.
    async fn save(&self, consent: &Consent) -> Result<Consent, AppError>;

    /// Set `revoked_at` on a row; revoking an already-revoked row is a no-op
    async fn revoke(&self, id: Uuid) -> Result<(), AppError>;
}

/// Scope definition repository trait
#[async_trait]
pub trait ScopeRepository: Send + Sync {
    /// All known scopes
    async fn find_all(&self) -> Result<Vec<ScopeDefinition>, AppError>;

    /// Definitions for the given scope names (unknown names are absent)
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<ScopeDefinition>, AppError>;

    /// The first default scope, if one is defined
    async fn find_default(&self) -> Result<Option<ScopeDefinition>, AppError>;

    /// Insert a scope definition (bootstrap seeding)
    async fn create(&self, scope: &ScopeDefinition) -> Result<ScopeDefinition, AppError>;
}

use super::model::Client;
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// Client repository trait
///
/// Clients are soft-deleted via `is_active`; no operation hard-deletes a row.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Find by internal id (any active state)
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError>;

    /// Find by external client identifier (any active state)
    async fn find_by_client_id(&self, client_id: &str) -> Result<Option<Client>, AppError>;

    /// Active clients owned by a user, newest first
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Client>, AppError>;

    /// The system client with the given role, if bootstrapped
    async fn find_system_client(&self, system_role: &str) -> Result<Option<Client>, AppError>;

    /// Create a new client
    async fn create(&self, client: &Client) -> Result<Client, AppError>;

    /// Update a client
    async fn update(&self, client: &Client) -> Result<Client, AppError>;
}

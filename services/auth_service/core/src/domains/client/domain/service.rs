use super::model::Client;
use crate::domains::auth::domain::model::User;
use crate::domains::client::dto::client_dto::{
    ClientResp, CreateClientReq, CreateClientResp, RotateSecretResp, UpdateClientReq,
};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// Client lifecycle use cases
///
/// All mutating operations are gated on ownership; creation additionally
/// requires developer access.
#[async_trait]
pub trait ClientService: Send + Sync + 'static {
    /// Register a new OAuth client for a developer. The response carries the
    /// plaintext secret exactly once.
    async fn create(&self, caller: &User, req: CreateClientReq)
        -> Result<CreateClientResp, AppError>;

    /// Active clients owned by the caller, newest first
    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<ClientResp>, AppError>;

    /// Fetch an owned client
    async fn get_owned(&self, owner_id: Uuid, id: Uuid) -> Result<ClientResp, AppError>;

    /// Partial update of an owned client
    async fn update_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        req: UpdateClientReq,
    ) -> Result<ClientResp, AppError>;

    /// Soft delete (`is_active = false`); idempotent when already inactive
    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError>;

    /// Rotate the secret, keeping the previous one valid for the grace window
    async fn rotate_secret(&self, owner_id: Uuid, id: Uuid) -> Result<RotateSecretResp, AppError>;

    /// Verify a client secret, accepting the rotated-out secret while its
    /// grace window is open. Returns the client on success.
    async fn authenticate(&self, client_id: &str, secret: &str) -> Result<Client, AppError>;
}

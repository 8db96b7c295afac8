use crate::extractors::DeveloperSession;
use crate::handlers::AppState;
use auth_service_core::domains::auth::domain::service::AuthService;
use auth_service_core::domains::auth::dto::auth_dto::ErrorResp;
use auth_service_core::domains::client::domain::service::ClientService;
use auth_service_core::domains::client::dto::client_dto::{
    ClientListResp, ClientResp, CreateClientReq, CreateClientResp, RotateSecretResp,
    UpdateClientReq,
};
use auth_service_core::domains::oauth::domain::service::OAuthService;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared_error::AppError;
use uuid::Uuid;
use validator::Validate;

/// Register a new OAuth client
///
/// The response is the only place the plaintext secret ever appears.
#[utoipa::path(
    post,
    path = "/client",
    tag = "client",
    operation_id = "create_client",
    request_body = CreateClientReq,
    responses(
        (status = 201, description = "Client created; response contains the plaintext secret", body = CreateClientResp),
        (status = 403, description = "Developer access required", body = ErrorResp),
    )
)]
pub async fn create_client<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    DeveloperSession(user): DeveloperSession,
    Json(payload): Json<CreateClientReq>,
) -> Result<(StatusCode, Json<CreateClientResp>), AppError> {
    payload.validate().map_err(AppError::from_validation)?;

    let resp = state.client_service.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// List the caller's active clients, newest first
#[utoipa::path(
    get,
    path = "/client",
    tag = "client",
    operation_id = "list_clients",
    responses(
        (status = 200, description = "Owned clients", body = ClientListResp),
        (status = 403, description = "Developer access required", body = ErrorResp),
    )
)]
pub async fn list_clients<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    DeveloperSession(user): DeveloperSession,
) -> Result<Json<ClientListResp>, AppError> {
    let clients = state.client_service.list_owned(user.id).await?;
    Ok(Json(ClientListResp { clients }))
}

/// Fetch one owned client
#[utoipa::path(
    get,
    path = "/client/{id}",
    tag = "client",
    operation_id = "get_client",
    params(("id" = Uuid, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client", body = ClientResp),
        (status = 403, description = "Not the owner", body = ErrorResp),
        (status = 404, description = "Client not found", body = ErrorResp),
    )
)]
pub async fn get_client<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    DeveloperSession(user): DeveloperSession,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientResp>, AppError> {
    let client = state.client_service.get_owned(user.id, id).await?;
    Ok(Json(client))
}

/// Update an owned client
#[utoipa::path(
    put,
    path = "/client/{id}",
    tag = "client",
    operation_id = "update_client",
    params(("id" = Uuid, Path, description = "Client id")),
    request_body = UpdateClientReq,
    responses(
        (status = 200, description = "Client updated", body = ClientResp),
        (status = 403, description = "Not the owner", body = ErrorResp),
        (status = 404, description = "Client not found", body = ErrorResp),
    )
)]
pub async fn update_client<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    DeveloperSession(user): DeveloperSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientReq>,
) -> Result<Json<ClientResp>, AppError> {
    payload.validate().map_err(AppError::from_validation)?;

    let client = state.client_service.update_owned(user.id, id, payload).await?;
    Ok(Json(client))
}

/// Soft-delete an owned client (idempotent)
#[utoipa::path(
    delete,
    path = "/client/{id}",
    tag = "client",
    operation_id = "delete_client",
    params(("id" = Uuid, Path, description = "Client id")),
    responses(
        (status = 204, description = "Client deactivated"),
        (status = 403, description = "Not the owner", body = ErrorResp),
        (status = 404, description = "Client not found", body = ErrorResp),
    )
)]
pub async fn delete_client<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    DeveloperSession(user): DeveloperSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.client_service.soft_delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rotate the client secret with a 24-hour grace window
#[utoipa::path(
    post,
    path = "/client/{id}/rotate-secret",
    tag = "client",
    operation_id = "rotate_client_secret",
    params(("id" = Uuid, Path, description = "Client id")),
    responses(
        (status = 200, description = "Secret rotated; response contains the new plaintext secret", body = RotateSecretResp),
        (status = 403, description = "Not the owner", body = ErrorResp),
        (status = 404, description = "Client not found", body = ErrorResp),
    )
)]
pub async fn rotate_client_secret<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    DeveloperSession(user): DeveloperSession,
    Path(id): Path<Uuid>,
) -> Result<Json<RotateSecretResp>, AppError> {
    let resp = state.client_service.rotate_secret(user.id, id).await?;
    Ok(Json(resp))
}

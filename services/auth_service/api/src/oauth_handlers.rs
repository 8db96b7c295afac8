use crate::extractors::{BearerAuth, SessionAuth};
use crate::handlers::AppState;
use auth_service_core::domains::auth::domain::service::AuthService;
use auth_service_core::domains::auth::dto::auth_dto::ErrorResp;
use auth_service_core::domains::client::domain::service::ClientService;
use auth_service_core::domains::oauth::domain::service::OAuthService;
use auth_service_core::domains::oauth::dto::oauth_dto::{
    AuthorizeOutcome, AuthorizeQuery, AuthorizeRedirect, ConsentDecisionReq, ConsentListResp,
    ConsentRequiredResp, TokenReq, TokenResp,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use shared_error::AppError;
use shared_jwt::JwksDocument;
use uuid::Uuid;
use validator::Validate;

fn redirect_response(redirect: AuthorizeRedirect) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, redirect.location())],
    )
        .into_response()
}

/// Begin the authorization flow
///
/// Consent already on file (or a system client) answers with a 302 carrying
/// a fresh code; otherwise the consent-required payload comes back for the
/// render layer.
#[utoipa::path(
    get,
    path = "/auth/authorize",
    tag = "oauth",
    operation_id = "authorize",
    params(AuthorizeQuery),
    responses(
        (status = 302, description = "Redirect with authorization code"),
        (status = 200, description = "Consent required", body = ConsentRequiredResp),
        (status = 401, description = "Unknown client or no session", body = ErrorResp),
    )
)]
pub async fn authorize<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    SessionAuth(user): SessionAuth,
    Query(query): Query<AuthorizeQuery>,
) -> Result<Response, AppError> {
    query.validate().map_err(AppError::from_validation)?;

    match state.oauth_service.begin_authorize(&user, query).await? {
        AuthorizeOutcome::Redirect(redirect) => Ok(redirect_response(redirect)),
        AuthorizeOutcome::ConsentRequired(resp) => Ok(Json(*resp).into_response()),
    }
}

/// Record the consent decision
#[utoipa::path(
    post,
    path = "/auth/authorize/decision",
    tag = "oauth",
    operation_id = "consent_decision",
    request_body = ConsentDecisionReq,
    responses(
        (status = 302, description = "Approved; redirect with authorization code"),
        (status = 401, description = "Consent denied", body = ErrorResp),
    )
)]
pub async fn consent_decision<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    SessionAuth(user): SessionAuth,
    Json(payload): Json<ConsentDecisionReq>,
) -> Result<Response, AppError> {
    payload.validate().map_err(AppError::from_validation)?;

    let redirect = state.oauth_service.decide_consent(&user, payload).await?;
    Ok(redirect_response(redirect))
}

/// Exchange an authorization code for an access token
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "oauth",
    operation_id = "token",
    responses(
        (status = 200, description = "Access token issued", body = TokenResp),
        (status = 401, description = "Code or PKCE verification failed", body = ErrorResp),
    )
)]
pub async fn token<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    Form(payload): Form<TokenReq>,
) -> Result<Json<TokenResp>, AppError> {
    payload.validate().map_err(AppError::from_validation)?;

    let resp = state.oauth_service.exchange_token(payload).await?;
    Ok(Json(resp))
}

/// Public signing keys
#[utoipa::path(
    get,
    path = "/auth/.well-known/jwks.json",
    tag = "oauth",
    operation_id = "jwks",
    responses(
        (status = 200, description = "JSON Web Key Set"),
    )
)]
pub async fn jwks<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
) -> Json<JwksDocument> {
    Json(state.oauth_service.jwks().clone())
}

/// Active consents of the current user
#[utoipa::path(
    get,
    path = "/user/me/consents",
    tag = "user",
    operation_id = "list_consents",
    responses(
        (status = 200, description = "Active consents", body = ConsentListResp),
        (status = 401, description = "Invalid token", body = ErrorResp),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_consents<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    BearerAuth(claims): BearerAuth,
) -> Result<Json<ConsentListResp>, AppError> {
    let consents = state.oauth_service.list_consents(claims.sub).await?;
    Ok(Json(ConsentListResp { consents }))
}

/// Revoke one of the current user's consents
#[utoipa::path(
    delete,
    path = "/user/me/consents/{id}",
    tag = "user",
    operation_id = "revoke_consent",
    params(("id" = Uuid, Path, description = "Consent id")),
    responses(
        (status = 204, description = "Consent revoked"),
        (status = 403, description = "Not the consent owner", body = ErrorResp),
        (status = 404, description = "Consent not found", body = ErrorResp),
    ),
    security(("bearer_auth" = []))
)]
pub async fn revoke_consent<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    BearerAuth(claims): BearerAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.oauth_service.revoke_consent(claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

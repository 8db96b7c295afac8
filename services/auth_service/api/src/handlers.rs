use crate::cookie_helper::set_session_cookie;
use crate::extractors::{BearerAuth, SessionAuth};
use auth_service_core::domains::auth::{domain::service::AuthService, dto::auth_dto::*};
use auth_service_core::domains::client::domain::service::ClientService;
use auth_service_core::domains::oauth::domain::service::OAuthService;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Html,
    Json,
};
use chrono::Utc;
use shared_config::Config;
use shared_error::AppError;
use shared_jwt::JwtSigner;
use std::sync::Arc;
use validator::Validate;

/// Application state containing service dependencies
pub struct AppState<A, C, O>
where
    A: AuthService,
    C: ClientService,
    O: OAuthService,
{
    pub auth_service: Arc<A>,
    pub client_service: Arc<C>,
    pub oauth_service: Arc<O>,
    pub signer: Arc<JwtSigner>,
    pub config: Arc<Config>,
}

impl<A, C, O> Clone for AppState<A, C, O>
where
    A: AuthService,
    C: ClientService,
    O: OAuthService,
{
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            client_service: Arc::clone(&self.client_service),
            oauth_service: Arc::clone(&self.oauth_service),
            signer: Arc::clone(&self.signer),
            config: Arc::clone(&self.config),
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    operation_id = "health_check",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResp),
    )
)]
pub async fn health_check() -> Json<HealthResp> {
    Json(HealthResp {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Minimal login form; a richer render layer can replace this
#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "auth",
    operation_id = "login_form",
    responses(
        (status = 200, description = "Login form", content_type = "text/html"),
    )
)]
pub async fn login_form() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html>
  <head><title>Sign in</title></head>
  <body>
    <form method="post" action="/auth/login">
      <label>Email or username <input name="emailOrUsername" autocomplete="username"></label>
      <label>Password <input type="password" name="password" autocomplete="current-password"></label>
      <label><input type="checkbox" name="rememberMe" value="true"> Remember me</label>
      <button type="submit">Sign in</button>
    </form>
  </body>
</html>
"#,
    )
}

/// Authenticate and set the session cookie
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    operation_id = "login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = LoginResp),
        (status = 401, description = "Invalid credentials", body = ErrorResp),
    )
)]
pub async fn login<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    Json(payload): Json<LoginReq>,
) -> Result<(HeaderMap, Json<LoginResp>), AppError> {
    payload.validate().map_err(AppError::from_validation)?;

    let resp = state.auth_service.login(payload).await?;

    let max_age = (resp.expires_at - Utc::now()).num_seconds().max(0);
    let mut headers = HeaderMap::new();
    set_session_cookie(&mut headers, &resp.session_id, max_age, state.config.is_production())
        .map_err(AppError::InternalError)?;

    Ok((headers, Json(resp)))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/user/",
    tag = "user",
    operation_id = "register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered", body = RegisterResp),
        (status = 400, description = "Invalid request", body = ErrorResp),
        (status = 422, description = "Email or username already taken", body = ErrorResp),
    )
)]
pub async fn register<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    Json(payload): Json<RegisterReq>,
) -> Result<(StatusCode, Json<RegisterResp>), AppError> {
    payload.validate().map_err(AppError::from_validation)?;

    let resp = state.auth_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// Current user
#[utoipa::path(
    get,
    path = "/user/me",
    tag = "user",
    operation_id = "me",
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Invalid token", body = ErrorResp),
    ),
    security(("bearer_auth" = []))
)]
pub async fn me<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    BearerAuth(claims): BearerAuth,
) -> Result<Json<UserInfo>, AppError> {
    let user = state.auth_service.get_user(claims.sub).await?;
    Ok(Json(user))
}

/// Update profile fields
#[utoipa::path(
    put,
    path = "/user/me",
    tag = "user",
    operation_id = "update_me",
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Profile updated", body = UserInfo),
        (status = 422, description = "Username already taken", body = ErrorResp),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    BearerAuth(claims): BearerAuth,
    Json(payload): Json<UpdateProfileReq>,
) -> Result<Json<UserInfo>, AppError> {
    payload.validate().map_err(AppError::from_validation)?;

    let user = state.auth_service.update_profile(claims.sub, payload).await?;
    Ok(Json(user))
}

/// Change password, optionally revoking every session
#[utoipa::path(
    put,
    path = "/user/me/password",
    tag = "user",
    operation_id = "change_password",
    request_body = ChangePasswordReq,
    responses(
        (status = 200, description = "Password changed", body = ChangePasswordResp),
        (status = 401, description = "Current password incorrect", body = ErrorResp),
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    BearerAuth(claims): BearerAuth,
    Json(payload): Json<ChangePasswordReq>,
) -> Result<Json<ChangePasswordResp>, AppError> {
    payload.validate().map_err(AppError::from_validation)?;

    let resp = state.auth_service.change_password(claims.sub, payload).await?;
    Ok(Json(resp))
}

/// Enable developer access for the logged-in user
#[utoipa::path(
    put,
    path = "/user/me/upgrade/developer",
    tag = "user",
    operation_id = "upgrade_developer",
    responses(
        (status = 200, description = "Developer access enabled", body = UpgradeResp),
        (status = 401, description = "Already a developer", body = ErrorResp),
    )
)]
pub async fn upgrade_developer<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    SessionAuth(user): SessionAuth,
) -> Result<Json<UpgradeResp>, AppError> {
    let resp = state.auth_service.upgrade_to_developer(user.id).await?;
    Ok(Json(resp))
}

/// Enable expenses access for the logged-in user
#[utoipa::path(
    put,
    path = "/user/me/upgrade/expenses",
    tag = "user",
    operation_id = "upgrade_expenses",
    responses(
        (status = 200, description = "Expenses access enabled", body = UpgradeResp),
        (status = 401, description = "Already enabled", body = ErrorResp),
    )
)]
pub async fn upgrade_expenses<A: AuthService, C: ClientService, O: OAuthService>(
    State(state): State<AppState<A, C, O>>,
    SessionAuth(user): SessionAuth,
) -> Result<Json<UpgradeResp>, AppError> {
    let resp = state.auth_service.enable_expenses(user.id).await?;
    Ok(Json(resp))
}

//! Authentication extractors: session cookie, bearer JWT, developer gate.

use crate::cookie_helper::{get_cookie_value, SESSION_COOKIE};
use crate::handlers::AppState;
use auth_service_core::domains::auth::domain::model::User;
use auth_service_core::domains::auth::domain::service::AuthService;
use auth_service_core::domains::client::domain::service::ClientService;
use auth_service_core::domains::oauth::domain::service::OAuthService;
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use shared_error::AppError;
use shared_jwt::Claims;

/// Authenticated login session; resolves the `session_id` cookie to its user
pub struct SessionAuth(pub User);

impl<A, C, O> FromRequestParts<AppState<A, C, O>> for SessionAuth
where
    A: AuthService,
    C: ClientService,
    O: OAuthService,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<A, C, O>,
    ) -> Result<Self, Self::Rejection> {
        let session_id =
            get_cookie_value(&parts.headers, SESSION_COOKIE).ok_or(AppError::InvalidSession)?;
        let (_session, user) = state.auth_service.find_session_user(&session_id).await?;
        Ok(SessionAuth(user))
    }
}

/// Session-authenticated developer; the gate for client management
pub struct DeveloperSession(pub User);

impl<A, C, O> FromRequestParts<AppState<A, C, O>> for DeveloperSession
where
    A: AuthService,
    C: ClientService,
    O: OAuthService,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<A, C, O>,
    ) -> Result<Self, Self::Rejection> {
        let SessionAuth(user) = SessionAuth::from_request_parts(parts, state).await?;
        if !user.is_developer {
            return Err(AppError::Forbidden("Developer access required".to_string()));
        }
        Ok(DeveloperSession(user))
    }
}

/// Bearer-authenticated request; carries the verified access token claims
pub struct BearerAuth(pub Claims);

impl<A, C, O> FromRequestParts<AppState<A, C, O>> for BearerAuth
where
    A: AuthService,
    C: ClientService,
    O: OAuthService,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<A, C, O>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or(AppError::InvalidToken)?;
        let claims = state.signer.verify(&token)?;
        Ok(BearerAuth(claims))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_bearer_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_extract_bearer_token_missing_header() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_extract_bearer_token_empty_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer "),
        );
        assert_eq!(extract_bearer_token(&headers), None);
    }
}

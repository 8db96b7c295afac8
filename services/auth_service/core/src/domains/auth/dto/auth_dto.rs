use crate::domains::auth::domain::model::User;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Username charset and length: `[A-Za-z0-9_-]{3,32}`
pub static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,32}$").expect("valid username regex"));

/// Standard error response
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResp {
    /// Stable error code
    #[schema(example = "INVALID_CREDENTIALS")]
    pub error: String,

    /// Human-readable message
    #[schema(example = "Invalid credentials")]
    pub message: String,

    /// HTTP status code echoed in the body
    #[schema(example = 401)]
    pub status_code: u16,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResp {
    /// Service status
    #[schema(example = "ok")]
    pub status: String,

    /// Service version
    #[schema(example = "0.1.0")]
    pub version: String,

    /// Current timestamp
    pub timestamp: DateTime<Utc>,
}

/// User registration request
///
/// `accountType` selects the initial flag set: `user` accounts get expenses
/// access, `developer` accounts may register OAuth clients. Defaults to
/// `user` when unspecified.
#[derive(Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    /// Email address (unique, stored lowercased)
    #[validate(email)]
    #[schema(example = "user@example.com")]
    pub email: String,

    /// Optional unique username, 3-32 chars of `[A-Za-z0-9_-]`
    #[validate(regex(path = *USERNAME_RE, message = "username must be 3-32 chars of [A-Za-z0-9_-]"))]
    #[schema(example = "john_doe")]
    pub username: Option<String>,

    /// Password (min 8 characters, checked against the strength policy)
    #[validate(length(min = 8))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,

    /// Full name of the user
    #[schema(example = "John Doe")]
    pub full_name: Option<String>,

    /// Account type: "user" (default) or "developer"
    #[schema(example = "user")]
    pub account_type: Option<String>,
}

/// Registration response
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResp {
    pub user: UserInfo,

    #[schema(example = "Registration successful")]
    pub message: String,
}

/// Login request
#[derive(Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginReq {
    /// Email address or username
    #[validate(length(min = 1))]
    #[schema(example = "user@example.com")]
    pub email_or_username: String,

    /// Password
    #[validate(length(min = 1))]
    #[schema(example = "SecurePass123!")]
    pub password: String,

    /// Extend the session to 7 days instead of 24 hours
    #[serde(default)]
    pub remember_me: bool,
}

/// Login response; the session id is also set as an HttpOnly cookie
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResp {
    pub session_id: String,

    pub user: UserInfo,

    pub expires_at: DateTime<Utc>,

    #[schema(example = "Login successful")]
    pub message: String,
}

/// Public user information returned by the API
///
/// Never exposes the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,

    #[schema(example = "user@example.com")]
    pub email: String,

    #[schema(example = "john_doe")]
    pub username: Option<String>,

    #[schema(example = "John Doe")]
    pub full_name: Option<String>,

    #[schema(example = json!(["user"]))]
    pub roles: Vec<String>,

    pub is_active: bool,

    pub email_verified: bool,

    pub is_developer: bool,

    pub can_use_expenses: bool,

    /// Derived classification: user, developer or hybrid
    #[schema(example = "user")]
    pub account_type: String,

    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            roles: user.roles.clone(),
            is_active: user.is_active,
            email_verified: user.email_verified,
            is_developer: user.is_developer,
            can_use_expenses: user.can_use_expenses,
            account_type: user.account_type().as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

/// Partial profile update; absent fields are left unchanged
#[derive(Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileReq {
    #[schema(example = "John Doe")]
    pub full_name: Option<String>,

    #[validate(regex(path = *USERNAME_RE, message = "username must be 3-32 chars of [A-Za-z0-9_-]"))]
    #[schema(example = "john_doe")]
    pub username: Option<String>,
}

/// Password change request
#[derive(Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordReq {
    #[validate(length(min = 1))]
    pub current_password: String,

    #[validate(length(min = 8))]
    pub new_password: String,

    /// Also delete every login session of the user
    #[serde(default)]
    pub revoke_all_sessions: bool,
}

/// Password change response
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordResp {
    #[schema(example = "Password changed successfully")]
    pub message: String,

    /// Number of sessions revoked, present when revocation was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions_revoked: Option<u64>,
}

/// Account upgrade response (developer / expenses)
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeResp {
    pub user: UserInfo,

    #[schema(example = "Developer access enabled")]
    pub message: String,
}

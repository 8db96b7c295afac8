use super::model::{Session, User};
use crate::domains::auth::dto::auth_dto::{
    ChangePasswordReq, ChangePasswordResp, LoginReq, LoginResp, RegisterReq, RegisterResp,
    UpdateProfileReq, UpgradeResp, UserInfo,
};
use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

/// User lifecycle and session use cases
#[async_trait]
pub trait AuthService: Send + Sync + 'static {
    /// Register a new account; `accountType` selects the initial flag set
    async fn register(&self, req: RegisterReq) -> Result<RegisterResp, AppError>;

    /// Authenticate by email or username and issue a login session
    async fn login(&self, req: LoginReq) -> Result<LoginResp, AppError>;

    /// Resolve a session cookie to its live session and user
    async fn find_session_user(&self, session_id: &str) -> Result<(Session, User), AppError>;

    /// Fetch the current user
    async fn get_user(&self, user_id: Uuid) -> Result<UserInfo, AppError>;

    /// Partial profile update; username changes re-check uniqueness
    async fn update_profile(&self, user_id: Uuid, req: UpdateProfileReq)
        -> Result<UserInfo, AppError>;

    /// Change password, gated on the current password
    async fn change_password(
        &self,
        user_id: Uuid,
        req: ChangePasswordReq,
    ) -> Result<ChangePasswordResp, AppError>;

    /// Enable developer access; fails when already a developer
    async fn upgrade_to_developer(&self, user_id: Uuid) -> Result<UpgradeResp, AppError>;

    /// Enable expenses access; fails when already enabled
    async fn enable_expenses(&self, user_id: Uuid) -> Result<UpgradeResp, AppError>;

    /// Delete expired sessions, returning the count removed
    async fn cleanup_expired_sessions(&self) -> Result<u64, AppError>;
}

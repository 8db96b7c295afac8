use async_trait::async_trait;
use auth_service_core::domains::auth::{
    domain::{
        model::{Session, User},
        repository::{SessionRepository, UserRepository},
        service::AuthService,
    },
    dto::auth_dto::{
        ChangePasswordReq, ChangePasswordResp, LoginReq, LoginResp, RegisterReq, RegisterResp,
        UpdateProfileReq, UpgradeResp, UserInfo,
    },
    utils::password_validator::validate_password_quick,
};
use auth_service_core::domains::oauth::utils::secrets::generate_session_id;
use chrono::Utc;
use shared_error::AppError;
use uuid::Uuid;

const ACCOUNT_TYPE_USER: &str = "user";
const ACCOUNT_TYPE_DEVELOPER: &str = "developer";

/// Auth service implementation
pub struct AuthServiceImpl<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    user_repo: UR,
    session_repo: SR,
    bcrypt_cost: u32,
    session_expires_in: i64,
    session_remember_me_expires_in: i64,
}

impl<UR, SR> AuthServiceImpl<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    pub fn new(
        user_repo: UR,
        session_repo: SR,
        bcrypt_cost: u32,
        session_expires_in: i64,
        session_remember_me_expires_in: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            bcrypt_cost,
            session_expires_in,
            session_remember_me_expires_in,
        }
    }

    /// Verification failures (including malformed or foreign hash formats)
    /// collapse to a mismatch
    fn verify_password(plain: &str, hash: &str) -> bool {
        bcrypt::verify(plain, hash).unwrap_or(false)
    }

    fn hash_password(&self, plain: &str) -> Result<String, AppError> {
        bcrypt::hash(plain, self.bcrypt_cost)
            .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::InvalidUser("User not found".to_string()))
    }
}

#[async_trait]
impl<UR, SR> AuthService for AuthServiceImpl<UR, SR>
where
    UR: UserRepository + 'static,
    SR: SessionRepository + 'static,
{
    async fn register(&self, req: RegisterReq) -> Result<RegisterResp, AppError> {
        let account_type = req.account_type.as_deref().unwrap_or(ACCOUNT_TYPE_USER);
        if account_type != ACCOUNT_TYPE_USER && account_type != ACCOUNT_TYPE_DEVELOPER {
            return Err(AppError::ValidateRequest(
                "accountType must be 'user' or 'developer'".to_string(),
            ));
        }

        if self.user_repo.email_exists(&req.email).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }
        if let Some(username) = &req.username {
            if self.user_repo.username_exists(username).await? {
                return Err(AppError::Conflict("Username is already taken".to_string()));
            }
        }

        // Validate password strength against the user's own identifiers
        let full_name = req.full_name.as_deref().unwrap_or("");
        let username = req.username.as_deref().unwrap_or("");
        let user_inputs = [req.email.as_str(), username, full_name];
        validate_password_quick(&req.password, &user_inputs)
            .map_err(AppError::ValidateRequest)?;

        let password_hash = self.hash_password(&req.password)?;

        let user = if account_type == ACCOUNT_TYPE_DEVELOPER {
            User::new_developer(&req.email, req.username, password_hash, req.full_name)
        } else {
            User::new_user(&req.email, req.username, password_hash, req.full_name)
        };

        let created = self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %created.id,
            account_type = %created.account_type().as_str(),
            "User registered"
        );

        Ok(RegisterResp {
            user: UserInfo::from(&created),
            message: "Registration successful".to_string(),
        })
    }

    async fn login(&self, req: LoginReq) -> Result<LoginResp, AppError> {
        // Email lookup first, then username. Both misses and password
        // mismatches answer identically.
        let user = match self.user_repo.find_by_email(&req.email_or_username).await? {
            Some(user) => Some(user),
            None => {
                self.user_repo
                    .find_by_username(&req.email_or_username)
                    .await?
            },
        };
        let user = user.ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(&req.password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let expires_in = if req.remember_me {
            self.session_remember_me_expires_in
        } else {
            self.session_expires_in
        };
        let session = Session::issue(generate_session_id(), user.id, expires_in);
        let session = self.session_repo.create(&session).await?;

        tracing::info!(user_id = %user.id, "Login session issued");

        Ok(LoginResp {
            session_id: session.id,
            user: UserInfo::from(&user),
            expires_at: session.expires_at,
            message: "Login successful".to_string(),
        })
    }

    async fn find_session_user(&self, session_id: &str) -> Result<(Session, User), AppError> {
        let session = self
            .session_repo
            .find_valid_by_id(session_id)
            .await?
            .ok_or(AppError::InvalidSession)?;

        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or(AppError::InvalidSession)?;

        if !user.is_active {
            return Err(AppError::InvalidSession);
        }

        Ok((session, user))
    }

    async fn get_user(&self, user_id: Uuid) -> Result<UserInfo, AppError> {
        let user = self.find_user(user_id).await?;
        Ok(UserInfo::from(&user))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        req: UpdateProfileReq,
    ) -> Result<UserInfo, AppError> {
        let user = self.find_user(user_id).await?;

        if let Some(username) = &req.username {
            let changed = user.username.as_deref() != Some(username.as_str());
            if changed && self.user_repo.username_exists(username).await? {
                return Err(AppError::Conflict("Username is already taken".to_string()));
            }
        }

        let updated = user.with_profile(req.full_name, req.username, Utc::now());
        let updated = self.user_repo.update(&updated).await?;

        Ok(UserInfo::from(&updated))
    }

    async fn change_password(
        &self,
        user_id: Uuid,
        req: ChangePasswordReq,
    ) -> Result<ChangePasswordResp, AppError> {
        let user = self.find_user(user_id).await?;

        if !Self::verify_password(&req.current_password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        if req.new_password == req.current_password {
            return Err(AppError::ValidateRequest(
                "New password must differ from the current password".to_string(),
            ));
        }

        let username = user.username.as_deref().unwrap_or("");
        let full_name = user.full_name.as_deref().unwrap_or("");
        let user_inputs = [user.email.as_str(), username, full_name];
        validate_password_quick(&req.new_password, &user_inputs)
            .map_err(AppError::ValidateRequest)?;

        let password_hash = self.hash_password(&req.new_password)?;
        let updated = user.with_password_hash(password_hash, Utc::now());
        self.user_repo.update(&updated).await?;

        let sessions_revoked = if req.revoke_all_sessions {
            Some(self.session_repo.delete_by_user(user_id).await?)
        } else {
            None
        };

        tracing::info!(
            user_id = %user_id,
            sessions_revoked = ?sessions_revoked,
            "Password changed"
        );

        Ok(ChangePasswordResp {
            message: "Password changed successfully".to_string(),
            sessions_revoked,
        })
    }

    async fn upgrade_to_developer(&self, user_id: Uuid) -> Result<UpgradeResp, AppError> {
        let user = self.find_user(user_id).await?;

        if user.is_developer {
            return Err(AppError::InvalidUser(
                "Developer access is already enabled".to_string(),
            ));
        }

        let updated = user.with_developer_enabled(Utc::now());
        let updated = self.user_repo.update(&updated).await?;

        tracing::info!(user_id = %user_id, "Developer access enabled");

        Ok(UpgradeResp {
            user: UserInfo::from(&updated),
            message: "Developer access enabled".to_string(),
        })
    }

    async fn enable_expenses(&self, user_id: Uuid) -> Result<UpgradeResp, AppError> {
        let user = self.find_user(user_id).await?;

        if user.can_use_expenses {
            return Err(AppError::InvalidUser(
                "Expenses access is already enabled".to_string(),
            ));
        }

        let updated = user.with_expenses_enabled(Utc::now());
        let updated = self.user_repo.update(&updated).await?;

        tracing::info!(user_id = %user_id, "Expenses access enabled");

        Ok(UpgradeResp {
            user: UserInfo::from(&updated),
            message: "Expenses access enabled".to_string(),
        })
    }

    async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        let deleted = self.session_repo.delete_expired().await?;
        if deleted > 0 {
            tracing::info!(deleted = deleted, "Expired sessions removed");
        }
        Ok(deleted)
    }
}

//! Mock repositories and test data builders shared by the service tests.

#![allow(dead_code)]

use async_trait::async_trait;
use auth_service_core::domains::auth::domain::model::{Session, User};
use auth_service_core::domains::auth::domain::repository::{SessionRepository, UserRepository};
use auth_service_core::domains::client::domain::model::Client;
use auth_service_core::domains::client::domain::repository::ClientRepository;
use auth_service_core::domains::oauth::domain::model::{
    AuthorizationCode, CodeChallengeMethod, Consent, ScopeDefinition,
};
use auth_service_core::domains::oauth::domain::repository::{
    AuthorizationCodeRepository, ConsentRepository, ScopeRepository,
};
use chrono::{DateTime, Utc};
use mockall::mock;
use shared_error::AppError;
use shared_jwt::JwtSigner;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
        async fn create(&self, user: &User) -> Result<User, AppError>;
        async fn update(&self, user: &User) -> Result<User, AppError>;
        async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
        async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
    }
}

mock! {
    pub SessionRepo {}

    #[async_trait]
    impl SessionRepository for SessionRepo {
        async fn create(&self, session: &Session) -> Result<Session, AppError>;
        async fn find_valid_by_id(&self, id: &str) -> Result<Option<Session>, AppError>;
        async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, AppError>;
        async fn delete_by_id(&self, id: &str) -> Result<(), AppError>;
        async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, AppError>;
        async fn delete_expired(&self) -> Result<u64, AppError>;
    }
}

mock! {
    pub ClientRepo {}

    #[async_trait]
    impl ClientRepository for ClientRepo {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError>;
        async fn find_by_client_id(&self, client_id: &str) -> Result<Option<Client>, AppError>;
        async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Client>, AppError>;
        async fn find_system_client(&self, system_role: &str) -> Result<Option<Client>, AppError>;
        async fn create(&self, client: &Client) -> Result<Client, AppError>;
        async fn update(&self, client: &Client) -> Result<Client, AppError>;
    }
}

mock! {
    pub CodeRepo {}

    #[async_trait]
    impl AuthorizationCodeRepository for CodeRepo {
        async fn create(&self, code: &AuthorizationCode) -> Result<AuthorizationCode, AppError>;
        async fn find_by_code(&self, code: &str) -> Result<Option<AuthorizationCode>, AppError>;
        async fn mark_used(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError>;
        async fn delete_expired(&self) -> Result<u64, AppError>;
    }
}

mock! {
    pub ConsentRepo {}

    #[async_trait]
    impl ConsentRepository for ConsentRepo {
        async fn find_active(&self, user_id: Uuid, client_id: Uuid) -> Result<Option<Consent>, AppError>;
        async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Consent>, AppError>;
        async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<Consent>, AppError>;
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Consent>, AppError>;
        async fn save(&self, consent: &Consent) -> Result<Consent, AppError>;
        async fn revoke(&self, id: Uuid) -> Result<(), AppError>;
    }
}

mock! {
    pub ScopeRepo {}

    #[async_trait]
    impl ScopeRepository for ScopeRepo {
        async fn find_all(&self) -> Result<Vec<ScopeDefinition>, AppError>;
        async fn find_by_names(&self, names: &[String]) -> Result<Vec<ScopeDefinition>, AppError>;
        async fn find_default(&self) -> Result<Option<ScopeDefinition>, AppError>;
        async fn create(&self, scope: &ScopeDefinition) -> Result<ScopeDefinition, AppError>;
    }
}

/// Low bcrypt cost keeps the suite fast
pub const TEST_BCRYPT_COST: u32 = 4;

/// Shared RS256 signer; keypair generation is slow, do it once
pub fn test_signer() -> Arc<JwtSigner> {
    static SIGNER: OnceLock<Arc<JwtSigner>> = OnceLock::new();
    SIGNER
        .get_or_init(|| {
            Arc::new(
                JwtSigner::generate("test-key-1", "http://issuer.test", "test-api")
                    .expect("keypair generation"),
            )
        })
        .clone()
}

pub fn hash_for(plain: &str) -> String {
    bcrypt::hash(plain, TEST_BCRYPT_COST).expect("bcrypt hash")
}

pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    pub fn new() -> Self {
        Self {
            user: User::new_user("user@example.com", None, hash_for("P@ssw0rd!123"), None),
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.user.email = email.to_string();
        self
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.user.username = Some(username.to_string());
        self
    }

    pub fn with_password(mut self, plain: &str) -> Self {
        self.user.password_hash = hash_for(plain);
        self
    }

    pub fn as_developer(mut self) -> Self {
        self.user = self.user.with_developer_enabled(Utc::now());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.user.is_active = false;
        self
    }

    pub fn build(self) -> User {
        self.user
    }
}

pub struct ClientBuilder {
    client: Client,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            client: Client::new_owned(
                "c1".to_string(),
                hash_for("client-secret-0123456789abcdefXY"),
                "Test App".to_string(),
                vec!["https://app/cb".to_string()],
                vec!["authorization_code".to_string()],
                false,
                Uuid::new_v4(),
            ),
        }
    }

    pub fn with_client_id(mut self, client_id: &str) -> Self {
        self.client.client_id = client_id.to_string();
        self
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.client.user_id = Some(owner_id);
        self
    }

    pub fn with_secret(mut self, plain: &str) -> Self {
        self.client.client_secret = hash_for(plain);
        self
    }

    pub fn with_redirect_uris(mut self, uris: &[&str]) -> Self {
        self.client.redirect_uris = uris.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn public(mut self) -> Self {
        self.client.is_public = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.client.is_active = false;
        self
    }

    pub fn system(mut self, role: &str) -> Self {
        self.client.is_system_client = true;
        self.client.system_role = Some(role.to_string());
        self.client.user_id = None;
        self
    }

    pub fn build(self) -> Client {
        self.client
    }
}

pub fn scope_def(name: &str, is_default: bool) -> ScopeDefinition {
    ScopeDefinition {
        name: name.to_string(),
        description: format!("{} access", name),
        is_default,
    }
}

pub fn auth_code_for(
    user_id: Uuid,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    verifier: &str,
) -> AuthorizationCode {
    AuthorizationCode::issue(
        "test-code-0123456789012345678901234567890123".to_string(),
        user_id,
        client_id.to_string(),
        redirect_uri.to_string(),
        scope.to_string(),
        auth_service_core::domains::oauth::utils::pkce::compute_s256_challenge(verifier),
        CodeChallengeMethod::S256,
        600,
    )
}

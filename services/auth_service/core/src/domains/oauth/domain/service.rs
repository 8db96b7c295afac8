use crate::domains::auth::domain::model::User;
use crate::domains::oauth::dto::oauth_dto::{
    AuthorizeOutcome, AuthorizeQuery, AuthorizeRedirect, ConsentDecisionReq, ConsentInfo,
    TokenReq, TokenResp,
};
use async_trait::async_trait;
use shared_error::AppError;
use shared_jwt::JwksDocument;
use uuid::Uuid;

/// Authorization endpoint state machine and consent use cases
///
/// The machine's state lives in persistent rows (sessions, consents, codes);
/// each operation is a transition validated against them.
#[async_trait]
pub trait OAuthService: Send + Sync + 'static {
    /// T0: validate an authorization request for an authenticated user.
    /// System clients transition straight to code issuance; normal clients
    /// require an active consent covering every requested scope.
    async fn begin_authorize(
        &self,
        user: &User,
        query: AuthorizeQuery,
    ) -> Result<AuthorizeOutcome, AppError>;

    /// T1: record the user's consent decision. Approval swaps the active
    /// consent row transactionally and issues a code; denial fails with 401.
    async fn decide_consent(
        &self,
        user: &User,
        req: ConsentDecisionReq,
    ) -> Result<AuthorizeRedirect, AppError>;

    /// T3: exchange a single-use code plus PKCE verifier for an access token
    async fn exchange_token(&self, req: TokenReq) -> Result<TokenResp, AppError>;

    /// Public signing keys for token verification
    fn jwks(&self) -> &JwksDocument;

    /// Active consents of a user, with client display data
    async fn list_consents(&self, user_id: Uuid) -> Result<Vec<ConsentInfo>, AppError>;

    /// Revoke an owned consent; revoking an already-revoked row is a no-op
    async fn revoke_consent(&self, user_id: Uuid, consent_id: Uuid) -> Result<(), AppError>;

    /// Delete expired authorization codes, returning the count removed
    async fn cleanup_expired_codes(&self) -> Result<u64, AppError>;
}

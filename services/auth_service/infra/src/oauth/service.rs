use async_trait::async_trait;
use auth_service_core::domains::auth::domain::{model::User, repository::UserRepository};
use auth_service_core::domains::client::domain::{model::Client, repository::ClientRepository};
use auth_service_core::domains::oauth::{
    domain::{
        model::{AuthorizationCode, CodeChallengeMethod, Consent, ScopeDefinition},
        repository::{AuthorizationCodeRepository, ConsentRepository, ScopeRepository},
        service::OAuthService,
    },
    dto::oauth_dto::{
        AuthorizeOutcome, AuthorizeQuery, AuthorizeRedirect, ConsentDecisionReq, ConsentInfo,
        ConsentRequiredResp, ScopeDescription, TokenReq, TokenResp,
    },
    utils::pkce::{is_valid_challenge, verify_pkce},
    utils::secrets::generate_auth_code,
};
use chrono::Utc;
use shared_error::AppError;
use shared_jwt::{Claims, JwksDocument, JwtSigner};
use std::sync::Arc;
use uuid::Uuid;

const RESPONSE_TYPE_CODE: &str = "code";
const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
const CONSENT_URL: &str = "/auth/authorize/decision";

/// Validated authorization request, shared by T0 and T1
struct ValidatedRequest {
    client: Client,
    scopes: Vec<String>,
    scope_definitions: Vec<ScopeDefinition>,
    method: CodeChallengeMethod,
}

/// Authorization state machine implementation
///
/// State lives in persistent rows; every transition re-validates against
/// them, so replays and tampered echoes fail closed.
pub struct OAuthServiceImpl<UR, CR, AR, NR, SR>
where
    UR: UserRepository,
    CR: ClientRepository,
    AR: AuthorizationCodeRepository,
    NR: ConsentRepository,
    SR: ScopeRepository,
{
    user_repo: UR,
    client_repo: CR,
    code_repo: AR,
    consent_repo: NR,
    scope_repo: SR,
    signer: Arc<JwtSigner>,
    auth_code_expires_in: i64,
    access_token_expires_in: i64,
}

impl<UR, CR, AR, NR, SR> OAuthServiceImpl<UR, CR, AR, NR, SR>
where
    UR: UserRepository,
    CR: ClientRepository,
    AR: AuthorizationCodeRepository,
    NR: ConsentRepository,
    SR: ScopeRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: UR,
        client_repo: CR,
        code_repo: AR,
        consent_repo: NR,
        scope_repo: SR,
        signer: Arc<JwtSigner>,
        auth_code_expires_in: i64,
        access_token_expires_in: i64,
    ) -> Self {
        Self {
            user_repo,
            client_repo,
            code_repo,
            consent_repo,
            scope_repo,
            signer,
            auth_code_expires_in,
            access_token_expires_in,
        }
    }

    /// T0/T1 preconditions, checked in order:
    /// client exists and is active, redirect URI registered byte-exact,
    /// response_type is "code", challenge well-formed, scopes known.
    async fn validate_request(
        &self,
        client_id: &str,
        redirect_uri: &str,
        response_type: &str,
        code_challenge: &str,
        code_challenge_method: &str,
        scope: Option<&str>,
    ) -> Result<ValidatedRequest, AppError> {
        let client = self
            .client_repo
            .find_by_client_id(client_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or(AppError::InvalidClient)?;

        if !client.has_redirect_uri(redirect_uri) {
            return Err(AppError::InvalidClient);
        }

        if response_type != RESPONSE_TYPE_CODE {
            return Err(AppError::ValidateRequest(
                "response_type must be 'code'".to_string(),
            ));
        }

        let method: CodeChallengeMethod = code_challenge_method.parse().map_err(|_| {
            AppError::ValidateRequest("code_challenge_method must be 'S256' or 'plain'".to_string())
        })?;
        if !is_valid_challenge(code_challenge) {
            return Err(AppError::ValidateRequest(
                "code_challenge is malformed".to_string(),
            ));
        }

        let (scopes, scope_definitions) = self.resolve_scopes(scope).await?;

        Ok(ValidatedRequest {
            client,
            scopes,
            scope_definitions,
            method,
        })
    }

    /// Requested scopes must all be known; an empty request falls back to
    /// the default scope
    async fn resolve_scopes(
        &self,
        scope: Option<&str>,
    ) -> Result<(Vec<String>, Vec<ScopeDefinition>), AppError> {
        let mut requested: Vec<String> = Vec::new();
        for name in scope.unwrap_or("").split_whitespace() {
            if !requested.iter().any(|existing| existing == name) {
                requested.push(name.to_string());
            }
        }

        if requested.is_empty() {
            let default = self.scope_repo.find_default().await?.ok_or_else(|| {
                AppError::ValidateRequest(
                    "No scope requested and no default scope is configured".to_string(),
                )
            })?;
            requested.push(default.name.clone());
            return Ok((requested, vec![default]));
        }

        let definitions = self.scope_repo.find_by_names(&requested).await?;
        if definitions.len() != requested.len() {
            return Err(AppError::ValidateRequest("Unknown scope requested".to_string()));
        }

        Ok((requested, definitions))
    }

    /// T2: persist a fresh single-use code and build the redirect
    async fn issue_code(
        &self,
        user: &User,
        request: &ValidatedRequest,
        redirect_uri: &str,
        code_challenge: &str,
        state: Option<String>,
    ) -> Result<AuthorizeRedirect, AppError> {
        let code = AuthorizationCode::issue(
            generate_auth_code(),
            user.id,
            request.client.client_id.clone(),
            redirect_uri.to_string(),
            request.scopes.join(" "),
            code_challenge.to_string(),
            request.method,
            self.auth_code_expires_in,
        );
        let code = self.code_repo.create(&code).await?;

        tracing::debug!(
            client_id = %request.client.client_id,
            user_id = %user.id,
            "Authorization code issued"
        );

        Ok(AuthorizeRedirect {
            redirect_uri: redirect_uri.to_string(),
            code: code.code,
            state,
        })
    }

    fn verify_client_secret(client: &Client, secret: &str) -> bool {
        if bcrypt::verify(secret, &client.client_secret).unwrap_or(false) {
            return true;
        }
        if client.old_secret_usable(Utc::now()) {
            if let Some(old_hash) = &client.client_secret_old {
                return bcrypt::verify(secret, old_hash).unwrap_or(false);
            }
        }
        false
    }
}

#[async_trait]
impl<UR, CR, AR, NR, SR> OAuthService for OAuthServiceImpl<UR, CR, AR, NR, SR>
where
    UR: UserRepository + 'static,
    CR: ClientRepository + 'static,
    AR: AuthorizationCodeRepository + 'static,
    NR: ConsentRepository + 'static,
    SR: ScopeRepository + 'static,
{
    async fn begin_authorize(
        &self,
        user: &User,
        query: AuthorizeQuery,
    ) -> Result<AuthorizeOutcome, AppError> {
        let request = self
            .validate_request(
                &query.client_id,
                &query.redirect_uri,
                &query.response_type,
                &query.code_challenge,
                &query.code_challenge_method,
                query.scope.as_deref(),
            )
            .await?;

        // System clients are first-party: no consent gate, no ledger write
        if request.client.is_system_client {
            let redirect = self
                .issue_code(user, &request, &query.redirect_uri, &query.code_challenge, query.state)
                .await?;
            return Ok(AuthorizeOutcome::Redirect(redirect));
        }

        let consent = self
            .consent_repo
            .find_active(user.id, request.client.id)
            .await?;

        let covered = consent
            .as_ref()
            .is_some_and(|consent| consent.covers(&request.scopes));
        if covered {
            let redirect = self
                .issue_code(user, &request, &query.redirect_uri, &query.code_challenge, query.state)
                .await?;
            return Ok(AuthorizeOutcome::Redirect(redirect));
        }

        let scopes = request
            .scope_definitions
            .iter()
            .map(|definition| ScopeDescription {
                name: definition.name.clone(),
                description: definition.description.clone(),
            })
            .collect();

        Ok(AuthorizeOutcome::ConsentRequired(Box::new(ConsentRequiredResp {
            client_id: request.client.client_id.clone(),
            client_name: request.client.client_name.clone(),
            scopes,
            consent_url: CONSENT_URL.to_string(),
            redirect_uri: query.redirect_uri,
            response_type: query.response_type,
            code_challenge: query.code_challenge,
            code_challenge_method: query.code_challenge_method,
            state: query.state,
            scope: query.scope,
        })))
    }

    async fn decide_consent(
        &self,
        user: &User,
        req: ConsentDecisionReq,
    ) -> Result<AuthorizeRedirect, AppError> {
        match req.decision.as_str() {
            "approve" => {},
            "deny" => return Err(AppError::DenyConsent),
            _ => {
                return Err(AppError::ValidateRequest(
                    "decision must be 'approve' or 'deny'".to_string(),
                ))
            },
        }

        // The echoed parameters are untrusted; re-run the T0 preconditions
        let request = self
            .validate_request(
                &req.client_id,
                &req.redirect_uri,
                &req.response_type,
                &req.code_challenge,
                &req.code_challenge_method,
                req.scope.as_deref(),
            )
            .await?;

        if !request.client.is_system_client {
            let consent = Consent::granted(user.id, request.client.id, request.scopes.clone());
            self.consent_repo.save(&consent).await?;

            tracing::info!(
                user_id = %user.id,
                client_id = %request.client.client_id,
                scopes = %request.scopes.join(" "),
                "Consent granted"
            );
        }

        self.issue_code(user, &request, &req.redirect_uri, &req.code_challenge, req.state)
            .await
    }

    async fn exchange_token(&self, req: TokenReq) -> Result<TokenResp, AppError> {
        if req.grant_type != GRANT_TYPE_AUTHORIZATION_CODE {
            return Err(AppError::ValidateRequest(
                "grant_type must be 'authorization_code'".to_string(),
            ));
        }

        // Every code precondition fails with the same uniform error
        let code = self
            .code_repo
            .find_by_code(&req.code)
            .await?
            .ok_or(AppError::InvalidCode)?;

        if code.client_id != req.client_id || code.redirect_uri != req.redirect_uri {
            return Err(AppError::InvalidCode);
        }

        let now = Utc::now();
        if code.used || code.is_expired(now) {
            return Err(AppError::InvalidCode);
        }

        if !verify_pkce(&req.code_verifier, &code.code_challenge, code.code_challenge_method) {
            return Err(AppError::InvalidCode);
        }

        let client = self
            .client_repo
            .find_by_client_id(&req.client_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or(AppError::InvalidClient)?;

        // PKCE is the mandatory proof; a confidential client presenting its
        // secret gets it verified as well
        if let Some(secret) = req.client_secret.as_deref() {
            if !client.is_public && !Self::verify_client_secret(&client, secret) {
                return Err(AppError::InvalidClient);
            }
        }

        // Single-use guarantee: the CAS loser of a concurrent replay fails
        if !self.code_repo.mark_used(&req.code, now).await? {
            return Err(AppError::InvalidCode);
        }

        let user = self
            .user_repo
            .find_by_id(code.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::InvalidUser("User no longer exists".to_string()))?;

        let claims = Claims::new_access(
            self.signer.issuer(),
            self.signer.audience(),
            user.id,
            &user.email,
            &client.client_id,
            &code.scope,
            self.access_token_expires_in,
        );
        let access_token = self.signer.sign(&claims)?;

        tracing::info!(
            user_id = %user.id,
            client_id = %client.client_id,
            "Access token issued"
        );

        Ok(TokenResp {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expires_in,
            scope: code.scope,
        })
    }

    fn jwks(&self) -> &JwksDocument {
        self.signer.jwks()
    }

    async fn list_consents(&self, user_id: Uuid) -> Result<Vec<ConsentInfo>, AppError> {
        let consents = self.consent_repo.find_active_by_user(user_id).await?;

        let mut infos = Vec::with_capacity(consents.len());
        for consent in consents {
            let Some(client) = self.client_repo.find_by_id(consent.client_id).await? else {
                tracing::warn!(consent_id = %consent.id, "Consent references missing client");
                continue;
            };
            infos.push(ConsentInfo {
                id: consent.id,
                client_id: client.client_id,
                client_name: client.client_name,
                scopes: consent.scopes,
                granted_at: consent.granted_at,
                expires_at: consent.expires_at,
            });
        }

        Ok(infos)
    }

    async fn revoke_consent(&self, user_id: Uuid, consent_id: Uuid) -> Result<(), AppError> {
        let consent = self
            .consent_repo
            .find_by_id(consent_id)
            .await?
            .ok_or_else(|| AppError::NotFoundRecord("Consent not found".to_string()))?;

        if consent.user_id != user_id {
            return Err(AppError::Forbidden("Not the owner of this consent".to_string()));
        }

        self.consent_repo.revoke(consent_id).await?;

        tracing::info!(user_id = %user_id, consent_id = %consent_id, "Consent revoked");
        Ok(())
    }

    async fn cleanup_expired_codes(&self) -> Result<u64, AppError> {
        let deleted = self.code_repo.delete_expired().await?;
        if deleted > 0 {
            tracing::info!(deleted = deleted, "Expired authorization codes removed");
        }
        Ok(deleted)
    }
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum authorization code lifetime
pub const AUTH_CODE_MAX_LIFETIME_SECS: i64 = 600;

/// PKCE challenge transformation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum CodeChallengeMethod {
    #[sqlx(rename = "S256")]
    S256,
    #[sqlx(rename = "plain")]
    Plain,
}

impl CodeChallengeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeChallengeMethod::S256 => "S256",
            CodeChallengeMethod::Plain => "plain",
        }
    }
}

impl FromStr for CodeChallengeMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S256" => Ok(CodeChallengeMethod::S256),
            "plain" => Ok(CodeChallengeMethod::Plain),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for CodeChallengeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization code entity
///
/// Single-use: `used` flips exactly once via compare-and-set at exchange
/// time. The stored `redirect_uri` is the byte-exact copy of the request.
#[derive(Debug, Clone, FromRow)]
pub struct AuthorizationCode {
    pub code: String,
    pub user_id: Uuid,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub code_challenge: String,
    pub code_challenge_method: CodeChallengeMethod,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AuthorizationCode {
    /// Issue a new code. The lifetime is capped at 10 minutes regardless of
    /// the configured value.
    #[allow(clippy::too_many_arguments)]
    pub fn issue(
        code: String,
        user_id: Uuid,
        client_id: String,
        redirect_uri: String,
        scope: String,
        code_challenge: String,
        code_challenge_method: CodeChallengeMethod,
        expires_in: i64,
    ) -> Self {
        let now = Utc::now();
        let lifetime = expires_in.min(AUTH_CODE_MAX_LIFETIME_SECS);
        Self {
            code,
            user_id,
            client_id,
            redirect_uri,
            scope,
            code_challenge,
            code_challenge_method,
            expires_at: now + chrono::Duration::seconds(lifetime),
            used: false,
            used_at: None,
            created_at: now,
        }
    }

    /// A code expiring exactly at `now` is already expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Consent ledger row
///
/// The ledger is append-only: granting replaces the active row by revoking
/// it and inserting a new one; revoked rows are retained as audit history.
#[derive(Debug, Clone, FromRow)]
pub struct Consent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub scopes: Vec<String>,
    pub granted_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Consent {
    /// Create a fresh active grant
    pub fn granted(user_id: Uuid, client_id: Uuid, scopes: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            client_id,
            scopes,
            granted_at: Utc::now(),
            expires_at: None,
            revoked_at: None,
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at.map_or(true, |expires_at| now < expires_at)
    }

    /// Whether this grant covers every requested scope
    pub fn covers(&self, requested: &[String]) -> bool {
        requested.iter().all(|scope| self.scopes.contains(scope))
    }
}

/// Scope definition
#[derive(Debug, Clone, FromRow)]
pub struct ScopeDefinition {
    pub name: String,
    pub description: String,
    pub is_default: bool,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Query parameters of GET /auth/authorize (RFC 6749 wire names)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams, Validate)]
pub struct AuthorizeQuery {
    #[validate(length(min = 1))]
    #[schema(example = "6f2c1c1e-8f0a-4a3b-9e0e-1b2c3d4e5f6a")]
    pub client_id: String,

    #[validate(length(min = 1))]
    #[schema(example = "https://app.example.com/callback")]
    pub redirect_uri: String,

    #[schema(example = "code")]
    pub response_type: String,

    #[validate(length(min = 1))]
    pub code_challenge: String,

    #[schema(example = "S256")]
    pub code_challenge_method: String,

    /// Opaque client state, echoed verbatim on the redirect
    pub state: Option<String>,

    /// Space-delimited scopes; defaults to the first default scope
    pub scope: Option<String>,
}

/// Scope shown on the consent screen
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScopeDescription {
    #[schema(example = "read")]
    pub name: String,

    #[schema(example = "Read access to your account")]
    pub description: String,
}

/// Payload returned when the user still has to approve the request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsentRequiredResp {
    #[serde(rename = "clientId")]
    pub client_id: String,

    #[serde(rename = "clientName")]
    pub client_name: String,

    /// Requested scopes with their descriptions
    pub scopes: Vec<ScopeDescription>,

    /// Where the decision form posts to
    #[serde(rename = "consentUrl")]
    #[schema(example = "/auth/authorize/decision")]
    pub consent_url: String,

    // Echoed authorization parameters, resubmitted with the decision
    pub redirect_uri: String,
    pub response_type: String,
    pub code_challenge: String,
    pub code_challenge_method: String,
    pub state: Option<String>,
    pub scope: Option<String>,
}

/// Successful authorization: where to send the user-agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeRedirect {
    pub redirect_uri: String,
    pub code: String,
    pub state: Option<String>,
}

impl AuthorizeRedirect {
    /// Location header value: `redirect_uri?code=…&state=…`
    pub fn location(&self) -> String {
        let mut location = format!(
            "{}?code={}",
            self.redirect_uri,
            urlencode(&self.code)
        );
        if let Some(state) = &self.state {
            location.push_str("&state=");
            location.push_str(&urlencode(state));
        }
        location
    }
}

/// Percent-encode a query component (unreserved characters pass through)
fn urlencode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            },
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Outcome of GET /auth/authorize
#[derive(Debug, Clone)]
pub enum AuthorizeOutcome {
    /// Consent already granted (or system client): 302 with a fresh code
    Redirect(AuthorizeRedirect),
    /// Consent screen payload
    ConsentRequired(Box<ConsentRequiredResp>),
}

/// POST /auth/authorize/decision body: the echoed authorization parameters
/// plus the user's decision
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct ConsentDecisionReq {
    /// "approve" or "deny"
    #[validate(length(min = 1))]
    #[schema(example = "approve")]
    pub decision: String,

    #[validate(length(min = 1))]
    pub client_id: String,

    #[validate(length(min = 1))]
    pub redirect_uri: String,

    pub response_type: String,

    pub code_challenge: String,

    pub code_challenge_method: String,

    pub state: Option<String>,

    pub scope: Option<String>,
}

/// POST /auth/token form body (RFC 6749 wire names)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct TokenReq {
    #[schema(example = "authorization_code")]
    pub grant_type: String,

    #[validate(length(min = 1))]
    pub code: String,

    #[validate(length(min = 1))]
    pub client_id: String,

    #[validate(length(min = 1))]
    pub redirect_uri: String,

    #[validate(length(min = 1))]
    pub code_verifier: String,

    /// Confidential clients may additionally authenticate with their secret
    pub client_secret: Option<String>,
}

/// POST /auth/token success body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResp {
    pub access_token: String,

    #[schema(example = "Bearer")]
    pub token_type: String,

    /// Seconds until the access token expires
    #[schema(example = 3600)]
    pub expires_in: i64,

    #[schema(example = "read write")]
    pub scope: String,
}

/// Active consent as listed under /user/me/consents
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsentInfo {
    pub id: Uuid,

    pub client_id: String,

    pub client_name: String,

    pub scopes: Vec<String>,

    pub granted_at: DateTime<Utc>,

    pub expires_at: Option<DateTime<Utc>>,
}

/// List of active consents
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsentListResp {
    pub consents: Vec<ConsentInfo>,
}

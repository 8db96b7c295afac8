use crate::domains::client::domain::model::Client;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Client registration request
#[derive(Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientReq {
    /// Display name shown on the consent screen
    #[validate(length(min = 1, max = 128))]
    #[schema(example = "My Web App")]
    pub client_name: String,

    /// Absolute redirect URIs; matched byte-exact during authorization
    #[validate(length(min = 1))]
    #[schema(example = json!(["https://app.example.com/callback"]))]
    pub redirect_uris: Vec<String>,

    /// Allowed grant types; defaults to ["authorization_code"]
    #[schema(example = json!(["authorization_code"]))]
    pub grant_types: Option<Vec<String>>,

    /// Public clients (SPA, mobile) carry no usable secret; PKCE is
    /// still required either way
    #[serde(default)]
    pub is_public: bool,
}

/// Client view without secret material
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClientResp {
    pub id: Uuid,

    #[schema(example = "6f2c1c1e-8f0a-4a3b-9e0e-1b2c3d4e5f6a")]
    pub client_id: String,

    #[schema(example = "My Web App")]
    pub client_name: String,

    pub redirect_uris: Vec<String>,

    pub grant_types: Vec<String>,

    pub is_public: bool,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl From<&Client> for ClientResp {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            client_id: client.client_id.clone(),
            client_name: client.client_name.clone(),
            redirect_uris: client.redirect_uris.clone(),
            grant_types: client.grant_types.clone(),
            is_public: client.is_public,
            is_active: client.is_active,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

/// Creation response; the only place the plaintext secret ever appears
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientResp {
    #[serde(flatten)]
    pub client: ClientResp,

    /// Plaintext secret, returned exactly once and never stored
    pub client_secret: String,

    #[schema(example = "Store the client secret now; it cannot be retrieved again")]
    pub message: String,
}

/// List of clients owned by the caller
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientListResp {
    pub clients: Vec<ClientResp>,
}

/// Partial client update; absent fields are left unchanged
#[derive(Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientReq {
    #[validate(length(min = 1, max = 128))]
    pub client_name: Option<String>,

    #[validate(length(min = 1))]
    pub redirect_uris: Option<Vec<String>>,

    pub grant_types: Option<Vec<String>>,

    pub is_public: Option<bool>,
}

/// Secret rotation response
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RotateSecretResp {
    #[schema(example = "6f2c1c1e-8f0a-4a3b-9e0e-1b2c3d4e5f6a")]
    pub client_id: String,

    /// New plaintext secret, returned exactly once
    pub client_secret: String,

    /// Until this instant the previous secret still authenticates
    pub old_secret_expires_at: DateTime<Utc>,

    #[schema(example = "Secret rotated; the previous secret expires in 24 hours")]
    pub message: String,
}

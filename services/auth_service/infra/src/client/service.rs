use async_trait::async_trait;
use auth_service_core::domains::auth::domain::model::User;
use auth_service_core::domains::client::{
    domain::{
        model::{Client, GRANT_TYPE_AUTHORIZATION_CODE, GRANT_TYPE_REFRESH_TOKEN},
        repository::ClientRepository,
        service::ClientService,
    },
    dto::client_dto::{
        ClientResp, CreateClientReq, CreateClientResp, RotateSecretResp, UpdateClientReq,
    },
};
use auth_service_core::domains::oauth::utils::secrets::generate_client_secret;
use chrono::Utc;
use shared_error::AppError;
use uuid::Uuid;

/// Client lifecycle implementation
pub struct ClientServiceImpl<CR>
where
    CR: ClientRepository,
{
    client_repo: CR,
    bcrypt_cost: u32,
    secret_grace_period: i64,
}

impl<CR> ClientServiceImpl<CR>
where
    CR: ClientRepository,
{
    pub fn new(client_repo: CR, bcrypt_cost: u32, secret_grace_period: i64) -> Self {
        Self {
            client_repo,
            bcrypt_cost,
            secret_grace_period,
        }
    }

    fn hash_secret(&self, plain: &str) -> Result<String, AppError> {
        bcrypt::hash(plain, self.bcrypt_cost)
            .map_err(|e| AppError::InternalError(format!("Failed to hash client secret: {}", e)))
    }

    fn verify_secret(plain: &str, hash: &str) -> bool {
        bcrypt::verify(plain, hash).unwrap_or(false)
    }

    /// Fetch a client and enforce that the caller owns it
    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> Result<Client, AppError> {
        let client = self
            .client_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFoundRecord("Client not found".to_string()))?;

        if !client.is_owned_by(owner_id) {
            return Err(AppError::Forbidden("Not the owner of this client".to_string()));
        }

        Ok(client)
    }
}

fn validate_redirect_uris(uris: &[String]) -> Result<(), AppError> {
    for uri in uris {
        if !is_absolute_uri(uri) {
            return Err(AppError::ValidateRequest(format!(
                "redirectUris entry is not an absolute URI: {}",
                uri
            )));
        }
    }
    Ok(())
}

/// Absolute URI: a scheme followed by "://" and a non-empty remainder
fn is_absolute_uri(uri: &str) -> bool {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let scheme_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    scheme_ok && !rest.is_empty() && !uri.contains(char::is_whitespace)
}

fn validate_grant_types(grant_types: &[String]) -> Result<(), AppError> {
    for grant_type in grant_types {
        if grant_type != GRANT_TYPE_AUTHORIZATION_CODE && grant_type != GRANT_TYPE_REFRESH_TOKEN {
            return Err(AppError::ValidateRequest(format!(
                "Unsupported grant type: {}",
                grant_type
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl<CR> ClientService for ClientServiceImpl<CR>
where
    CR: ClientRepository + 'static,
{
    async fn create(
        &self,
        caller: &User,
        req: CreateClientReq,
    ) -> Result<CreateClientResp, AppError> {
        if !caller.is_developer {
            return Err(AppError::Forbidden("Developer access required".to_string()));
        }

        validate_redirect_uris(&req.redirect_uris)?;
        let grant_types = req
            .grant_types
            .unwrap_or_else(|| vec![GRANT_TYPE_AUTHORIZATION_CODE.to_string()]);
        validate_grant_types(&grant_types)?;

        // The plaintext appears only in this response; storage gets the hash
        let client_secret = generate_client_secret();
        let secret_hash = self.hash_secret(&client_secret)?;

        let client = Client::new_owned(
            Uuid::new_v4().to_string(),
            secret_hash,
            req.client_name,
            req.redirect_uris,
            grant_types,
            req.is_public,
            caller.id,
        );
        let created = self.client_repo.create(&client).await?;

        tracing::info!(
            client_id = %created.client_id,
            owner_id = %caller.id,
            "OAuth client created"
        );

        Ok(CreateClientResp {
            client: ClientResp::from(&created),
            client_secret,
            message: "Store the client secret now; it cannot be retrieved again".to_string(),
        })
    }

    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<ClientResp>, AppError> {
        let clients = self.client_repo.find_by_owner(owner_id).await?;
        Ok(clients.iter().map(ClientResp::from).collect())
    }

    async fn get_owned(&self, owner_id: Uuid, id: Uuid) -> Result<ClientResp, AppError> {
        let client = self.find_owned(owner_id, id).await?;
        Ok(ClientResp::from(&client))
    }

    async fn update_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        req: UpdateClientReq,
    ) -> Result<ClientResp, AppError> {
        let mut client = self.find_owned(owner_id, id).await?;

        if let Some(client_name) = req.client_name {
            client.client_name = client_name;
        }
        if let Some(redirect_uris) = req.redirect_uris {
            validate_redirect_uris(&redirect_uris)?;
            client.redirect_uris = redirect_uris;
        }
        if let Some(grant_types) = req.grant_types {
            validate_grant_types(&grant_types)?;
            client.grant_types = grant_types;
        }
        if let Some(is_public) = req.is_public {
            client.is_public = is_public;
        }
        client.updated_at = Utc::now();

        let updated = self.client_repo.update(&client).await?;
        Ok(ClientResp::from(&updated))
    }

    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let client = self.find_owned(owner_id, id).await?;

        // Already inactive: deletion is idempotent
        if !client.is_active {
            return Ok(());
        }

        let deactivated = client.with_deactivated(Utc::now());
        self.client_repo.update(&deactivated).await?;

        tracing::info!(client_id = %deactivated.client_id, "OAuth client soft-deleted");
        Ok(())
    }

    async fn rotate_secret(&self, owner_id: Uuid, id: Uuid) -> Result<RotateSecretResp, AppError> {
        let client = self.find_owned(owner_id, id).await?;

        let new_secret = generate_client_secret();
        let new_hash = self.hash_secret(&new_secret)?;
        let now = Utc::now();
        let rotated = client.with_rotated_secret(
            new_hash,
            chrono::Duration::seconds(self.secret_grace_period),
            now,
        );
        let rotated = self.client_repo.update(&rotated).await?;

        let old_secret_expires_at = rotated
            .secret_expires_at
            .ok_or_else(|| AppError::InternalError("Rotation did not set expiry".to_string()))?;

        tracing::info!(client_id = %rotated.client_id, "Client secret rotated");

        Ok(RotateSecretResp {
            client_id: rotated.client_id,
            client_secret: new_secret,
            old_secret_expires_at,
            message: "Secret rotated; the previous secret expires at the returned instant"
                .to_string(),
        })
    }

    async fn authenticate(&self, client_id: &str, secret: &str) -> Result<Client, AppError> {
        let client = self
            .client_repo
            .find_by_client_id(client_id)
            .await?
            .ok_or(AppError::InvalidClient)?;

        if !client.is_active {
            return Err(AppError::InvalidClient);
        }

        if Self::verify_secret(secret, &client.client_secret) {
            return Ok(client);
        }

        // Inside the rotation grace window the previous secret still works
        if client.old_secret_usable(Utc::now()) {
            if let Some(old_hash) = &client.client_secret_old {
                if Self::verify_secret(secret, old_hash) {
                    return Ok(client);
                }
            }
        }

        Err(AppError::InvalidClient)
    }
}

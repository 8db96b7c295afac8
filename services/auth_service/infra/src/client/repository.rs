use async_trait::async_trait;
use auth_service_core::domains::client::domain::{model::Client, repository::ClientRepository};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of ClientRepository
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM oauth_clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn find_by_client_id(&self, client_id: &str) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM oauth_clients
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM oauth_clients
            WHERE user_id = $1 AND is_active
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    async fn find_system_client(&self, system_role: &str) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM oauth_clients
            WHERE is_system_client AND system_role = $1
            "#,
        )
        .bind(system_role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn create(&self, client: &Client) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO oauth_clients (
                id, client_id, client_secret, client_secret_old, secret_expires_at,
                client_name, redirect_uris, grant_types, is_public, is_active,
                is_system_client, system_role, user_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(&client.client_id)
        .bind(&client.client_secret)
        .bind(&client.client_secret_old)
        .bind(client.secret_expires_at)
        .bind(&client.client_name)
        .bind(&client.redirect_uris)
        .bind(&client.grant_types)
        .bind(client.is_public)
        .bind(client.is_active)
        .bind(client.is_system_client)
        .bind(&client.system_role)
        .bind(client.user_id)
        .bind(client.created_at)
        .bind(client.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    async fn update(&self, client: &Client) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE oauth_clients
            SET client_secret = $2,
                client_secret_old = $3,
                secret_expires_at = $4,
                client_name = $5,
                redirect_uris = $6,
                grant_types = $7,
                is_public = $8,
                is_active = $9,
                updated_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(&client.client_secret)
        .bind(&client.client_secret_old)
        .bind(client.secret_expires_at)
        .bind(&client.client_name)
        .bind(&client.redirect_uris)
        .bind(&client.grant_types)
        .bind(client.is_public)
        .bind(client.is_active)
        .bind(client.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }
}

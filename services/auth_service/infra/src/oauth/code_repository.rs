use async_trait::async_trait;
use auth_service_core::domains::oauth::domain::{
    model::AuthorizationCode,
    repository::AuthorizationCodeRepository,
};
use chrono::{DateTime, Utc};
use shared_error::AppError;
use sqlx::PgPool;

/// PostgreSQL implementation of AuthorizationCodeRepository
pub struct PgAuthorizationCodeRepository {
    pool: PgPool,
}

impl PgAuthorizationCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationCodeRepository for PgAuthorizationCodeRepository {
    async fn create(&self, code: &AuthorizationCode) -> Result<AuthorizationCode, AppError> {
        let code = sqlx::query_as::<_, AuthorizationCode>(
            r#"
            INSERT INTO authorization_codes (
                code, user_id, client_id, redirect_uri, scope,
                code_challenge, code_challenge_method,
                expires_at, used, used_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&code.code)
        .bind(code.user_id)
        .bind(&code.client_id)
        .bind(&code.redirect_uri)
        .bind(&code.scope)
        .bind(&code.code_challenge)
        .bind(code.code_challenge_method)
        .bind(code.expires_at)
        .bind(code.used)
        .bind(code.used_at)
        .bind(code.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(code)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<AuthorizationCode>, AppError> {
        let code = sqlx::query_as::<_, AuthorizationCode>(
            r#"
            SELECT * FROM authorization_codes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(code)
    }

    async fn mark_used(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        // Compare-and-set on the single-use flag: of two concurrent
        // exchanges exactly one sees rows_affected = 1
        let result = sqlx::query(
            r#"
            UPDATE authorization_codes
            SET used = TRUE,
                used_at = $2
            WHERE code = $1 AND used = FALSE
            "#,
        )
        .bind(code)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM authorization_codes
            WHERE expires_at <= NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

use async_trait::async_trait;
use auth_service_core::domains::oauth::domain::{
    model::Consent,
    repository::ConsentRepository,
};
use shared_error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of ConsentRepository
///
/// The `user_consents` table carries a partial unique index on
/// `(user_id, client_id) WHERE revoked_at IS NULL`; a direct insert that
/// would create a second active row fails at the database.
pub struct PgConsentRepository {
    pool: PgPool,
}

impl PgConsentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConsentRepository for PgConsentRepository {
    async fn find_active(
        &self,
        user_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<Consent>, AppError> {
        let consent = sqlx::query_as::<_, Consent>(
            r#"
            SELECT * FROM user_consents
            WHERE user_id = $1
              AND client_id = $2
              AND revoked_at IS NULL
              AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(user_id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(consent)
    }

    async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Consent>, AppError> {
        let consents = sqlx::query_as::<_, Consent>(
            r#"
            SELECT * FROM user_consents
            WHERE user_id = $1
            ORDER BY granted_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(consents)
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<Consent>, AppError> {
        let consents = sqlx::query_as::<_, Consent>(
            r#"
            SELECT * FROM user_consents
            WHERE user_id = $1
              AND revoked_at IS NULL
              AND (expires_at IS NULL OR expires_at > NOW())
            ORDER BY granted_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(consents)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Consent>, AppError> {
        let consent = sqlx::query_as::<_, Consent>(
            r#"
            SELECT * FROM user_consents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(consent)
    }

    async fn save(&self, consent: &Consent) -> Result<Consent, AppError> {
        // Auto-revoke swap: revoke the currently-active row for the pair and
        // insert the replacement in one transaction. Observers never see two
        // active rows, and the partial unique index backstops the invariant.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE user_consents
            SET revoked_at = NOW()
            WHERE user_id = $1
              AND client_id = $2
              AND revoked_at IS NULL
            "#,
        )
        .bind(consent.user_id)
        .bind(consent.client_id)
        .execute(&mut *tx)
        .await?;

        let saved = sqlx::query_as::<_, Consent>(
            r#"
            INSERT INTO user_consents (
                id, user_id, client_id, scopes, granted_at, expires_at, revoked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(consent.id)
        .bind(consent.user_id)
        .bind(consent.client_id)
        .bind(&consent.scopes)
        .bind(consent.granted_at)
        .bind(consent.expires_at)
        .bind(consent.revoked_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn revoke(&self, id: Uuid) -> Result<(), AppError> {
        // Already-revoked rows are left untouched (idempotent)
        sqlx::query(
            r#"
            UPDATE user_consents
            SET revoked_at = NOW()
            WHERE id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

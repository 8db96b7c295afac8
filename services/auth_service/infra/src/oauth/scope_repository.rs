use async_trait::async_trait;
use auth_service_core::domains::oauth::domain::{
    model::ScopeDefinition,
    repository::ScopeRepository,
};
use shared_error::AppError;
use sqlx::PgPool;

/// PostgreSQL implementation of ScopeRepository
pub struct PgScopeRepository {
    pool: PgPool,
}

impl PgScopeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScopeRepository for PgScopeRepository {
    async fn find_all(&self) -> Result<Vec<ScopeDefinition>, AppError> {
        let scopes = sqlx::query_as::<_, ScopeDefinition>(
            r#"
            SELECT * FROM scope_definitions
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(scopes)
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<ScopeDefinition>, AppError> {
        let scopes = sqlx::query_as::<_, ScopeDefinition>(
            r#"
            SELECT * FROM scope_definitions
            WHERE name = ANY($1)
            ORDER BY name
            "#,
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await?;

        Ok(scopes)
    }

    async fn find_default(&self) -> Result<Option<ScopeDefinition>, AppError> {
        let scope = sqlx::query_as::<_, ScopeDefinition>(
            r#"
            SELECT * FROM scope_definitions
            WHERE is_default
            ORDER BY name
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(scope)
    }

    async fn create(&self, scope: &ScopeDefinition) -> Result<ScopeDefinition, AppError> {
        let scope = sqlx::query_as::<_, ScopeDefinition>(
            r#"
            INSERT INTO scope_definitions (name, description, is_default)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&scope.name)
        .bind(&scope.description)
        .bind(scope.is_default)
        .fetch_one(&self.pool)
        .await?;

        Ok(scope)
    }
}

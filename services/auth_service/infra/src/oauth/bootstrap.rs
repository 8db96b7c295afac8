//! Startup invariants: the first-party system client and the default scopes.

use auth_service_core::domains::client::domain::{model::Client, repository::ClientRepository};
use auth_service_core::domains::oauth::domain::{
    model::ScopeDefinition,
    repository::ScopeRepository,
};
use chrono::Utc;
use shared_error::AppError;

/// Role of the bootstrapped system client
pub const SYSTEM_ROLE_BFF: &str = "bff";

const MIN_SYSTEM_SECRET_LEN: usize = 32;

/// Settings for the system client bootstrap
pub struct SystemClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub client_name: String,
    pub redirect_uris: Vec<String>,
    pub bcrypt_cost: u32,
}

/// Ensure the `bff` system client exists and the scope table is seeded.
///
/// An existing client is left untouched: a stored hash that no longer
/// matches the configured secret is assumed to be a rotation and only
/// warned about. A configured secret shorter than 32 characters is fatal.
pub async fn ensure_system_client(
    client_repo: &impl ClientRepository,
    scope_repo: &impl ScopeRepository,
    config: &SystemClientConfig,
) -> Result<(), AppError> {
    if config.client_secret.len() < MIN_SYSTEM_SECRET_LEN {
        return Err(AppError::ConfigError(format!(
            "System client secret must be at least {} characters",
            MIN_SYSTEM_SECRET_LEN
        )));
    }

    seed_default_scopes(scope_repo).await?;

    match client_repo.find_system_client(SYSTEM_ROLE_BFF).await? {
        Some(existing) => {
            let matches_current =
                bcrypt::verify(&config.client_secret, &existing.client_secret).unwrap_or(false);
            let matches_old = existing.old_secret_usable(Utc::now())
                && existing
                    .client_secret_old
                    .as_deref()
                    .map(|old| bcrypt::verify(&config.client_secret, old).unwrap_or(false))
                    .unwrap_or(false);

            if !matches_current && !matches_old {
                tracing::warn!(
                    client_id = %existing.client_id,
                    "Configured system client secret does not match the stored hash; \
                     assuming a rotation happened and leaving the stored secret in place"
                );
            }
        },
        None => {
            let secret_hash = bcrypt::hash(&config.client_secret, config.bcrypt_cost)
                .map_err(|e| AppError::InternalError(format!("Failed to hash secret: {}", e)))?;

            let client = Client::new_system(
                config.client_id.clone(),
                secret_hash,
                config.client_name.clone(),
                config.redirect_uris.clone(),
                SYSTEM_ROLE_BFF.to_string(),
            );
            let created = client_repo.create(&client).await?;

            tracing::info!(client_id = %created.client_id, "System client created");
        },
    }

    Ok(())
}

/// Seed the scope table on first boot; an already-seeded table is left as-is
async fn seed_default_scopes(scope_repo: &impl ScopeRepository) -> Result<(), AppError> {
    if !scope_repo.find_all().await?.is_empty() {
        return Ok(());
    }

    let defaults = [
        ("read", "Read access to your account", true),
        ("write", "Modify your account data", false),
        ("profile", "Access your profile information", false),
    ];

    for (name, description, is_default) in defaults {
        scope_repo
            .create(&ScopeDefinition {
                name: name.to_string(),
                description: description.to_string(),
                is_default,
            })
            .await?;
    }

    tracing::info!("Default scope definitions seeded");
    Ok(())
}

use auth_service_api::{app, cors_layer, AppState};
use auth_service_core::domains::auth::domain::service::AuthService;
use auth_service_core::domains::client::domain::service::ClientService;
use auth_service_core::domains::oauth::domain::service::OAuthService;
use auth_service_infra::auth::{AuthServiceImpl, PgSessionRepository, PgUserRepository};
use auth_service_infra::client::{ClientServiceImpl, PgClientRepository};
use auth_service_infra::oauth::{
    bootstrap::{ensure_system_client, SystemClientConfig},
    OAuthServiceImpl, PgAuthorizationCodeRepository, PgConsentRepository, PgScopeRepository,
};
use shared_jwt::JwtSigner;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load configuration
    let config = shared_config::Config::from_env().expect("Failed to load configuration");

    // Initialize tracing with the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Authorization server starting");

    // Initialize database connection pool
    let db_pool = shared_db::init_pool(&config.database_url, 5)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Database connected");

    // Load or generate the RS256 signing key. A configured but unusable key
    // is fatal; a missing key only gets an ephemeral replacement.
    let signer = match &config.jwt_private_key_pem {
        Some(pem) => JwtSigner::from_pem(
            &config.jwt_key_id,
            &config.jwt_issuer,
            &config.jwt_audience,
            pem,
        )
        .expect("Failed to load the configured RSA private key"),
        None => {
            tracing::warn!(
                "JWT_PRIVATE_KEY_PEM not set; generating an ephemeral keypair. \
                 Issued tokens will not survive a restart."
            );
            JwtSigner::generate(&config.jwt_key_id, &config.jwt_issuer, &config.jwt_audience)
                .expect("Failed to generate RSA keypair")
        },
    };
    let signer = Arc::new(signer);

    tracing::info!(key_id = %config.jwt_key_id, "Signing key ready");

    // Initialize repositories
    let user_repo = PgUserRepository::new(db_pool.clone());
    let session_repo = PgSessionRepository::new(db_pool.clone());
    let client_repo = PgClientRepository::new(db_pool.clone());
    let code_repo = PgAuthorizationCodeRepository::new(db_pool.clone());
    let consent_repo = PgConsentRepository::new(db_pool.clone());
    let scope_repo = PgScopeRepository::new(db_pool.clone());

    // Startup invariant: the system client and default scopes exist
    ensure_system_client(
        &client_repo,
        &scope_repo,
        &SystemClientConfig {
            client_id: config.bff_client_id.clone(),
            client_secret: config.bff_client_secret.clone(),
            client_name: config.bff_client_name.clone(),
            redirect_uris: config.bff_redirect_uri_list(),
            bcrypt_cost: config.bcrypt_cost(),
        },
    )
    .await
    .expect("System client bootstrap failed");

    tracing::info!("System client verified");

    // Initialize services
    let auth_service = AuthServiceImpl::new(
        user_repo,
        session_repo,
        config.bcrypt_cost(),
        config.session_expires_in,
        config.session_remember_me_expires_in,
    );
    let client_service = ClientServiceImpl::new(
        PgClientRepository::new(db_pool.clone()),
        config.bcrypt_cost(),
        config.client_secret_grace_period,
    );
    let oauth_service = OAuthServiceImpl::new(
        PgUserRepository::new(db_pool.clone()),
        PgClientRepository::new(db_pool.clone()),
        code_repo,
        consent_repo,
        PgScopeRepository::new(db_pool.clone()),
        Arc::clone(&signer),
        config.oauth2_auth_code_expires_in,
        config.jwt_access_token_expires_in,
    );

    let config = Arc::new(config);
    let state = AppState {
        auth_service: Arc::new(auth_service),
        client_service: Arc::new(client_service),
        oauth_service: Arc::new(oauth_service),
        signer,
        config: Arc::clone(&config),
    };

    // Background cleanup of expired sessions and authorization codes;
    // best-effort, logs and continues on failure
    spawn_cleanup_task(&state, config.auto_cleanup_interval_ms);

    let router = app(state).layer(cors_layer(&config.cors_origin_list()));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight requests have drained; release the pool
    db_pool.close().await;
    tracing::info!("Shutdown complete");
}

fn spawn_cleanup_task<A, C, O>(state: &AppState<A, C, O>, interval_ms: u64)
where
    A: AuthService,
    C: ClientService,
    O: OAuthService,
{
    let auth_service = Arc::clone(&state.auth_service);
    let oauth_service = Arc::clone(&state.oauth_service);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1000)));
        // The first tick fires immediately; skip it so startup stays quick
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if let Err(e) = auth_service.cleanup_expired_sessions().await {
                tracing::warn!("Session cleanup failed: {}", e);
            }
            if let Err(e) = oauth_service.cleanup_expired_codes().await {
                tracing::warn!("Authorization code cleanup failed: {}", e);
            }
        }
    });
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, draining in-flight requests");
}

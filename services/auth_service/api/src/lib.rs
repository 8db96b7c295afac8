// Library exports for integration tests
pub mod client_handlers;
pub mod cookie_helper;
pub mod extractors;
pub mod handlers;
pub mod oauth_handlers;
pub mod openapi;

// Re-export commonly used types for tests
pub use handlers::AppState;

use auth_service_core::domains::auth::domain::service::AuthService;
use auth_service_core::domains::client::domain::service::ClientService;
use auth_service_core::domains::oauth::domain::service::OAuthService;
use auth_service_infra::auth::{AuthServiceImpl, PgSessionRepository, PgUserRepository};
use auth_service_infra::client::{ClientServiceImpl, PgClientRepository};
use auth_service_infra::oauth::{
    OAuthServiceImpl, PgAuthorizationCodeRepository, PgConsentRepository, PgScopeRepository,
};
use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub type ConcreteAuthService = AuthServiceImpl<PgUserRepository, PgSessionRepository>;
pub type ConcreteClientService = ClientServiceImpl<PgClientRepository>;
pub type ConcreteOAuthService = OAuthServiceImpl<
    PgUserRepository,
    PgClientRepository,
    PgAuthorizationCodeRepository,
    PgConsentRepository,
    PgScopeRepository,
>;
pub type ConcreteAppState =
    AppState<ConcreteAuthService, ConcreteClientService, ConcreteOAuthService>;

/// Build the application router over any service implementations
/// (production Pg-backed ones or test doubles)
pub fn app<A, C, O>(state: AppState<A, C, O>) -> Router
where
    A: AuthService,
    C: ClientService,
    O: OAuthService,
{
    let routes = Router::new()
        .route("/health", get(handlers::health_check))
        // Login and authorization flow
        .route(
            "/auth/login",
            get(handlers::login_form).post(handlers::login::<A, C, O>),
        )
        .route("/auth/authorize", get(oauth_handlers::authorize::<A, C, O>))
        .route(
            "/auth/authorize/decision",
            post(oauth_handlers::consent_decision::<A, C, O>),
        )
        .route("/auth/token", post(oauth_handlers::token::<A, C, O>))
        .route(
            "/auth/.well-known/jwks.json",
            get(oauth_handlers::jwks::<A, C, O>),
        )
        // User account
        .route("/user/", post(handlers::register::<A, C, O>))
        .route(
            "/user/me",
            get(handlers::me::<A, C, O>).put(handlers::update_me::<A, C, O>),
        )
        .route("/user/me/password", put(handlers::change_password::<A, C, O>))
        .route(
            "/user/me/upgrade/developer",
            put(handlers::upgrade_developer::<A, C, O>),
        )
        .route(
            "/user/me/upgrade/expenses",
            put(handlers::upgrade_expenses::<A, C, O>),
        )
        .route("/user/me/consents", get(oauth_handlers::list_consents::<A, C, O>))
        .route(
            "/user/me/consents/{id}",
            delete(oauth_handlers::revoke_consent::<A, C, O>),
        )
        // Client management
        .route(
            "/client",
            post(client_handlers::create_client::<A, C, O>)
                .get(client_handlers::list_clients::<A, C, O>),
        )
        .route(
            "/client/{id}",
            get(client_handlers::get_client::<A, C, O>)
                .put(client_handlers::update_client::<A, C, O>)
                .delete(client_handlers::delete_client::<A, C, O>),
        )
        .route(
            "/client/{id}/rotate-secret",
            post(client_handlers::rotate_client_secret::<A, C, O>),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

/// CORS layer from the configured origin list; an unknown origin simply
/// gets no CORS headers back
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    if parsed.is_empty() {
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

use auth_service_core::domains::auth::dto::auth_dto::*;
use auth_service_core::domains::client::dto::client_dto::*;
use auth_service_core::domains::oauth::dto::oauth_dto::*;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Authorization Server
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_check,
        crate::handlers::login_form,
        crate::handlers::login,
        crate::handlers::register,
        crate::handlers::me,
        crate::handlers::update_me,
        crate::handlers::change_password,
        crate::handlers::upgrade_developer,
        crate::handlers::upgrade_expenses,
        // OAuth2 endpoints
        crate::oauth_handlers::authorize,
        crate::oauth_handlers::consent_decision,
        crate::oauth_handlers::token,
        crate::oauth_handlers::jwks,
        crate::oauth_handlers::list_consents,
        crate::oauth_handlers::revoke_consent,
        // Client management
        crate::client_handlers::create_client,
        crate::client_handlers::list_clients,
        crate::client_handlers::get_client,
        crate::client_handlers::update_client,
        crate::client_handlers::delete_client,
        crate::client_handlers::rotate_client_secret,
    ),
    components(
        schemas(
            HealthResp,
            ErrorResp,
            RegisterReq,
            RegisterResp,
            LoginReq,
            LoginResp,
            UserInfo,
            UpdateProfileReq,
            ChangePasswordReq,
            ChangePasswordResp,
            UpgradeResp,
            // OAuth2 DTOs
            AuthorizeQuery,
            ConsentRequiredResp,
            ScopeDescription,
            ConsentDecisionReq,
            TokenReq,
            TokenResp,
            ConsentInfo,
            ConsentListResp,
            // Client DTOs
            CreateClientReq,
            CreateClientResp,
            ClientResp,
            ClientListResp,
            UpdateClientReq,
            RotateSecretResp,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and authorization flow"),
        (name = "oauth", description = "OAuth 2.0 endpoints"),
        (name = "user", description = "User account management"),
        (name = "client", description = "OAuth client management"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

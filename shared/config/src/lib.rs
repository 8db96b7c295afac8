use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Runtime environment: development, test or production
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Log level filter passed to the tracing subscriber
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Bcrypt cost factor for password and client-secret hashing
    #[serde(default = "default_bcrypt_rounds")]
    pub bcrypt_rounds: u32,

    /// Key id published in the JWKS document and JWT header
    #[serde(default = "default_jwt_key_id")]
    pub jwt_key_id: String,

    /// Issuer claim for signed access tokens
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,

    /// Audience claim for signed access tokens
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,

    /// Access token lifetime in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_jwt_access_token_expires_in")]
    pub jwt_access_token_expires_in: i64,

    /// PEM-encoded RSA private key for RS256 signing.
    /// When absent an ephemeral keypair is generated at startup.
    pub jwt_private_key_pem: Option<String>,

    /// Authorization code lifetime in seconds (default: 600 = 10 minutes)
    #[serde(default = "default_oauth2_auth_code_expires_in")]
    pub oauth2_auth_code_expires_in: i64,

    /// Login session lifetime in seconds (default: 86400 = 24 hours)
    #[serde(default = "default_session_expires_in")]
    pub session_expires_in: i64,

    /// Remember-me session lifetime in seconds (default: 604800 = 7 days)
    #[serde(default = "default_session_remember_me_expires_in")]
    pub session_remember_me_expires_in: i64,

    /// Grace window in seconds during which a rotated-out client secret
    /// still authenticates (default: 86400 = 24 hours)
    #[serde(default = "default_client_secret_grace_period")]
    pub client_secret_grace_period: i64,

    /// Comma-separated list of allowed CORS origins (empty = same-origin only)
    #[serde(default)]
    pub cors_origins: String,

    /// System client (BFF) bootstrap: external client identifier
    #[serde(default = "default_bff_client_id")]
    pub bff_client_id: String,

    /// System client bootstrap: plaintext secret, must be at least 32 characters
    #[serde(default)]
    pub bff_client_secret: String,

    /// System client bootstrap: display name
    #[serde(default = "default_bff_client_name")]
    pub bff_client_name: String,

    /// System client bootstrap: comma-separated redirect URIs
    #[serde(default = "default_bff_redirect_uris")]
    pub bff_redirect_uris: String,

    /// Interval for expired session/code cleanup in milliseconds
    #[serde(default = "default_auto_cleanup_interval_ms")]
    pub auto_cleanup_interval_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bcrypt_rounds() -> u32 {
    10
}

fn default_jwt_key_id() -> String {
    "auth-key-1".to_string()
}

fn default_jwt_issuer() -> String {
    "http://localhost:8080".to_string()
}

fn default_jwt_audience() -> String {
    "oauth2-api".to_string()
}

fn default_jwt_access_token_expires_in() -> i64 {
    3600 // 1 hour
}

fn default_oauth2_auth_code_expires_in() -> i64 {
    600 // 10 minutes
}

fn default_session_expires_in() -> i64 {
    86_400 // 24 hours
}

fn default_session_remember_me_expires_in() -> i64 {
    604_800 // 7 days
}

fn default_client_secret_grace_period() -> i64 {
    86_400 // 24 hours
}

fn default_bff_client_id() -> String {
    "bff-client".to_string()
}

fn default_bff_client_name() -> String {
    "BFF Web Client".to_string()
}

fn default_bff_redirect_uris() -> String {
    "http://localhost:3000/callback".to_string()
}

fn default_auto_cleanup_interval_ms() -> u64 {
    3_600_000 // 1 hour
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .set_default("database_url", "")?
            .add_source(config::Environment::default());

        builder.build()?.try_deserialize::<Config>()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Bcrypt cost clamped to the range the algorithm accepts
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_rounds.clamp(4, 31)
    }

    /// Allowed CORS origins as a list
    pub fn cors_origin_list(&self) -> Vec<String> {
        split_csv(&self.cors_origins)
    }

    /// System client redirect URIs as a list
    pub fn bff_redirect_uri_list(&self) -> Vec<String> {
        split_csv(&self.bff_redirect_uris)
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Grant types a client may be allowed to use
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";

/// OAuth client entity
///
/// `client_secret` holds a bcrypt hash, never the plaintext. During a
/// rotation grace window `client_secret_old` holds the previous hash and
/// `secret_expires_at` its cutoff. System clients are process-owned
/// (`user_id` is NULL) and bypass consent.
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub client_id: String,
    pub client_secret: String,
    pub client_secret_old: Option<String>,
    pub secret_expires_at: Option<DateTime<Utc>>,
    pub client_name: String,
    pub redirect_uris: Vec<String>,
    pub grant_types: Vec<String>,
    pub is_public: bool,
    pub is_active: bool,
    pub is_system_client: bool,
    pub system_role: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Create a developer-owned client
    pub fn new_owned(
        client_id: String,
        secret_hash: String,
        client_name: String,
        redirect_uris: Vec<String>,
        grant_types: Vec<String>,
        is_public: bool,
        owner_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            client_secret: secret_hash,
            client_secret_old: None,
            secret_expires_at: None,
            client_name,
            redirect_uris,
            grant_types,
            is_public,
            is_active: true,
            is_system_client: false,
            system_role: None,
            user_id: Some(owner_id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a first-party system client with the given role
    pub fn new_system(
        client_id: String,
        secret_hash: String,
        client_name: String,
        redirect_uris: Vec<String>,
        system_role: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            client_secret: secret_hash,
            client_secret_old: None,
            secret_expires_at: None,
            client_name,
            redirect_uris,
            grant_types: vec![GRANT_TYPE_AUTHORIZATION_CODE.to_string()],
            is_public: false,
            is_active: true,
            is_system_client: true,
            system_role: Some(system_role),
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Byte-exact match against the registered redirect URIs
    pub fn has_redirect_uri(&self, redirect_uri: &str) -> bool {
        self.redirect_uris.iter().any(|uri| uri == redirect_uri)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    /// Copy with a rotated secret: the current hash moves to the grace slot
    pub fn with_rotated_secret(
        mut self,
        new_secret_hash: String,
        grace_period: chrono::Duration,
        now: DateTime<Utc>,
    ) -> Self {
        self.client_secret_old = Some(std::mem::replace(&mut self.client_secret, new_secret_hash));
        self.secret_expires_at = Some(now + grace_period);
        self.updated_at = now;
        self
    }

    /// Whether the rotated-out secret is still inside its grace window
    pub fn old_secret_usable(&self, now: DateTime<Utc>) -> bool {
        match (&self.client_secret_old, self.secret_expires_at) {
            (Some(_), Some(expires_at)) => now < expires_at,
            _ => false,
        }
    }

    /// Copy with `is_active = false`
    pub fn with_deactivated(mut self, now: DateTime<Utc>) -> Self {
        self.is_active = false;
        self.updated_at = now;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client() -> Client {
        Client::new_owned(
            "c1".to_string(),
            "hash1".to_string(),
            "My App".to_string(),
            vec!["https://app/cb".to_string()],
            vec![GRANT_TYPE_AUTHORIZATION_CODE.to_string()],
            false,
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_redirect_uri_match_is_byte_exact() {
        let client = sample_client();
        assert!(client.has_redirect_uri("https://app/cb"));
        // Trailing slash differs
        assert!(!client.has_redirect_uri("https://app/cb/"));
        assert!(!client.has_redirect_uri("https://APP/cb"));
    }

    #[test]
    fn test_system_client_invariant() {
        let client = Client::new_system(
            "bff-client".to_string(),
            "hash".to_string(),
            "BFF".to_string(),
            vec!["http://localhost:3000/callback".to_string()],
            "bff".to_string(),
        );
        assert!(client.is_system_client);
        assert!(client.user_id.is_none());
        assert_eq!(client.system_role.as_deref(), Some("bff"));
    }

    #[test]
    fn test_rotation_moves_current_hash_to_grace_slot() {
        let client = sample_client();
        let now = Utc::now();
        let rotated =
            client.with_rotated_secret("hash2".to_string(), chrono::Duration::hours(24), now);

        assert_eq!(rotated.client_secret, "hash2");
        assert_eq!(rotated.client_secret_old.as_deref(), Some("hash1"));
        assert_eq!(rotated.secret_expires_at, Some(now + chrono::Duration::hours(24)));
        assert!(rotated.old_secret_usable(now));
        // Past the grace window the old hash no longer counts
        assert!(!rotated.old_secret_usable(now + chrono::Duration::hours(25)));
    }

    #[test]
    fn test_old_secret_unusable_without_rotation() {
        let client = sample_client();
        assert!(!client.old_secret_usable(Utc::now()));
    }

    #[test]
    fn test_ownership_check() {
        let owner = Uuid::new_v4();
        let client = Client::new_owned(
            "c1".to_string(),
            "hash".to_string(),
            "My App".to_string(),
            vec![],
            vec![],
            false,
            owner,
        );
        assert!(client.is_owned_by(owner));
        assert!(!client.is_owned_by(Uuid::new_v4()));
    }
}

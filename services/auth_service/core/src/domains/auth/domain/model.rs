use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Derived account classification from the developer/expenses flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    User,
    Developer,
    Hybrid,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::User => "user",
            AccountType::Developer => "developer",
            AccountType::Hybrid => "hybrid",
        }
    }
}

/// User entity (domain model)
///
/// Mapped directly to the `users` table. The email is stored lowercased;
/// `is_developer` and `can_use_expenses` each imply their `*_enabled_at`
/// timestamp is set.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub email_verified: bool,
    pub is_developer: bool,
    pub can_use_expenses: bool,
    pub developer_enabled_at: Option<DateTime<Utc>>,
    pub expenses_enabled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a regular user account (expenses enabled)
    pub fn new_user(
        email: &str,
        username: Option<String>,
        password_hash: String,
        full_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            username,
            password_hash,
            full_name,
            roles: vec!["user".to_string()],
            is_active: true,
            email_verified: false,
            is_developer: false,
            can_use_expenses: true,
            developer_enabled_at: None,
            expenses_enabled_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a developer account (expenses not enabled)
    pub fn new_developer(
        email: &str,
        username: Option<String>,
        password_hash: String,
        full_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            username,
            password_hash,
            full_name,
            roles: vec!["user".to_string()],
            is_active: true,
            email_verified: false,
            is_developer: true,
            can_use_expenses: false,
            developer_enabled_at: Some(now),
            expenses_enabled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn account_type(&self) -> AccountType {
        match (self.is_developer, self.can_use_expenses) {
            (true, true) => AccountType::Hybrid,
            (true, false) => AccountType::Developer,
            (false, _) => AccountType::User,
        }
    }

    /// Copy with the developer flag enabled
    pub fn with_developer_enabled(mut self, now: DateTime<Utc>) -> Self {
        self.is_developer = true;
        self.developer_enabled_at = Some(now);
        self.updated_at = now;
        self
    }

    /// Copy with the expenses flag enabled
    pub fn with_expenses_enabled(mut self, now: DateTime<Utc>) -> Self {
        self.can_use_expenses = true;
        self.expenses_enabled_at = Some(now);
        self.updated_at = now;
        self
    }

    /// Copy with a new password hash
    pub fn with_password_hash(mut self, password_hash: String, now: DateTime<Utc>) -> Self {
        self.password_hash = password_hash;
        self.updated_at = now;
        self
    }

    /// Copy with updated profile fields; `None` leaves a field unchanged
    pub fn with_profile(
        mut self,
        full_name: Option<String>,
        username: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        if let Some(full_name) = full_name {
            self.full_name = Some(full_name);
        }
        if let Some(username) = username {
            self.username = Some(username);
        }
        self.updated_at = now;
        self
    }
}

/// Login session entity
///
/// The id is a CSPRNG-generated opaque string that doubles as the cookie
/// value. A lookup past `expires_at` deletes the row and reads as not-found.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn issue(id: String, user_id: Uuid, expires_in: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            expires_at: now + chrono::Duration::seconds(expires_in),
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_derivation() {
        let user = User::new_user("u@x.test", None, "hash".to_string(), None);
        assert_eq!(user.account_type(), AccountType::User);
        assert!(user.can_use_expenses);
        assert!(user.expenses_enabled_at.is_some());
        assert!(user.developer_enabled_at.is_none());

        let dev = User::new_developer("d@x.test", None, "hash".to_string(), None);
        assert_eq!(dev.account_type(), AccountType::Developer);
        assert!(dev.developer_enabled_at.is_some());
        assert!(dev.expenses_enabled_at.is_none());

        let hybrid = dev.with_expenses_enabled(Utc::now());
        assert_eq!(hybrid.account_type(), AccountType::Hybrid);
        assert!(hybrid.expenses_enabled_at.is_some());
    }

    #[test]
    fn test_email_is_lowercased() {
        let user = User::new_user("  Mixed@Case.TEST ", None, "hash".to_string(), None);
        assert_eq!(user.email, "mixed@case.test");
    }

    #[test]
    fn test_developer_flag_implies_timestamp() {
        let user = User::new_user("u@x.test", None, "hash".to_string(), None);
        let upgraded = user.with_developer_enabled(Utc::now());
        assert!(upgraded.is_developer);
        assert!(upgraded.developer_enabled_at.is_some());
    }

    #[test]
    fn test_session_expiry_boundary() {
        let session = Session::issue("sid".to_string(), Uuid::new_v4(), 3600);
        assert!(!session.is_expired(session.created_at));
        // Expiring exactly at now counts as expired
        assert!(session.is_expired(session.expires_at));
        assert!(session.expires_at > session.created_at);
    }

    #[test]
    fn test_profile_update_keeps_unset_fields() {
        let user = User::new_user("u@x.test", Some("alice".to_string()), "hash".to_string(), None);
        let updated = user.clone().with_profile(Some("Alice".to_string()), None, Utc::now());
        assert_eq!(updated.full_name.as_deref(), Some("Alice"));
        assert_eq!(updated.username.as_deref(), Some("alice"));
    }
}

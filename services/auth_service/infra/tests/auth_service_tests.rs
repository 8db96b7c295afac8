//! User lifecycle and session tests over mocked storage.

mod common;

use auth_service_core::domains::auth::domain::service::AuthService;
use auth_service_core::domains::auth::dto::auth_dto::{
    ChangePasswordReq, LoginReq, RegisterReq, UpdateProfileReq,
};
use auth_service_infra::auth::AuthServiceImpl;
use chrono::Utc;
use common::*;
use mockall::predicate::eq;
use shared_error::AppError;
use uuid::Uuid;

const SESSION_TTL: i64 = 86_400;
const REMEMBER_ME_TTL: i64 = 604_800;

fn service(
    user_repo: MockUserRepo,
    session_repo: MockSessionRepo,
) -> AuthServiceImpl<MockUserRepo, MockSessionRepo> {
    AuthServiceImpl::new(user_repo, session_repo, TEST_BCRYPT_COST, SESSION_TTL, REMEMBER_ME_TTL)
}

fn register_req(account_type: Option<&str>) -> RegisterReq {
    RegisterReq {
        email: "New.User@Example.com".to_string(),
        username: Some("new_user".to_string()),
        password: "Str0ng&Unguessable#Pass".to_string(),
        full_name: Some("New User".to_string()),
        account_type: account_type.map(String::from),
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_register_defaults_to_user_account() {
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_email_exists().returning(|_| Ok(false));
    user_repo.expect_username_exists().returning(|_| Ok(false));
    user_repo
        .expect_create()
        .withf(|user| {
            user.email == "new.user@example.com"
                && !user.is_developer
                && user.can_use_expenses
                && user.expenses_enabled_at.is_some()
                && user.developer_enabled_at.is_none()
        })
        .returning(|user| Ok(user.clone()));
    let service = service(user_repo, MockSessionRepo::new());

    let resp = service.register(register_req(None)).await.unwrap();
    assert_eq!(resp.user.account_type, "user");
    assert_eq!(resp.user.email, "new.user@example.com");
}

#[tokio::test]
async fn test_register_developer_account_sets_flags() {
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_email_exists().returning(|_| Ok(false));
    user_repo.expect_username_exists().returning(|_| Ok(false));
    user_repo
        .expect_create()
        .withf(|user| {
            user.is_developer
                && !user.can_use_expenses
                && user.developer_enabled_at.is_some()
                && user.expenses_enabled_at.is_none()
        })
        .returning(|user| Ok(user.clone()));
    let service = service(user_repo, MockSessionRepo::new());

    let resp = service.register(register_req(Some("developer"))).await.unwrap();
    assert_eq!(resp.user.account_type, "developer");
}

#[tokio::test]
async fn test_register_rejects_unknown_account_type() {
    let service = service(MockUserRepo::new(), MockSessionRepo::new());

    let result = service.register(register_req(Some("admin"))).await;
    assert!(matches!(result, Err(AppError::ValidateRequest(_))));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_email_exists().returning(|_| Ok(true));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service.register(register_req(None)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_email_exists().returning(|_| Ok(false));
    user_repo.expect_username_exists().returning(|_| Ok(true));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service.register(register_req(None)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_email_exists().returning(|_| Ok(false));
    user_repo.expect_username_exists().returning(|_| Ok(false));
    let service = service(user_repo, MockSessionRepo::new());

    let mut req = register_req(None);
    req.password = "Password1!".to_string();

    let result = service.register(req).await;
    assert!(matches!(result, Err(AppError::ValidateRequest(_))));
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_by_email_issues_session() {
    let user = UserBuilder::new().with_password("P@ssw0rd!123").build();
    let stored = user.clone();
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_email()
        .returning(move |_| Ok(Some(stored.clone())));
    let mut session_repo = MockSessionRepo::new();
    session_repo
        .expect_create()
        .withf(move |session| {
            session.user_id == user.id && session.id.len() >= 43 && session.expires_at > Utc::now()
        })
        .returning(|session| Ok(session.clone()));
    let service = service(user_repo, session_repo);

    let resp = service
        .login(LoginReq {
            email_or_username: "user@example.com".to_string(),
            password: "P@ssw0rd!123".to_string(),
            remember_me: false,
        })
        .await
        .unwrap();

    assert!(!resp.session_id.is_empty());
    assert_eq!(resp.user.email, "user@example.com");
}

#[tokio::test]
async fn test_login_falls_back_to_username_lookup() {
    let user = UserBuilder::new()
        .with_username("alice")
        .with_password("P@ssw0rd!123")
        .build();
    let stored = user.clone();
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_find_by_email().returning(|_| Ok(None));
    user_repo
        .expect_find_by_username()
        .returning(move |_| Ok(Some(stored.clone())));
    let mut session_repo = MockSessionRepo::new();
    session_repo.expect_create().returning(|session| Ok(session.clone()));
    let service = service(user_repo, session_repo);

    let resp = service
        .login(LoginReq {
            email_or_username: "alice".to_string(),
            password: "P@ssw0rd!123".to_string(),
            remember_me: false,
        })
        .await;

    assert!(resp.is_ok());
}

#[tokio::test]
async fn test_login_remember_me_extends_session() {
    let user = UserBuilder::new().with_password("P@ssw0rd!123").build();
    let stored = user.clone();
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_email()
        .returning(move |_| Ok(Some(stored.clone())));
    let mut session_repo = MockSessionRepo::new();
    session_repo
        .expect_create()
        .withf(|session| {
            // 7 days, not 24 hours
            session.expires_at > Utc::now() + chrono::Duration::days(6)
        })
        .returning(|session| Ok(session.clone()));
    let service = service(user_repo, session_repo);

    let resp = service
        .login(LoginReq {
            email_or_username: "user@example.com".to_string(),
            password: "P@ssw0rd!123".to_string(),
            remember_me: true,
        })
        .await;

    assert!(resp.is_ok());
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_answer_identically() {
    // Unknown user
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_find_by_email().returning(|_| Ok(None));
    user_repo.expect_find_by_username().returning(|_| Ok(None));
    let unknown = service(user_repo, MockSessionRepo::new())
        .login(LoginReq {
            email_or_username: "ghost@example.com".to_string(),
            password: "whatever".to_string(),
            remember_me: false,
        })
        .await;

    // Wrong password
    let user = UserBuilder::new().with_password("P@ssw0rd!123").build();
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_email()
        .returning(move |_| Ok(Some(user.clone())));
    let wrong = service(user_repo, MockSessionRepo::new())
        .login(LoginReq {
            email_or_username: "user@example.com".to_string(),
            password: "not-the-password".to_string(),
            remember_me: false,
        })
        .await;

    let unknown_err = unknown.err().expect("unknown user must fail");
    let wrong_err = wrong.err().expect("wrong password must fail");
    assert!(matches!(unknown_err, AppError::InvalidCredentials));
    assert!(matches!(wrong_err, AppError::InvalidCredentials));
    assert_eq!(unknown_err.to_string(), wrong_err.to_string());
}

#[tokio::test]
async fn test_login_inactive_user_is_rejected() {
    let user = UserBuilder::new().with_password("P@ssw0rd!123").inactive().build();
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_email()
        .returning(move |_| Ok(Some(user.clone())));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service
        .login(LoginReq {
            email_or_username: "user@example.com".to_string(),
            password: "P@ssw0rd!123".to_string(),
            remember_me: false,
        })
        .await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

// ---------------------------------------------------------------------------
// Session resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_find_session_user_resolves_live_session() {
    let user = UserBuilder::new().build();
    let user_id = user.id;
    let session =
        auth_service_core::domains::auth::domain::model::Session::issue("sid-1".to_string(), user_id, 3600);
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_id()
        .with(eq(user_id))
        .returning(move |_| Ok(Some(user.clone())));
    let mut session_repo = MockSessionRepo::new();
    session_repo
        .expect_find_valid_by_id()
        .returning(move |_| Ok(Some(session.clone())));
    let service = service(user_repo, session_repo);

    let (session, user) = service.find_session_user("sid-1").await.unwrap();
    assert_eq!(session.user_id, user_id);
    assert_eq!(user.id, user_id);
}

#[tokio::test]
async fn test_find_session_user_expired_session_is_invalid() {
    let mut session_repo = MockSessionRepo::new();
    // The repository already treats expired rows as absent
    session_repo.expect_find_valid_by_id().returning(|_| Ok(None));
    let service = service(MockUserRepo::new(), session_repo);

    let result = service.find_session_user("stale").await;
    assert!(matches!(result, Err(AppError::InvalidSession)));
}

// ---------------------------------------------------------------------------
// Profile and password
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_update_profile_username_collision_conflicts() {
    let user = UserBuilder::new().with_username("alice").build();
    let user_id = user.id;
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    user_repo.expect_username_exists().returning(|_| Ok(true));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service
        .update_profile(
            user_id,
            UpdateProfileReq {
                full_name: None,
                username: Some("taken".to_string()),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_update_profile_same_username_skips_uniqueness_check() {
    let user = UserBuilder::new().with_username("alice").build();
    let user_id = user.id;
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    // username_exists has no expectation: calling it would panic
    user_repo.expect_update().returning(|user| Ok(user.clone()));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service
        .update_profile(
            user_id,
            UpdateProfileReq {
                full_name: Some("Alice A.".to_string()),
                username: Some("alice".to_string()),
            },
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_change_password_requires_current_password() {
    let user = UserBuilder::new().with_password("P@ssw0rd!123").build();
    let user_id = user.id;
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service
        .change_password(
            user_id,
            ChangePasswordReq {
                current_password: "wrong-current".to_string(),
                new_password: "Another&Str0ng#Password".to_string(),
                revoke_all_sessions: false,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_change_password_rejects_reusing_current() {
    let user = UserBuilder::new().with_password("P@ssw0rd!123").build();
    let user_id = user.id;
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service
        .change_password(
            user_id,
            ChangePasswordReq {
                current_password: "P@ssw0rd!123".to_string(),
                new_password: "P@ssw0rd!123".to_string(),
                revoke_all_sessions: false,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidateRequest(_))));
}

#[tokio::test]
async fn test_change_password_updates_hash_and_revokes_sessions() {
    let user = UserBuilder::new().with_password("P@ssw0rd!123").build();
    let user_id = user.id;
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    user_repo
        .expect_update()
        .withf(|user| {
            // The old plaintext no longer verifies against the stored hash
            !bcrypt::verify("P@ssw0rd!123", &user.password_hash).unwrap_or(false)
                && bcrypt::verify("Another&Str0ng#Password", &user.password_hash).unwrap_or(false)
        })
        .returning(|user| Ok(user.clone()));
    let mut session_repo = MockSessionRepo::new();
    session_repo
        .expect_delete_by_user()
        .with(eq(user_id))
        .times(1)
        .returning(|_| Ok(3));
    let service = service(user_repo, session_repo);

    let resp = service
        .change_password(
            user_id,
            ChangePasswordReq {
                current_password: "P@ssw0rd!123".to_string(),
                new_password: "Another&Str0ng#Password".to_string(),
                revoke_all_sessions: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(resp.sessions_revoked, Some(3));
}

// ---------------------------------------------------------------------------
// Account upgrades
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_upgrade_to_developer() {
    let user = UserBuilder::new().build();
    let user_id = user.id;
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    user_repo
        .expect_update()
        .withf(|user| user.is_developer && user.developer_enabled_at.is_some())
        .returning(|user| Ok(user.clone()));
    let service = service(user_repo, MockSessionRepo::new());

    let resp = service.upgrade_to_developer(user_id).await.unwrap();
    assert!(resp.user.is_developer);
    // Regular account keeps expenses: upgrade produces a hybrid
    assert_eq!(resp.user.account_type, "hybrid");
}

#[tokio::test]
async fn test_upgrade_already_developer_fails() {
    let user = UserBuilder::new().as_developer().build();
    let user_id = user.id;
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service.upgrade_to_developer(user_id).await;
    assert!(matches!(result, Err(AppError::InvalidUser(_))));
}

#[tokio::test]
async fn test_enable_expenses_already_enabled_fails() {
    // Default user accounts already have expenses enabled
    let user = UserBuilder::new().build();
    let user_id = user.id;
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service.enable_expenses(user_id).await;
    assert!(matches!(result, Err(AppError::InvalidUser(_))));
}

#[tokio::test]
async fn test_cleanup_expired_sessions_reports_count() {
    let mut session_repo = MockSessionRepo::new();
    session_repo.expect_delete_expired().returning(|| Ok(5));
    let service = service(MockUserRepo::new(), session_repo);

    assert_eq!(service.cleanup_expired_sessions().await.unwrap(), 5);
}

#[tokio::test]
async fn test_get_user_missing_is_invalid_user() {
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_find_by_id().returning(|_| Ok(None));
    let service = service(user_repo, MockSessionRepo::new());

    let result = service.get_user(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::InvalidUser(_))));
}

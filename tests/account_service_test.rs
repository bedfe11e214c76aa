//! Account service tests for the password update workflow.
//!
//! The repository is mocked; sessions, CSRF tokens, and hashing are the
//! real implementations so the tests exercise the actual workflow.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use mockall::predicate::eq;

use user_admin::domain::{Password, UpdatePassword, User};
use user_admin::errors::AppError;
use user_admin::infra::{MockUserRepository, Session, SessionStore};
use user_admin::security::CsrfTokenManager;
use user_admin::services::{AccountManager, EditOutcome, UpdateOutcome, UserAccountService};

fn test_user(id: i64) -> User {
    User {
        id,
        username: "alice".to_string(),
        password_hash: "old-hash".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn new_session() -> Session {
    SessionStore::new().resolve(None).0
}

/// Issue a token the way the edit form render does.
fn issue_update_token(session: &Session) -> String {
    CsrfTokenManager::new()
        .issue(session, "update-user")
        .value()
        .to_string()
}

#[tokio::test]
async fn test_update_password_hashes_and_persists() {
    let session = new_session();
    let token = issue_update_token(&session);

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(42_i64))
        .returning(|id| Ok(Some(test_user(id))));

    let stored: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let stored_hash = stored.clone();
    repo.expect_update_password()
        .withf(|id, _| *id == 42)
        .returning(move |id, hash| {
            *stored_hash.lock().unwrap() = Some(hash.clone());
            let mut user = test_user(id);
            user.password_hash = hash;
            Ok(user)
        });

    let service = AccountManager::new(Arc::new(repo));
    let outcome = service
        .update_password(
            &session,
            42,
            UpdatePassword {
                token,
                password: "pw1234".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Updated);

    let hash = stored.lock().unwrap().clone().expect("hash persisted");
    assert_ne!(hash, "pw1234");
    assert!(Password::from_hash(hash).verify("pw1234"));
}

#[tokio::test]
async fn test_update_password_sanitizes_markup_before_hashing() {
    let session = new_session();
    let token = issue_update_token(&session);

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));

    let stored: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let stored_hash = stored.clone();
    repo.expect_update_password().returning(move |id, hash| {
        *stored_hash.lock().unwrap() = Some(hash.clone());
        let mut user = test_user(id);
        user.password_hash = hash;
        Ok(user)
    });

    let service = AccountManager::new(Arc::new(repo));
    let outcome = service
        .update_password(
            &session,
            42,
            UpdatePassword {
                token,
                password: "  <b>pw1234</b>  ".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Updated);

    // The markup and padding are gone before hashing
    let hash = stored.lock().unwrap().clone().expect("hash persisted");
    let password = Password::from_hash(hash);
    assert!(password.verify("pw1234"));
    assert!(!password.verify("  <b>pw1234</b>  "));
}

#[tokio::test]
async fn test_invalid_csrf_rejected_without_touching_store() {
    let session = new_session();
    issue_update_token(&session);

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(0);
    repo.expect_update_password().times(0);

    let service = AccountManager::new(Arc::new(repo));
    let err = service
        .update_password(
            &session,
            42,
            UpdatePassword {
                token: "forged".to_string(),
                password: "pw1234".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidCsrf));
    assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_without_issued_token_is_rejected() {
    let session = new_session();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(0);
    repo.expect_update_password().times(0);

    let service = AccountManager::new(Arc::new(repo));
    let err = service
        .update_password(
            &session,
            42,
            UpdatePassword {
                token: "anything".to_string(),
                password: "pw1234".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidCsrf));
}

#[tokio::test]
async fn test_empty_password_flashes_and_redirects_to_edit() {
    let session = new_session();
    let token = issue_update_token(&session);

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    repo.expect_update_password().times(0);

    let service = AccountManager::new(Arc::new(repo));
    let outcome = service
        .update_password(
            &session,
            42,
            UpdatePassword {
                token,
                password: String::new(),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::RetryEdit(42));

    // The flash message is delivered exactly once
    assert_eq!(
        session.take_flash("form-error").as_deref(),
        Some("Password is required")
    );
    assert_eq!(session.take_flash("form-error"), None);
}

#[tokio::test]
async fn test_markup_only_password_is_treated_as_empty() {
    let session = new_session();
    let token = issue_update_token(&session);

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    repo.expect_update_password().times(0);

    let service = AccountManager::new(Arc::new(repo));
    let outcome = service
        .update_password(
            &session,
            42,
            UpdatePassword {
                token,
                password: "<b></b>".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::RetryEdit(42));
    assert!(session.take_flash("form-error").is_some());
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found() {
    let session = new_session();
    let token = issue_update_token(&session);

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().with(eq(7_i64)).returning(|_| Ok(None));
    repo.expect_update_password().times(0);

    let service = AccountManager::new(Arc::new(repo));
    let err = service
        .update_password(
            &session,
            7,
            UpdatePassword {
                token,
                password: "pw1234".to_string(),
            },
        )
        .await
        .unwrap_err();

    // Distinct from the CSRF and validation error kinds
    assert!(matches!(err, AppError::NotFound));
    assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_unknown_user_redirects_to_index() {
    let session = new_session();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let service = AccountManager::new(Arc::new(repo));
    let outcome = service.edit(&session, 7).await.unwrap();

    assert!(matches!(outcome, EditOutcome::RedirectToIndex));
}

#[tokio::test]
async fn test_edit_mints_token_and_consumes_flash() {
    let session = new_session();
    session.set_flash("form-error", "Password is required");

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));

    let service = AccountManager::new(Arc::new(repo));
    let outcome = service.edit(&session, 42).await.unwrap();

    let EditOutcome::Form(view) = outcome else {
        panic!("expected form outcome");
    };
    assert_eq!(view.user.id, 42);
    assert_eq!(view.csrf_token.intention(), "update-user");
    assert!(!view.csrf_token.value().is_empty());
    assert_eq!(view.flash_error.as_deref(), Some("Password is required"));

    // Consumed: a rerender shows no stale error
    let outcome = service.edit(&session, 42).await.unwrap();
    let EditOutcome::Form(view) = outcome else {
        panic!("expected form outcome");
    };
    assert_eq!(view.flash_error, None);
}

#[tokio::test]
async fn test_token_minted_by_edit_validates_on_update() {
    let session = new_session();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    repo.expect_update_password()
        .returning(|id, hash| {
            let mut user = test_user(id);
            user.password_hash = hash;
            Ok(user)
        });

    let service = AccountManager::new(Arc::new(repo));

    let EditOutcome::Form(view) = service.edit(&session, 42).await.unwrap() else {
        panic!("expected form outcome");
    };

    let outcome = service
        .update_password(
            &session,
            42,
            UpdatePassword {
                token: view.csrf_token.value().to_string(),
                password: "pw1234".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Updated);
}

#[tokio::test]
async fn test_list_users_returns_all() {
    let mut repo = MockUserRepository::new();
    repo.expect_list()
        .returning(|| Ok(vec![test_user(1), test_user(2)]));

    let service = AccountManager::new(Arc::new(repo));
    let users = service.list_users().await.unwrap();

    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_delete_is_explicitly_unimplemented() {
    let repo = MockUserRepository::new();

    let service = AccountManager::new(Arc::new(repo));
    let err = service.delete(42).await.unwrap_err();

    assert!(matches!(err, AppError::Unimplemented(_)));
    assert_eq!(err.status(), axum::http::StatusCode::NOT_IMPLEMENTED);
}

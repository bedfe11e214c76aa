//! User account service - the edit/update/delete workflow.
//!
//! Orchestrates the password-update lifecycle: lookup, CSRF check,
//! sanitization, hashing, persistence, and the redirect decisions that
//! the HTTP layer translates into responses.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{
    CSRF_INTENTION_UPDATE_USER, FLASH_KEY_FORM_ERROR, FLASH_MSG_PASSWORD_REQUIRED,
};
use crate::domain::{sanitize_password, Password, UpdatePassword, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{Session, UserRepository};
use crate::security::{CsrfToken, CsrfTokenManager};

/// View model for the edit form.
#[derive(Debug, Clone)]
pub struct EditView {
    pub user: User,
    pub csrf_token: CsrfToken,
    /// Pending validation error consumed from the session, if any
    pub flash_error: Option<String>,
}

/// Result of rendering the edit form.
#[derive(Debug, Clone)]
pub enum EditOutcome {
    /// Render the form for this user
    Form(Box<EditView>),
    /// User unknown; send the caller back to the listing
    RedirectToIndex,
}

/// Result of a password update that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Password persisted; send the caller to the listing
    Updated,
    /// Submission rejected as user-correctable; a flash message is set
    /// and the caller returns to the edit form for this user id
    RetryEdit(i64),
}

/// User account service trait for dependency injection.
#[async_trait]
pub trait UserAccountService: Send + Sync {
    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Look up a user and mint the edit-form view model
    async fn edit(&self, session: &Session, id: i64) -> AppResult<EditOutcome>;

    /// Run the password-update workflow for a user
    async fn update_password(
        &self,
        session: &Session,
        id: i64,
        payload: UpdatePassword,
    ) -> AppResult<UpdateOutcome>;

    /// Delete a user. Deliberately unimplemented; callers get an explicit
    /// error instead of a false success.
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserAccountService.
pub struct AccountManager {
    repo: Arc<dyn UserRepository>,
    csrf: CsrfTokenManager,
}

impl AccountManager {
    /// Create new service instance with a user store
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            repo,
            csrf: CsrfTokenManager::new(),
        }
    }
}

#[async_trait]
impl UserAccountService for AccountManager {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        tracing::info!("Searching for users");
        self.repo.list().await
    }

    async fn edit(&self, session: &Session, id: i64) -> AppResult<EditOutcome> {
        let Some(user) = self.repo.find_by_id(id).await? else {
            // Unknown id on a GET is not an error worth surfacing; the
            // listing is the safe place to land.
            tracing::warn!(id, "User does not exist");
            return Ok(EditOutcome::RedirectToIndex);
        };

        let csrf_token = self.csrf.issue(session, CSRF_INTENTION_UPDATE_USER);
        let flash_error = session.take_flash(FLASH_KEY_FORM_ERROR);

        Ok(EditOutcome::Form(Box::new(EditView {
            user,
            csrf_token,
            flash_error,
        })))
    }

    async fn update_password(
        &self,
        session: &Session,
        id: i64,
        payload: UpdatePassword,
    ) -> AppResult<UpdateOutcome> {
        // Integrity first: a bad token means a forged or replayed request,
        // rejected outright without the friendly round-trip.
        if !self
            .csrf
            .validate(session, CSRF_INTENTION_UPDATE_USER, &payload.token)
        {
            tracing::error!(threat = "csrf", "CSRF token is invalid");
            return Err(AppError::InvalidCsrf);
        }

        let user = self.repo.find_by_id(id).await?.ok_or_else(|| {
            // By now the caller committed to an update; an unknown id is a
            // real error, not a silent redirect.
            tracing::error!(id, "User does not exist");
            AppError::NotFound
        })?;

        let password = sanitize_password(&payload.password);
        if password.is_empty() {
            session.set_flash(FLASH_KEY_FORM_ERROR, FLASH_MSG_PASSWORD_REQUIRED);
            return Ok(UpdateOutcome::RetryEdit(user.id));
        }

        let hash = Password::new(&password)?.into_string();
        self.repo.update_password(user.id, hash).await?;

        tracing::info!(id = user.id, "Password updated");
        Ok(UpdateOutcome::Updated)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        tracing::warn!(id, "Delete requested but not implemented");
        Err(AppError::Unimplemented("User deletion"))
    }
}

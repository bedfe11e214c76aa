//! User administration handlers.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, put},
    Extension, Form, Router,
};
use serde::Deserialize;

use crate::api::{views, AppState};
use crate::config::USERS_PATH;
use crate::domain::{UpdatePassword, UserListEntry};
use crate::errors::AppResult;
use crate::infra::Session;
use crate::services::{EditOutcome, UpdateOutcome};

/// Password update form submission.
///
/// Field names are part of the external contract: the rendered form
/// posts `password` and `_token`. Both default to empty so a stripped
/// submission still reaches the CSRF check instead of a 422.
#[derive(Debug, Deserialize)]
pub struct UpdateUserForm {
    #[serde(rename = "_token", default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

/// Create user administration routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/edit/:id", get(edit))
        // Browsers can't submit PUT forms; accept the same body via POST
        .route("/:id", put(update).post(update))
        .route("/delete/:id", get(destroy))
}

/// List all users
pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    let users = state.account_service.list_users().await?;

    if users.is_empty() {
        tracing::warn!("No users");
        return Ok((StatusCode::NOT_FOUND, "Could not find any users").into_response());
    }

    let entries: Vec<UserListEntry> = users.into_iter().map(UserListEntry::from).collect();
    Ok(Html(views::users_index(&entries)).into_response())
}

/// Render the password edit form
pub async fn edit(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match state.account_service.edit(&session, id).await? {
        EditOutcome::Form(view) => Ok(Html(views::edit_form(&view)).into_response()),
        EditOutcome::RedirectToIndex => Ok(found(USERS_PATH)),
    }
}

/// Update a user's password
pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
    Form(form): Form<UpdateUserForm>,
) -> AppResult<Response> {
    let payload = UpdatePassword {
        token: form.token,
        password: form.password,
    };

    match state
        .account_service
        .update_password(&session, id, payload)
        .await?
    {
        UpdateOutcome::Updated => Ok(found(USERS_PATH)),
        UpdateOutcome::RetryEdit(id) => Ok(found(&format!("{}/edit/{}", USERS_PATH, id))),
    }
}

/// Delete a user (explicitly not implemented)
pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    state.account_service.delete(id).await?;
    Ok(StatusCode::OK.into_response())
}

/// 302 Found redirect.
///
/// `axum::response::Redirect` answers 303; the forms here round-trip
/// through the historical 302 the views were written against.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

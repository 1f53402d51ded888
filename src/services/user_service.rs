use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    Set,
};

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult, is_unique_violation},
    models::User,
    password::{hash_password, verify_password},
    state::AppState,
};

pub async fn create_user(state: &AppState, payload: CreateUserRequest) -> AppResult<User> {
    let CreateUserRequest {
        username,
        password,
        email,
        first_name,
        last_name,
    } = payload;

    if username.is_empty() {
        return Err(AppError::BadRequest("The given username must be set".into()));
    }
    ensure_username_free(&state.orm, &username).await?;

    let password_hash = hash_password(&password)?;

    let user = UserActive {
        username: Set(username),
        password_hash: Set(password_hash),
        email: Set(email.as_deref().and_then(normalize_email)),
        first_name: Set(first_name),
        last_name: Set(last_name),
        ..UserActive::new()
    }
    .insert(&state.orm)
    .await
    .map_err(map_username_conflict)?;

    tracing::info!(user_id = user.id, username = %user.username, "user created");
    Ok(user.into())
}

pub async fn get_user(state: &AppState, id: i32) -> AppResult<User> {
    tracing::debug!(user_id = id, "fetching user");
    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(user.into())
}

/// Merge `payload` into the stored user. Empty values keep the stored field.
pub async fn update_user(
    state: &AppState,
    id: i32,
    payload: UpdateUserRequest,
) -> AppResult<User> {
    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(username) = non_empty(&payload.username) {
        if username != user.username {
            ensure_username_free(&state.orm, username).await?;
        }
    }

    let mut active: UserActive = user.clone().into();
    merge_profile(&mut active, &payload);
    if let Some(password) = non_empty(&payload.password) {
        active.password_hash = Set(hash_password(password)?);
    }

    if !active.is_changed() {
        return Ok(user.into());
    }

    let user = active
        .update(&state.orm)
        .await
        .map_err(map_username_conflict)?;

    tracing::info!(user_id = user.id, "user updated");
    Ok(user.into())
}

/// Check a plaintext candidate against the user's stored hash.
pub fn check_password(user: &User, candidate: &str) -> AppResult<bool> {
    verify_password(candidate, &user.password_hash)
}

fn merge_profile(active: &mut UserActive, payload: &UpdateUserRequest) {
    if let Some(username) = non_empty(&payload.username) {
        active.username = Set(username.to_owned());
    }
    if let Some(email) = non_empty(&payload.email).and_then(normalize_email) {
        active.email = Set(Some(email));
    }
    if let Some(first_name) = non_empty(&payload.first_name) {
        active.first_name = Set(first_name.to_owned());
    }
    if let Some(last_name) = non_empty(&payload.last_name) {
        active.last_name = Set(last_name.to_owned());
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Lowercase the domain part; the local part is case sensitive.
fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim();
    if email.is_empty() {
        return None;
    }
    match email.rsplit_once('@') {
        Some((local, domain)) => Some(format!("{local}@{}", domain.to_lowercase())),
        None => Some(email.to_owned()),
    }
}

async fn ensure_username_free<C: ConnectionTrait>(conn: &C, username: &str) -> AppResult<()> {
    let exist = Users::find()
        .filter(UserCol::Username.eq(username))
        .one(conn)
        .await?;
    if exist.is_some() {
        return Err(AppError::Duplicate("Username is already taken".into()));
    }
    Ok(())
}

fn map_username_conflict(err: sea_orm::DbErr) -> AppError {
    if is_unique_violation(&err) {
        AppError::Duplicate("Username is already taken".into())
    } else {
        AppError::from(err)
    }
}

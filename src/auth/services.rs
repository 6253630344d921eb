use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::auth::{
    dto::{AuthResponse, PublicUser},
    error::AuthError,
    jwt::{JwtKeys, TokenPayload},
    password::Hasher,
};
use crate::store::{UserRecord, UserRole, UserStore};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn generate_id() -> Uuid {
    Uuid::new_v4()
}

fn require(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!(
            "'{field}' must be a non-empty string"
        )));
    }
    Ok(())
}

/// Registers a new account with `UserRole::Normal` and returns a token over
/// its identity claims. Email uniqueness is the store's guarantee; a
/// conflict there surfaces as [`AuthError::Conflict`].
pub async fn signup(
    store: &dyn UserStore,
    hasher: &Hasher,
    keys: &JwtKeys,
    name: &str,
    email: &str,
    password: &str,
) -> Result<AuthResponse, AuthError> {
    require("name", name)?;
    require("email", email)?;
    require("password", password)?;

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AuthError::Validation(
            "'email' must be a valid address".into(),
        ));
    }

    let id = generate_id();
    let password_hash = hasher.hash(password)?;

    let record = UserRecord {
        id,
        name: name.to_string(),
        email,
        password_hash,
        role: UserRole::Normal,
        created_at: OffsetDateTime::now_utc(),
    };
    store.insert_user(record.clone()).await?;

    let token = keys.sign(&TokenPayload {
        id,
        name: record.name,
        role: record.role,
    })?;

    info!(user_id = %id, "user signed up");
    Ok(AuthResponse {
        message: "signup successful".into(),
        token,
    })
}

/// Authenticates credentials. A lookup miss is [`AuthError::NotFound`]; a
/// hash mismatch is [`AuthError::InvalidCredentials`] with a generic message
/// that does not say which of the two inputs was wrong.
pub async fn login(
    store: &dyn UserStore,
    hasher: &Hasher,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<AuthResponse, AuthError> {
    require("email", email)?;
    require("password", password)?;

    let email = email.trim().to_lowercase();
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AuthError::NotFound)?;

    if !hasher.verify(password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys.sign(&TokenPayload {
        id: user.id,
        name: user.name,
        role: user.role,
    })?;

    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse {
        message: "login successful".into(),
        token,
    })
}

/// Lists accounts in their business view, admin only. The substring rule for
/// `query` belongs to the store; this only forwards the filter and strips
/// the hash from every record.
pub async fn list_users(
    store: &dyn UserStore,
    keys: &JwtKeys,
    query: Option<&str>,
    token: Option<&str>,
) -> Result<Vec<PublicUser>, AuthError> {
    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => return Err(AuthError::Validation("token is required".into())),
    };

    let payload = keys.payload(token).ok_or(AuthError::Authentication)?;
    if payload.role != UserRole::Admin {
        return Err(AuthError::Authorization);
    }

    let users = store.find_users(query).await?;
    Ok(users.iter().map(PublicUser::from).collect())
}

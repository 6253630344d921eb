use axum::{
    extract::{FromRef, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::{
    dto::{AuthResponse, LoginRequest, PublicUser, SignupRequest, UsersQuery},
    error::AuthError,
    jwt::JwtKeys,
    services,
};
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
        .route("/users", get(list_users))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value).to_string())
}

#[instrument(skip(state, payload))]
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let keys = JwtKeys::from_ref(&state);
    let out = services::signup(
        state.store.as_ref(),
        &state.hasher,
        &keys,
        &payload.name,
        &payload.email,
        &payload.password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(out)))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let keys = JwtKeys::from_ref(&state);
    let out = services::login(
        state.store.as_ref(),
        &state.hasher,
        &keys,
        &payload.email,
        &payload.password,
    )
    .await?;
    Ok(Json(out))
}

#[instrument(skip(state, headers))]
async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<PublicUser>>, AuthError> {
    let keys = JwtKeys::from_ref(&state);
    let token = bearer_token(&headers);
    let users = services::list_users(
        state.store.as_ref(),
        &keys,
        query.q.as_deref(),
        token.as_deref(),
    )
    .await?;
    Ok(Json(users))
}

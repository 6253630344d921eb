use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

/// Coarse permission tag gating the user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Normal,
    Admin,
}

/// User record as persisted (storage view). The hash never serializes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence contract for user records. The store owns the uniqueness
/// guarantee on email and the substring-matching rule for `find_users`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users matching `query` over name/email, in store order.
    async fn find_users(&self, query: Option<&str>) -> Result<Vec<UserRecord>, StoreError>;

    /// Exact email match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Rejects a duplicate email with [`StoreError::DuplicateEmail`].
    async fn insert_user(&self, record: UserRecord) -> Result<(), StoreError>;
}

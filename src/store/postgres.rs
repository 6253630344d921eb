use async_trait::async_trait;
use sqlx::PgPool;

use super::{StoreError, UserRecord, UserStore};

/// Postgres-backed user store.
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        // 23505 = unique_violation
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Backend(e.into())
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_users(&self, query: Option<&str>) -> Result<Vec<UserRecord>, StoreError> {
        let rows = match query {
            Some(q) => {
                sqlx::query_as::<_, UserRecord>(
                    r#"
                    SELECT id, name, email, password_hash, role, created_at
                    FROM users
                    WHERE name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%'
                    ORDER BY created_at
                    "#,
                )
                .bind(q)
                .fetch_all(&self.db)
                .await
            }
            None => {
                sqlx::query_as::<_, UserRecord>(
                    r#"
                    SELECT id, name, email, password_hash, role, created_at
                    FROM users
                    ORDER BY created_at
                    "#,
                )
                .fetch_all(&self.db)
                .await
            }
        }
        .map_err(map_err)?;
        Ok(rows)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(map_err)?;
        Ok(user)
    }

    async fn insert_user(&self, record: UserRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.role)
        .bind(record.created_at)
        .execute(&self.db)
        .await
        .map_err(map_err)?;
        Ok(())
    }
}

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, UserRecord, UserStore};

/// In-memory user store. Used by unit tests and local runs without a
/// database; keeps insertion order.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_users(&self, query: Option<&str>) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().await;
        let needle = query.map(|q| q.to_lowercase());
        Ok(users
            .iter()
            .filter(|u| match &needle {
                Some(q) => {
                    u.name.to_lowercase().contains(q) || u.email.to_lowercase().contains(q)
                }
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, record: UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == record.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UserRole;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn record(name: &str, email: &str) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: "hash".into(),
            role: UserRole::Normal,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::new();
        store.insert_user(record("Ana", "ana@x.com")).await.unwrap();
        let err = store
            .insert_user(record("Other", "ana@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn filters_by_substring_over_name_and_email() {
        let store = MemoryStore::new();
        store.insert_user(record("Ana", "ana@x.com")).await.unwrap();
        store.insert_user(record("Bob", "bob@y.com")).await.unwrap();

        let hits = store.find_users(Some("AN")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ana");

        let hits = store.find_users(Some("y.com")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Bob");

        let all = store.find_users(None).await.unwrap();
        assert_eq!(all.len(), 2);
        // insertion order preserved
        assert_eq!(all[0].name, "Ana");
        assert_eq!(all[1].name, "Bob");
    }
}

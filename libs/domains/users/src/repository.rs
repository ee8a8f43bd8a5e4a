use async_trait::async_trait;
use axum_helpers::Role;
use chrono::NaiveDate;
use database::{DailyCount, PageRequest, PageResult, stats::daily_counts};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for identity persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new identity. Fails with `UsernameTaken` on a duplicate.
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Exact (case-sensitive) username lookup
    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>>;

    /// Returns `false` when no identity has this id.
    async fn update_username(&self, id: Uuid, username: &str) -> UserResult<bool>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> UserResult<bool>;

    /// Role `user` only, newest first, search on username.
    async fn list_users(&self, page: PageRequest) -> UserResult<PageResult<User>>;

    async fn recent_users(&self, limit: u64) -> UserResult<Vec<User>>;

    /// Deletes a role `user` identity. Administrators are never matched.
    async fn delete_user(&self, id: Uuid) -> UserResult<bool>;

    /// Registrations per day over the growth window ending `today`.
    async fn daily_registrations(&self, today: NaiveDate) -> UserResult<Vec<DailyCount>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut users: Vec<User>, page: &PageRequest) -> Vec<User> {
        users.sort_by(|a, b| {
            page.sort_order
                .apply(a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        });
        users
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameTaken);
        }

        users.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn update_username(&self, id: Uuid, username: &str) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == username && u.id != id) {
            return Err(UserError::UsernameTaken);
        }

        Ok(users
            .get_mut(&id)
            .map(|user| user.username = username.to_string())
            .is_some())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&id)
            .map(|user| user.password_hash = password_hash.to_string())
            .is_some())
    }

    async fn list_users(&self, page: PageRequest) -> UserResult<PageResult<User>> {
        let users = self.users.read().await;
        let matching: Vec<User> = users
            .values()
            .filter(|u| u.role == Role::User)
            .filter(|u| page.matches_search(&[&u.username]))
            .cloned()
            .collect();

        Ok(PageResult::from_sorted(
            Self::newest_first(matching, &page),
            &page,
        ))
    }

    async fn recent_users(&self, limit: u64) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let mut matching: Vec<User> = users
            .values()
            .filter(|u| u.role == Role::User)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn delete_user(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.get(&id).is_some_and(|u| u.role == Role::User) {
            users.remove(&id);
            tracing::info!(user_id = %id, "Deleted user");
            return Ok(true);
        }
        Ok(false)
    }

    async fn daily_registrations(&self, today: NaiveDate) -> UserResult<Vec<DailyCount>> {
        let users = self.users.read().await;
        Ok(daily_counts(
            users
                .values()
                .filter(|u| u.role == Role::User)
                .map(|u| u.created_at),
            today,
        ))
    }
}

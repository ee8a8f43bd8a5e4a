use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::Role;
use chrono::Utc;
use database::{DailyCount, PageRequest, PageResult};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{ProfileResponse, RecentUser, User, UserSummary};
use crate::repository::UserRepository;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 100;
pub const RECENT_USERS_LIMIT: u64 = 5;

static USERNAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("static username pattern"));

/// 3-20 characters of ASCII letters, digits, `.`, `_` and `-`.
pub fn validate_username(username: &str) -> UserResult<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(UserError::Validation(format!(
            "Username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
        )));
    }
    if !USERNAME_CHARS.is_match(username) {
        return Err(UserError::Validation(
            "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }
    Ok(())
}

/// 6-100 characters with at least one uppercase letter and one digit.
pub fn validate_password(password: &str) -> UserResult<()> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(UserError::Validation(format!(
            "Password must be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters"
        )));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(UserError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(UserError::Validation(
            "Password must contain at least one number".to_string(),
        ));
    }
    Ok(())
}

/// Service layer for identity business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Self-registration always yields role `user`.
    pub async fn register(&self, username: &str, password: &str) -> UserResult<User> {
        validate_username(username)?;
        validate_password(password)?;

        let password_hash = self.hash_password(password)?;
        self.repository
            .create(User::new(username, password_hash, Role::User))
            .await
    }

    /// Creates the administrator unless an identity with that username
    /// exists. Returns `true` when one was created.
    pub async fn seed_admin(&self, username: &str, password: &str) -> UserResult<bool> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(UserError::Validation(
                "Admin username and password must not be empty".to_string(),
            ));
        }
        if self.repository.get_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let password_hash = self.hash_password(password)?;
        match self
            .repository
            .create(User::new(username, password_hash, Role::Admin))
            .await
        {
            Ok(_) => Ok(true),
            // another instance won the race
            Err(UserError::UsernameTaken) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Single lookup by username; 404 for unknown, 401 for a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> UserResult<User> {
        let user = self
            .repository
            .get_by_username(username)
            .await?
            .ok_or(UserError::NotFound)?;

        if !self.verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Wrong password at login");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }

    pub async fn profile(&self, id: Uuid) -> UserResult<ProfileResponse> {
        Ok(self.get_user(id).await?.into())
    }

    /// Returns the stored (trimmed) username.
    pub async fn update_username(&self, id: Uuid, username: &str) -> UserResult<String> {
        let username = username.trim();
        if username.is_empty() {
            return Err(UserError::Validation("Username is required".to_string()));
        }
        validate_username(username)?;

        if !self.repository.update_username(id, username).await? {
            return Err(UserError::NotFound);
        }
        Ok(username.to_string())
    }

    pub async fn change_password(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> UserResult<()> {
        let user = self.get_user(id).await?;

        if !self.verify_password(current_password, &user.password_hash)? {
            return Err(UserError::WrongPassword);
        }
        validate_password(new_password)?;

        let password_hash = self.hash_password(new_password)?;
        if !self.repository.update_password(id, &password_hash).await? {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    pub async fn list_users(&self, page: PageRequest) -> UserResult<PageResult<UserSummary>> {
        Ok(self.repository.list_users(page).await?.map(UserSummary::from))
    }

    pub async fn recent_users(&self) -> UserResult<Vec<RecentUser>> {
        let users = self.repository.recent_users(RECENT_USERS_LIMIT).await?;
        Ok(users.into_iter().map(RecentUser::from).collect())
    }

    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if self.repository.delete_user(id).await? {
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }

    pub async fn growth(&self) -> UserResult<Vec<DailyCount>> {
        self.repository
            .daily_registrations(Utc::now().date_naive())
            .await
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

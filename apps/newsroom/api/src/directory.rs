//! Username lookups for reviews, answered by the users domain.

use async_trait::async_trait;
use domain_reviews::{ReviewError, ReviewResult, SubmitterDirectory};
use domain_users::{UserError, UserRepository, UserService};
use uuid::Uuid;

pub struct UserDirectory<R: UserRepository>(UserService<R>);

impl<R: UserRepository> UserDirectory<R> {
    pub fn new(users: UserService<R>) -> Self {
        Self(users)
    }
}

#[async_trait]
impl<R: UserRepository> SubmitterDirectory for UserDirectory<R> {
    async fn username(&self, user_id: Uuid) -> ReviewResult<Option<String>> {
        match self.0.get_user(user_id).await {
            Ok(user) => Ok(Some(user.username)),
            Err(UserError::NotFound) => Ok(None),
            Err(UserError::Database(e)) => Err(ReviewError::Database(e)),
            Err(e) => Err(ReviewError::Directory(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_users::InMemoryUserRepository;

    #[tokio::test]
    async fn test_lookup_current_and_missing() {
        let users = UserService::new(InMemoryUserRepository::new());
        let alice = users.register("alice1", "Passw0rd").await.unwrap();
        let directory = UserDirectory::new(users.clone());

        assert_eq!(
            directory.username(alice.id).await.unwrap().as_deref(),
            Some("alice1")
        );

        users.update_username(alice.id, "alice2").await.unwrap();
        assert_eq!(
            directory.username(alice.id).await.unwrap().as_deref(),
            Some("alice2")
        );

        assert_eq!(directory.username(Uuid::now_v7()).await.unwrap(), None);
    }
}

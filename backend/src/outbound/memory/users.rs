//! In-memory `UserRepository`.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, UserAccount, UserId};

use super::POISONED;

/// Accounts held in registration order.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<Vec<UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&[UserAccount]) -> T) -> Result<T, UserPersistenceError> {
        let guard = self
            .accounts
            .read()
            .map_err(|_| UserPersistenceError::query(POISONED))?;
        Ok(f(&guard))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut guard = self
            .accounts
            .write()
            .map_err(|_| UserPersistenceError::query(POISONED))?;
        if guard
            .iter()
            .any(|existing| existing.user.username() == account.user.username())
        {
            return Err(UserPersistenceError::duplicate("username"));
        }
        if guard
            .iter()
            .any(|existing| existing.user.email() == account.user.email())
        {
            return Err(UserPersistenceError::duplicate("email"));
        }
        guard.push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        self.read(|accounts| accounts.iter().find(|a| a.user.id() == id).cloned())
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let lowered = identifier.to_lowercase();
        self.read(|accounts| {
            accounts
                .iter()
                .find(|a| a.user.username().as_ref() == identifier)
                .or_else(|| accounts.iter().find(|a| a.user.email().as_ref() == lowered))
                .cloned()
        })
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        self.read(|accounts| accounts.iter().find(|a| a.user.email() == email).cloned())
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError> {
        let mut guard = self
            .accounts
            .write()
            .map_err(|_| UserPersistenceError::query(POISONED))?;
        match guard.iter_mut().find(|a| a.user.id() == id) {
            Some(account) => {
                account.password_hash = hash.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, Username};
    use rstest::{fixture, rstest};

    fn account(username: &str, email: &str) -> UserAccount {
        UserAccount {
            user: User::new(
                UserId::random(),
                Username::new(username).expect("username"),
                EmailAddress::new(email).expect("email"),
            ),
            password_hash: PasswordHash::new("digest"),
        }
    }

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_duplicate_username_and_email(repo: InMemoryUserRepository) {
        repo.insert(&account("ada", "ada@example.com"))
            .await
            .expect("first insert");

        let by_name = repo.insert(&account("ada", "other@example.com")).await;
        let by_email = repo.insert(&account("other", "ADA@example.com")).await;

        assert_eq!(by_name, Err(UserPersistenceError::duplicate("username")));
        assert_eq!(by_email, Err(UserPersistenceError::duplicate("email")));
    }

    #[rstest]
    #[case("ada")]
    #[case("ada@example.com")]
    #[case("Ada@Example.com")]
    #[tokio::test]
    async fn finds_by_username_or_email(repo: InMemoryUserRepository, #[case] identifier: &str) {
        let stored = account("ada", "ada@example.com");
        repo.insert(&stored).await.expect("insert");

        let found = repo
            .find_by_identifier(identifier)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(found.user.id(), stored.user.id());
    }

    #[rstest]
    #[tokio::test]
    async fn updates_password_hash(repo: InMemoryUserRepository) {
        let stored = account("ada", "ada@example.com");
        repo.insert(&stored).await.expect("insert");

        let updated = repo
            .update_password_hash(stored.user.id(), &PasswordHash::new("new"))
            .await
            .expect("update");
        let missing = repo
            .update_password_hash(&UserId::random(), &PasswordHash::new("new"))
            .await
            .expect("update");

        assert!(updated);
        assert!(!missing);
        let reloaded = repo
            .find_by_id(stored.user.id())
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(reloaded.password_hash.as_str(), "new");
    }
}

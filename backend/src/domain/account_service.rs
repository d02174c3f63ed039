//! Account domain service.
//!
//! Implements [`AccountCommand`] on top of the user and reset repositories,
//! the password hasher, the token issuer, and the reset notifier.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, PasswordHashError, PasswordHasher, PasswordResetPersistenceError,
    PasswordResetRecord, PasswordResetRepository, ResetNotifier, TokenError, TokenIssuer,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, PasswordChange, PasswordResetCompletion,
    Registration, ResetCode, User, UserAccount, UserId,
};

/// Default lifetime of a password reset code, in minutes.
pub const DEFAULT_RESET_CODE_TTL_MINUTES: i64 = 60;

/// Collaborators required by [`AccountService`].
#[derive(Clone)]
pub struct AccountServicePorts {
    pub users: Arc<dyn UserRepository>,
    pub resets: Arc<dyn PasswordResetRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub notifier: Arc<dyn ResetNotifier>,
    pub clock: Arc<dyn Clock>,
}

/// Account service implementing the authentication driving port.
#[derive(Clone)]
pub struct AccountService {
    ports: AccountServicePorts,
    reset_code_ttl: Duration,
}

impl AccountService {
    /// Create a service using [`DEFAULT_RESET_CODE_TTL_MINUTES`].
    pub fn new(ports: AccountServicePorts) -> Self {
        Self {
            ports,
            reset_code_ttl: Duration::minutes(DEFAULT_RESET_CODE_TTL_MINUTES),
        }
    }

    /// Override how long reset codes remain valid.
    #[must_use]
    pub fn with_reset_code_ttl(mut self, ttl: Duration) -> Self {
        self.reset_code_ttl = ttl;
        self
    }

    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::Duplicate { field } => {
                Error::invalid_request("Email or Username are already taken").with_details(json!({
                    "code": "identity_taken",
                    "field": field,
                }))
            }
        }
    }

    fn map_reset_error(error: PasswordResetPersistenceError) -> Error {
        match error {
            PasswordResetPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("password reset repository unavailable: {message}"))
            }
            PasswordResetPersistenceError::Query { message } => {
                Error::internal(format!("password reset repository error: {message}"))
            }
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(error.to_string())
    }

    fn map_token_error(error: TokenError) -> Error {
        match error {
            TokenError::Expired => Error::unauthorized("login required").with_details(json!({
                "code": "token_expired",
            })),
            TokenError::Invalid { .. } => Error::unauthorized("login required").with_details(json!({
                "code": "invalid_token",
            })),
            TokenError::Signing { message } => Error::internal(format!("token signing failed: {message}")),
        }
    }

    fn invalid_credentials() -> Error {
        Error::unauthorized("Invalid identifier or password").with_details(json!({
            "code": "invalid_credentials",
        }))
    }

    fn invalid_reset_code() -> Error {
        Error::invalid_request("Incorrect or expired reset code").with_details(json!({
            "field": "code",
            "code": "invalid_or_expired_code",
        }))
    }

    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let jwt = self
            .ports
            .tokens
            .issue(user.id())
            .map_err(Self::map_token_error)?;
        Ok(AuthSession { jwt, user })
    }

    async fn require_account(&self, id: &UserId) -> Result<UserAccount, Error> {
        self.ports
            .users
            .find_by_id(id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    async fn store_password(&self, id: &UserId, password: &str) -> Result<(), Error> {
        let hash = self
            .ports
            .hasher
            .hash(password)
            .await
            .map_err(Self::map_hash_error)?;
        let updated = self
            .ports
            .users
            .update_password_hash(id, &hash)
            .await
            .map_err(Self::map_user_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::unauthorized("login required"))
        }
    }
}

#[async_trait]
impl AccountCommand for AccountService {
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let Registration {
            username,
            email,
            password,
        } = registration;
        let password_hash = self
            .ports
            .hasher
            .hash(password.expose())
            .await
            .map_err(Self::map_hash_error)?;
        let user = User::new(UserId::random(), username, email);
        let account = UserAccount {
            user: user.clone(),
            password_hash,
        };
        self.ports
            .users
            .insert(&account)
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %user.id(), "account registered");
        self.session_for(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let Some(account) = self
            .ports
            .users
            .find_by_identifier(credentials.identifier())
            .await
            .map_err(Self::map_user_error)?
        else {
            return Err(Self::invalid_credentials());
        };
        let valid = self
            .ports
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(Self::map_hash_error)?;
        if !valid {
            warn!(user_id = %account.user.id(), "rejected sign-in with wrong password");
            return Err(Self::invalid_credentials());
        }
        self.session_for(account.user)
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), Error> {
        let Some(account) = self
            .ports
            .users
            .find_by_email(email)
            .await
            .map_err(Self::map_user_error)?
        else {
            info!("password reset requested for unknown email");
            return Ok(());
        };

        let code = ResetCode::generate();
        let record = PasswordResetRecord {
            digest: code.digest(),
            user_id: *account.user.id(),
            expires_at: self.ports.clock.utc() + self.reset_code_ttl,
        };
        self.ports
            .resets
            .store(&record)
            .await
            .map_err(Self::map_reset_error)?;

        if let Err(err) = self.ports.notifier.notify(&account.user, &code).await {
            warn!(user_id = %account.user.id(), error = %err, "reset code delivery failed");
        }
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        completion: PasswordResetCompletion,
    ) -> Result<AuthSession, Error> {
        let PasswordResetCompletion { code, password } = completion;
        let Some(record) = self
            .ports
            .resets
            .take(&code.digest())
            .await
            .map_err(Self::map_reset_error)?
        else {
            return Err(Self::invalid_reset_code());
        };
        if record.expires_at <= self.ports.clock.utc() {
            return Err(Self::invalid_reset_code());
        }
        let Some(account) = self
            .ports
            .users
            .find_by_id(&record.user_id)
            .await
            .map_err(Self::map_user_error)?
        else {
            return Err(Self::invalid_reset_code());
        };

        self.store_password(account.user.id(), password.expose()).await?;
        info!(user_id = %account.user.id(), "password reset completed");
        self.session_for(account.user)
    }

    async fn change_password(&self, user: &UserId, change: PasswordChange) -> Result<AuthSession, Error> {
        let account = self.require_account(user).await?;
        let valid = self
            .ports
            .hasher
            .verify(change.current(), &account.password_hash)
            .await
            .map_err(Self::map_hash_error)?;
        if !valid {
            return Err(
                Error::invalid_request("The provided current password is invalid").with_details(json!({
                    "field": "currentPassword",
                    "code": "invalid_current_password",
                })),
            );
        }

        self.store_password(user, change.replacement.expose()).await?;
        info!(user_id = %user, "password changed");
        self.session_for(account.user)
    }

    async fn current_user(&self, user: &UserId) -> Result<User, Error> {
        self.require_account(user).await.map(|account| account.user)
    }

    async fn resolve_token(&self, token: &str) -> Result<UserId, Error> {
        self.ports
            .tokens
            .verify(token)
            .map_err(Self::map_token_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;

//! Driving port for account and authentication use-cases.
//!
//! Inbound adapters call this port to register, sign in, and manage
//! passwords without importing persistence or cryptography adapters.

use async_trait::async_trait;

use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, PasswordChange, PasswordResetCompletion,
    Registration, User, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and sign it in.
    ///
    /// # Errors
    /// `invalid_request` with details code `identity_taken` when the username
    /// or email already exists.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Sign in with a username or email and a password.
    ///
    /// # Errors
    /// `unauthorized` when the identifier is unknown or the password is wrong.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Start a password reset for `email`.
    ///
    /// Succeeds whether or not the address is registered.
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), Error>;

    /// Redeem a reset code and set a new password.
    ///
    /// # Errors
    /// `invalid_request` with details code `invalid_or_expired_code`.
    async fn complete_password_reset(
        &self,
        completion: PasswordResetCompletion,
    ) -> Result<AuthSession, Error>;

    /// Change the password of a signed-in user.
    ///
    /// # Errors
    /// `invalid_request` with details code `invalid_current_password`.
    async fn change_password(&self, user: &UserId, change: PasswordChange) -> Result<AuthSession, Error>;

    /// Profile of the signed-in user.
    async fn current_user(&self, user: &UserId) -> Result<User, Error>;

    /// Resolve a presented bearer token to a user.
    ///
    /// # Errors
    /// `unauthorized` for missing, malformed, tampered, or expired tokens.
    async fn resolve_token(&self, token: &str) -> Result<UserId, Error>;
}

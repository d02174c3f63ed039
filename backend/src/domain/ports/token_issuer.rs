//! Port for issuing and checking bearer tokens.

use crate::domain::{AccessToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// The token is well formed but past its expiry.
        Expired => "token has expired",
        /// The token is malformed, tampered with, or names no valid user.
        Invalid { message: String } => "token is invalid: {message}",
        /// A token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token identifying `user`.
    fn issue(&self, user: &UserId) -> Result<AccessToken, TokenError>;

    /// Check a presented token and return the user it identifies.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}

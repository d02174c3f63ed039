//! Credential adapters: password hashing, bearer tokens, and reset delivery.

mod bcrypt_hasher;
mod jwt_token_issuer;
mod logging_reset_notifier;

pub use bcrypt_hasher::{BcryptPasswordHasher, DEFAULT_BCRYPT_COST};
pub use jwt_token_issuer::{DEFAULT_TOKEN_TTL_HOURS, JwtTokenIssuer};
pub use logging_reset_notifier::LoggingResetNotifier;

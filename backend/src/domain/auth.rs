//! Authentication primitives: credentials, password changes, and reset codes.
//!
//! Inbound adapters call the `try_from_parts` constructors so that handlers
//! only ever pass validated values to the account service.

use std::fmt;

use rand::distributions::{Alphanumeric, DistString};
use serde::Serialize;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::user::{EmailAddress, User, UserValidationError, Username};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length, in bytes; bcrypt ignores anything longer.
pub const PASSWORD_MAX_BYTES: usize = 72;
/// Length of generated password reset codes.
pub const RESET_CODE_LENGTH: usize = 32;

/// Domain error returned when authentication payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("password must be at most {max} bytes")]
    PasswordTooLong { max: usize },
    #[error("password confirmation does not match")]
    PasswordMismatch,
    #[error("reset code must not be empty")]
    EmptyResetCode,
    #[error(transparent)]
    User(#[from] UserValidationError),
}

impl CredentialsValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier => "identifier",
            Self::EmptyPassword | Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => {
                "password"
            }
            Self::PasswordMismatch => "passwordConfirmation",
            Self::EmptyResetCode => "code",
            Self::User(inner) => inner.field(),
        }
    }

    /// Stable machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier | Self::EmptyPassword | Self::EmptyResetCode => "empty",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::PasswordTooLong { .. } => "password_too_long",
            Self::PasswordMismatch => "password_mismatch",
            Self::User(inner) => inner.code(),
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `identifier` is trimmed and non-empty; it is matched against usernames
///   and (case-insensitively) against emails.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use workbench_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "secret").unwrap();
/// assert_eq!(creds.identifier(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    pub fn try_from_parts(identifier: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalized = identifier.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyIdentifier);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            identifier: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username or email supplied by the caller.
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A password that satisfies the length policy.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate a password against the length policy.
    pub fn new(raw: &str) -> Result<Self, CredentialsValidationError> {
        if raw.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if raw.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if raw.len() > PASSWORD_MAX_BYTES {
            return Err(CredentialsValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Validate a password and require `confirmation` to match it exactly.
    pub fn confirmed(raw: &str, confirmation: &str) -> Result<Self, CredentialsValidationError> {
        let password = Self::new(raw)?;
        if raw != confirmation {
            return Err(CredentialsValidationError::PasswordMismatch);
        }
        Ok(password)
    }

    /// Plain text for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: Username,
    pub email: EmailAddress,
    pub password: NewPassword,
}

impl Registration {
    /// Validate the raw sign-up fields.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password: NewPassword::new(password)?,
        })
    }
}

/// Validated request to change the password of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    pub replacement: NewPassword,
}

impl PasswordChange {
    /// Validate the current password, the new one, and its confirmation.
    pub fn try_from_parts(
        current: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Self, CredentialsValidationError> {
        if current.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            replacement: NewPassword::confirmed(password, confirmation)?,
        })
    }

    /// Current password as typed by the caller.
    pub fn current(&self) -> &str {
        self.current.as_str()
    }
}

/// One-time code mailed to a user who forgot their password.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetCode(Zeroizing<String>);

impl ResetCode {
    /// Generate a fresh random alphanumeric code.
    pub fn generate() -> Self {
        let code = Alphanumeric.sample_string(&mut rand::thread_rng(), RESET_CODE_LENGTH);
        Self(Zeroizing::new(code))
    }

    /// Validate a code supplied by a caller.
    pub fn new(raw: &str) -> Result<Self, CredentialsValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CredentialsValidationError::EmptyResetCode);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Plain code for delivery to the user.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// SHA-256 digest stored in place of the code.
    pub fn digest(&self) -> ResetCodeDigest {
        ResetCodeDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for ResetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetCode(<redacted>)")
    }
}

/// Lowercase hex SHA-256 digest of a [`ResetCode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResetCodeDigest(String);

impl ResetCodeDigest {
    /// Wrap a digest read back from storage.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Hex text of the digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated request to finish a password reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetCompletion {
    pub code: ResetCode,
    pub password: NewPassword,
}

impl PasswordResetCompletion {
    /// Validate the code, the new password, and its confirmation.
    pub fn try_from_parts(
        code: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            code: ResetCode::new(code)?,
            password: NewPassword::confirmed(password, confirmation)?,
        })
    }
}

/// Signed bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Result of a successful sign-in: the token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthSession {
    #[schema(value_type = String, example = "eyJhbGciOiJIUzI1NiJ9...")]
    pub jwt: AccessToken,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyIdentifier)]
    #[case("   ", "pw", CredentialsValidationError::EmptyIdentifier)]
    #[case("user", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_login(
        #[case] identifier: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(identifier, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_keeps_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("ada", " pass ").expect("valid");
        assert_eq!(creds.password(), " pass ");
    }

    #[rstest]
    #[case("12345", CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case("", CredentialsValidationError::EmptyPassword)]
    fn new_password_enforces_length(#[case] raw: &str, #[case] expected: CredentialsValidationError) {
        assert_eq!(NewPassword::new(raw), Err(expected));
    }

    #[rstest]
    fn new_password_rejects_overlong_input() {
        let raw = "x".repeat(PASSWORD_MAX_BYTES + 1);
        assert!(matches!(
            NewPassword::new(&raw),
            Err(CredentialsValidationError::PasswordTooLong { .. })
        ));
    }

    #[rstest]
    fn confirmation_must_match() {
        let err = NewPassword::confirmed("secret1", "secret2").expect_err("mismatch");
        assert_eq!(err, CredentialsValidationError::PasswordMismatch);
        assert_eq!(err.code(), "password_mismatch");
        assert_eq!(err.field(), "passwordConfirmation");
    }

    #[rstest]
    fn registration_reports_email_field() {
        let err = Registration::try_from_parts("ada", "nope", "secret1").expect_err("bad email");
        assert_eq!(err.field(), "email");
        assert_eq!(err.code(), "invalid_email");
    }

    #[rstest]
    fn password_change_requires_current() {
        let err = PasswordChange::try_from_parts("", "secret1", "secret1").expect_err("empty");
        assert_eq!(err, CredentialsValidationError::EmptyPassword);
    }

    #[rstest]
    fn generated_codes_are_alphanumeric_and_distinct() {
        let first = ResetCode::generate();
        let second = ResetCode::generate();
        assert_eq!(first.expose().len(), RESET_CODE_LENGTH);
        assert!(first.expose().chars().all(|ch| ch.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }

    #[rstest]
    fn digest_is_stable_hex() {
        let code = ResetCode::new("abc").expect("code");
        assert_eq!(
            code.digest().as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[rstest]
    fn secrets_are_redacted_in_debug() {
        let code = ResetCode::new("topsecret").expect("code");
        let token = AccessToken::new("topsecret");
        assert!(!format!("{code:?}{token:?}").contains("topsecret"));
    }
}

//! Bearer token signing key loading.
//!
//! The key is read from `TOKEN_KEY_FILE` (default
//! `/var/run/secrets/token_key`). Debug builds, or deployments setting
//! `TOKEN_ALLOW_EPHEMERAL=1`, fall back to a random per-process key; tokens
//! signed with it do not survive a restart.

use std::fmt;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroizing;

const TOKEN_KEY_DEFAULT_PATH: &str = "/var/run/secrets/token_key";
/// Minimum key length accepted by release builds.
pub const TOKEN_KEY_MIN_LEN: usize = 32;
const EPHEMERAL_KEY_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;
const KEY_FILE_ENV: &str = "TOKEN_KEY_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode used to pick strict or lenient validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// HS256 signing material; zeroized on drop.
pub struct TokenSigningKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl TokenSigningKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    /// Fresh random key for development use.
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Raw key bytes for the token issuer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// First eight bytes of the key's SHA-256 digest, hex encoded.
    ///
    /// Logged at startup so operators can tell which key is active.
    ///
    /// ```rust
    /// use workbench_backend::inbound::http::token_key::TokenSigningKey;
    ///
    /// let key = TokenSigningKey::from_bytes(vec![b'a'; 32]);
    /// let fp = key.fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.as_bytes());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl fmt::Debug for TokenSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigningKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Errors raised while loading the signing key.
#[derive(thiserror::Error, Debug)]
pub enum TokenKeyError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read token key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the token signing key from the environment.
///
/// Release builds reject keys shorter than [`TOKEN_KEY_MIN_LEN`] and only
/// fall back to a random key when `TOKEN_ALLOW_EPHEMERAL` is set.
pub fn token_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSigningKey, TokenKeyError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| TOKEN_KEY_DEFAULT_PATH.to_owned()),
    );

    let key = match std::fs::read(&path) {
        Ok(raw) => {
            let mut raw = Zeroizing::new(raw);
            let trimmed_len = raw.trim_ascii_end().len();
            raw.truncate(trimmed_len);
            if mode == BuildMode::Release && raw.len() < TOKEN_KEY_MIN_LEN {
                return Err(TokenKeyError::KeyTooShort {
                    path,
                    length: raw.len(),
                    min_len: TOKEN_KEY_MIN_LEN,
                });
            }
            TokenSigningKey::from_bytes(std::mem::take(&mut *raw))
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using ephemeral token key; tokens will not survive a restart"
            );
            TokenSigningKey::generate()
        }
        Err(error) => {
            return Err(TokenKeyError::KeyRead {
                path,
                source: error,
            });
        }
    };

    info!(fingerprint = %key.fingerprint(), "token signing key loaded");
    Ok(key)
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenKeyError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid TOKEN_ALLOW_EPHEMERAL; treating as disabled");
            Ok(false)
        }
        None => Err(TokenKeyError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

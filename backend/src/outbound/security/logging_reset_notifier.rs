//! `ResetNotifier` that records reset codes in the structured log.
//!
//! Stands in for an email gateway. The code is only written at debug level so
//! production logs at `info` never contain it.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{ResetNotifier, ResetNotifierError};
use crate::domain::{ResetCode, User};

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingResetNotifier;

#[async_trait]
impl ResetNotifier for LoggingResetNotifier {
    async fn notify(&self, user: &User, code: &ResetCode) -> Result<(), ResetNotifierError> {
        info!(user_id = %user.id(), "password reset code issued");
        debug!(user_id = %user.id(), email = %user.email(), reset_code = code.expose(), "reset code for delivery");
        Ok(())
    }
}

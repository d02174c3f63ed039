//! Port for delivering password reset codes to users.
use async_trait::async_trait;

use crate::domain::{ResetCode, User};

use super::define_port_error;

define_port_error! {
    /// Delivery failures raised by notifier adapters.
    pub enum ResetNotifierError {
        /// The message could not be delivered.
        Delivery { message: String } => "reset code delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    /// Send `code` to `user` through an out-of-band channel.
    async fn notify(&self, user: &User, code: &ResetCode) -> Result<(), ResetNotifierError>;
}

//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP adapter and the
//! persistence adapters, plus the services implementing the driving ports.
//! Invariants and serialisation contracts live in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserAccount: accounts and their credential digests.
//! - Workspace: the tenant boundary.
//! - Client, Product: workspace-scoped records via [`WorkspaceRecord`].
//! - AccountService, WorkspaceService, RecordService: driving port
//!   implementations.

pub mod account_service;
pub mod auth;
pub mod client;
pub mod error;
pub mod identifiers;
pub mod ports;
pub mod product;
pub mod record;
pub mod record_service;
pub mod slug;
pub mod trace_id;
pub mod user;
pub mod workspace;
pub mod workspace_service;

pub use self::account_service::{
    AccountService, AccountServicePorts, DEFAULT_RESET_CODE_TTL_MINUTES,
};
pub use self::auth::{
    AccessToken, AuthSession, CredentialsValidationError, LoginCredentials, NewPassword,
    PASSWORD_MIN, PasswordChange, PasswordResetCompletion, Registration, ResetCode,
    ResetCodeDigest,
};
pub use self::client::{
    Client, ClientDraft, ClientInput, ClientKind, ClientPatch, ClientPatchInput,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identifiers::{IdentifierError, RecordId, UserId, WorkspaceId};
pub use self::product::{Product, ProductDraft, ProductInput, ProductPatch, ProductPatchInput};
pub use self::record::{FieldError, RecordKind, WorkspaceRecord};
pub use self::record_service::RecordService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, PasswordHash, User, UserAccount, UserValidationError, Username};
pub use self::workspace::{Workspace, WorkspaceName, WorkspaceValidationError};
pub use self::workspace_service::WorkspaceService;

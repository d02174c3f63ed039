//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: lock-guarded in-process stores, used without a database and
//!   in tests
//! - **persistence**: PostgreSQL repositories on Diesel
//! - **security**: bcrypt hashing, HS256 tokens and reset-code delivery
//!
//! Adapters only translate between domain types and infrastructure types.

pub mod memory;
pub mod persistence;
pub mod security;

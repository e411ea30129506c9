//! Authentication core: credential validation, session persistence, and the
//! gate that decides whether the client is currently authenticated.
//!
//! This module provides:
//! - `validate`: pure per-field credential shape checks
//! - `SessionStore`: one namespaced session record on disk
//! - `SessionGate`: sign-in/sign-out and the "is authenticated" query
//! - `SessionToken`: bearer token with its expiry embedded as a JWT claim
//!
//! Expiry is detected lazily on query; nothing here runs timers.

pub mod error;
pub mod gate;
pub mod store;
pub mod token;
pub mod validate;

pub use error::AuthError;
pub use gate::SessionGate;
pub use store::{Identity, SessionRecord, SessionStore, StoreError};
pub use token::SessionToken;

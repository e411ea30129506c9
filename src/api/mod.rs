//! Authentication backend client module.
//!
//! Provides `AuthClient`, the sole consumer of the backend's login
//! endpoint. The gate's `sign_in` takes the token and identity this client
//! returns; nothing else talks to the network.

pub mod client;
pub mod error;

pub use client::{AuthClient, LoginResponse};
pub use error::ApiError;

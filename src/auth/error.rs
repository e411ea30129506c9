use thiserror::Error;

use super::store::StoreError;

/// Sign-in failure kinds.
///
/// A malformed token and an unavailable store are distinct failures: the
/// first means the caller handed us a credential that can never be valid,
/// the second means a well-formed session could not be persisted.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Session storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Malformed bearer token")]
    MalformedToken,
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => AuthError::StorageUnavailable(msg),
        }
    }
}

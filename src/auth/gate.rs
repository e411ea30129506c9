use tracing::{debug, warn};

use super::error::AuthError;
use super::store::{Identity, SessionRecord, SessionStore};
use super::token::SessionToken;

/// Decides current authentication status from the persisted session record.
///
/// The gate reads the store; it never owns the record. Queries are strictly
/// read-only: detecting a stale record does not delete it, callers run
/// `purge_expired` after observing a false answer. Expiry is lazy, detected
/// on the next query rather than proactively timed.
pub struct SessionGate {
    store: SessionStore,
}

impl SessionGate {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// True iff a record is present and its token's embedded expiry is in
    /// the future. Absent record, expired token, undecodable token, and an
    /// unreadable store all answer false.
    pub fn is_authenticated(&self) -> bool {
        match self.store.read() {
            Ok(Some(record)) => !record.token.is_expired(),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "session store unreadable, treating as unauthenticated");
                false
            }
        }
    }

    /// The current valid session, if any. Expired records read as `None`.
    pub fn current(&self) -> Option<SessionRecord> {
        self.store
            .read()
            .ok()
            .flatten()
            .filter(|record| !record.token.is_expired())
    }

    /// Remove a stale record, if one is present. Separated from the
    /// read-only queries so they stay side-effect-free.
    pub fn purge_expired(&self) {
        if let Ok(Some(record)) = self.store.read() {
            if record.token.is_expired() {
                debug!("purging expired session record");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "failed to purge expired session");
                }
            }
        }
    }

    /// Persist a new session. On any failure nothing is partially
    /// persisted: the token is checked before the store is touched, and the
    /// store write is all-or-nothing.
    pub fn sign_in(&self, token: SessionToken, identity: Identity) -> Result<(), AuthError> {
        if !token.is_well_formed() {
            return Err(AuthError::MalformedToken);
        }
        self.store.write(&SessionRecord { token, identity })?;
        Ok(())
    }

    /// Clear the session unconditionally. Never fails from the caller's
    /// view: signing out while already signed out is a no-op. A storage
    /// error is logged and the record stays behind until the next
    /// successful clear, or until the next sign-in overwrites it.
    pub fn sign_out(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear session on sign-out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::demo_token;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn gate() -> (SessionGate, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let gate = SessionGate::new(SessionStore::new(dir.path().to_path_buf()));
        (gate, dir)
    }

    fn identity() -> Identity {
        Identity {
            name: "Dia Azzawi".to_string(),
            uid: 123456,
        }
    }

    #[test]
    fn unauthenticated_when_nothing_stored() {
        let (gate, _dir) = gate();
        assert!(!gate.is_authenticated());
        assert!(gate.current().is_none());
    }

    #[test]
    fn sign_in_with_future_expiry_authenticates() {
        let (gate, _dir) = gate();
        let token = demo_token(Utc::now() + Duration::minutes(30));
        gate.sign_in(token, identity()).unwrap();

        assert!(gate.is_authenticated());
        assert_eq!(gate.current().unwrap().identity.uid, 123456);
    }

    #[test]
    fn sign_in_with_expired_token_does_not_authenticate() {
        let (gate, _dir) = gate();
        let token = demo_token(Utc::now() - Duration::minutes(1));
        gate.sign_in(token, identity()).unwrap();

        assert!(!gate.is_authenticated());
        assert!(gate.current().is_none());
    }

    #[test]
    fn sign_in_rejects_empty_token_without_persisting() {
        let (gate, _dir) = gate();
        let err = gate
            .sign_in(SessionToken::bearer(""), identity())
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
        assert!(gate.current().is_none());
    }

    #[test]
    fn sign_out_always_yields_unauthenticated() {
        let (gate, _dir) = gate();
        gate.sign_in(demo_token(Utc::now() + Duration::minutes(30)), identity())
            .unwrap();
        gate.sign_out();
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn sign_out_twice_is_harmless() {
        let (gate, _dir) = gate();
        gate.sign_out();
        gate.sign_out();
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn queries_do_not_delete_stale_records_but_purge_does() {
        let (gate, dir) = gate();
        gate.sign_in(demo_token(Utc::now() - Duration::minutes(1)), identity())
            .unwrap();

        // Read-only queries leave the stale file in place.
        assert!(!gate.is_authenticated());
        assert!(dir.path().join("_auth.json").exists());

        gate.purge_expired();
        assert!(!dir.path().join("_auth.json").exists());
    }

    #[test]
    fn purge_leaves_valid_sessions_alone() {
        let (gate, _dir) = gate();
        gate.sign_in(demo_token(Utc::now() + Duration::minutes(30)), identity())
            .unwrap();
        gate.purge_expired();
        assert!(gate.is_authenticated());
    }

    #[test]
    fn re_sign_in_replaces_the_prior_session() {
        let (gate, _dir) = gate();
        gate.sign_in(demo_token(Utc::now() + Duration::minutes(30)), identity())
            .unwrap();

        let other = Identity {
            name: "Someone Else".to_string(),
            uid: 7,
        };
        gate.sign_in(demo_token(Utc::now() + Duration::minutes(30)), other)
            .unwrap();

        assert_eq!(gate.current().unwrap().identity.uid, 7);
    }
}

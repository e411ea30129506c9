use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Token scheme used for all sessions issued by this app.
pub const BEARER_SCHEME: &str = "Bearer";

/// A bearer credential with its expiry embedded in the token value itself.
///
/// The value is expected to be JWT-shaped: three dot-separated base64url
/// segments with a JSON payload carrying an `exp` claim. The store never
/// tracks expiry separately; this type is the single place that decodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub value: String,
    pub scheme: String,
}

/// Subset of the JWT payload we care about.
#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

impl SessionToken {
    pub fn bearer(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scheme: BEARER_SCHEME.to_string(),
        }
    }

    /// Structural check only: a token with an empty bearer value can never
    /// be persisted. Everything else is judged by expiry decoding.
    pub fn is_well_formed(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Decode the embedded `exp` claim, if the token carries one.
    ///
    /// Returns `None` for anything that is not a decodable JWT payload with
    /// an `exp` field. The signature segment is deliberately not verified;
    /// that is the backend's job, not this client's.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.value.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&bytes).ok()?;
        Utc.timestamp_opt(claims.exp?, 0).single()
    }

    /// A token whose expiry cannot be decoded counts as expired: sessions
    /// must prove they are current, not merely present.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expiry) => expiry <= now,
            None => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Minutes remaining until expiry (for display). Zero when expired or
    /// undecodable.
    pub fn minutes_until_expiry(&self) -> i64 {
        self.expires_at()
            .map(|expiry| (expiry - Utc::now()).num_minutes().max(0))
            .unwrap_or(0)
    }
}

/// Build an unsigned JWT-shaped bearer token expiring at the given instant.
///
/// Used by the stub backend (and tests) so the scaffold works end to end
/// without a real token issuer. A real backend supplies signed tokens; the
/// client-side expiry decoding is identical either way.
pub fn demo_token(expires_at: DateTime<Utc>) -> SessionToken {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({ "exp": expires_at.timestamp() }).to_string(),
    );
    SessionToken::bearer(format!("{}.{}.demo", header, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn future_expiry_is_not_expired() {
        let token = demo_token(Utc::now() + Duration::minutes(30));
        assert!(token.is_well_formed());
        assert!(!token.is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let token = demo_token(Utc::now() - Duration::minutes(1));
        assert!(token.is_expired());
    }

    #[test]
    fn expiry_decodes_to_the_encoded_instant() {
        let expiry = Utc.with_ymd_and_hms(2031, 6, 1, 12, 0, 0).unwrap();
        let token = demo_token(expiry);
        assert_eq!(token.expires_at(), Some(expiry));
    }

    #[test]
    fn non_jwt_value_has_no_expiry_and_counts_as_expired() {
        let token = SessionToken::bearer("not-a-jwt");
        assert!(token.expires_at().is_none());
        assert!(token.is_expired());
    }

    #[test]
    fn payload_without_exp_counts_as_expired() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"123"}"#);
        let token = SessionToken::bearer(format!("h.{}.s", payload));
        assert!(token.expires_at().is_none());
        assert!(token.is_expired());
    }

    #[test]
    fn empty_value_is_malformed() {
        assert!(!SessionToken::bearer("").is_well_formed());
        assert!(!SessionToken::bearer("   ").is_well_formed());
    }
}

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Claim set carried in a credential's payload segment.
///
/// Normally obtained from [`crate::codec::decode`]. Fields are read-only once
/// built; the `Deserialize` impl accepts the same lenient shapes the codec
/// does.
///
/// The issuer's signature is **not** verified on this side: these claims drive
/// UI decisions only and every mutation is re-checked by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    sub: Option<i64>,

    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    id_client: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,

    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    permission_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,

    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

impl Claims {
    /// Generic principal id (`sub`).
    pub fn subject_id(&self) -> Option<i64> {
        self.sub
    }

    /// Principal id when the principal is a client record (`id_client`).
    pub fn client_id(&self) -> Option<i64> {
        self.id_client
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Role indicator; see [`crate::Role::from_permission_id`].
    pub fn permission_id(&self) -> Option<i64> {
        self.permission_id
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(unix_seconds)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(unix_seconds)
    }

    /// Advisory check of the `iat`/`exp` window against `now`.
    ///
    /// Nothing in the session or guard path calls this: expiry is enforced by
    /// the backend. Absent timestamps are not an error.
    pub fn time_window(&self, now: DateTime<Utc>) -> Result<(), TokenTimeError> {
        let issued_at = self.issued_at();
        let expires_at = self.expires_at();

        if let (Some(iat), Some(exp)) = (issued_at, expires_at) {
            if exp <= iat {
                return Err(TokenTimeError::InvalidTimeWindow);
            }
        }
        if issued_at.is_some_and(|iat| now < iat) {
            return Err(TokenTimeError::NotYetValid);
        }
        if expires_at.is_some_and(|exp| now >= exp) {
            return Err(TokenTimeError::Expired);
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenTimeError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

fn unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Integer claim that issuers sometimes stringify (`"sub": "42"`).
///
/// `null` reads as absent; anything other than an integer or a decimal string
/// fails the whole decode.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(v)) => Ok(Some(v)),
        Some(IntOrString::Str(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| {
            serde::de::Error::custom(format!("expected an integer claim, found {s:?}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn claims(value: serde_json::Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn numeric_strings_are_accepted_for_id_fields() {
        let c = claims(json!({ "sub": "17", "permission_id": "1" }));
        assert_eq!(c.subject_id(), Some(17));
        assert_eq!(c.permission_id(), Some(1));
    }

    #[test]
    fn null_fields_read_as_absent() {
        let c = claims(json!({ "sub": null, "id_client": 5, "email": null }));
        assert_eq!(c.subject_id(), None);
        assert_eq!(c.client_id(), Some(5));
        assert_eq!(c.email(), None);
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let result = serde_json::from_value::<Claims>(json!({ "sub": "alice" }));
        assert!(result.is_err());

        let result = serde_json::from_value::<Claims>(json!({ "permission_id": true }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let c = claims(json!({
            "role": "whatever",
            "nested": { "a": 1 },
            "id_client": 3,
        }));
        assert_eq!(c.client_id(), Some(3));
    }

    #[test]
    fn time_window_reports_expired_tokens() {
        let now = Utc::now();
        let c = claims(json!({
            "iat": (now - Duration::hours(2)).timestamp(),
            "exp": (now - Duration::hours(1)).timestamp(),
        }));
        assert_eq!(c.time_window(now), Err(TokenTimeError::Expired));
    }

    #[test]
    fn time_window_reports_future_and_inverted_windows() {
        let now = Utc::now();
        let future = claims(json!({ "iat": (now + Duration::hours(1)).timestamp() }));
        assert_eq!(future.time_window(now), Err(TokenTimeError::NotYetValid));

        let inverted = claims(json!({ "iat": 200, "exp": 100 }));
        assert_eq!(
            inverted.time_window(now),
            Err(TokenTimeError::InvalidTimeWindow)
        );
    }

    #[test]
    fn time_window_without_timestamps_is_ok() {
        let c = claims(json!({ "sub": 1 }));
        assert_eq!(c.time_window(Utc::now()), Ok(()));
        assert!(c.issued_at().is_none());
        assert!(c.expires_at().is_none());
    }
}

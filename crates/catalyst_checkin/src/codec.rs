//! QR token codec.
//!
//! A token is standard base64 (with padding) over the UTF-8 JSON of a [`Claim`].
//! When a signing secret is configured the issued string becomes
//! `<payload>.<hex hmac-sha256(secret, payload)>`. The base64 alphabet has no
//! `.`, so the two forms never collide.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use catalyst_common::models::{Event, Registration};
use chrono::{DateTime, SecondsFormat, Utc};
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_SEPARATOR: char = '.';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Not base64, not UTF-8, or not a JSON object of the expected shape.
    #[error("{0}")]
    Format(String),

    /// Well-formed JSON missing `user_id`, `event_id` or `exp`.
    #[error("{0}")]
    Structure(String),

    #[error("{0}")]
    Signature(String),

    #[error("failed to encode claim: {0}")]
    Encode(String),
}

/// Display fields of the participant, frozen at issuance.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub roll_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profile_photo_url: Option<String>,
}

impl From<&Registration> for ParticipantSnapshot {
    fn from(registration: &Registration) -> Self {
        Self {
            name: Some(registration.participant_name.clone()),
            email: registration.email.clone(),
            roll_number: registration.roll_number.clone(),
            department: registration.department.clone(),
            year: registration.year.clone(),
            class: registration.class.clone(),
            profile_photo_url: registration.profile_photo_url.clone(),
        }
    }
}

/// Display fields of the event, frozen at issuance.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSnapshot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: Option<String>,
}

impl From<&Event> for EventSnapshot {
    fn from(event: &Event) -> Self {
        Self {
            id: Some(event.id.clone()),
            title: Some(event.title.clone()),
            description: event.description.clone(),
            location: event.location.clone(),
            start_time: Some(iso_millis(&event.start_time)),
            end_time: Some(iso_millis(&event.end_time)),
        }
    }
}

/// The attendance claim carried inside a QR token.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub user_id: String,
    pub event_id: String,
    pub registration_id: String,
    pub issued_at: Option<String>,
    /// Event end time in epoch milliseconds.
    pub exp: i64,
    pub participant: ParticipantSnapshot,
    pub event: EventSnapshot,
}

impl Claim {
    /// Whether `now` lies strictly after the embedded `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.exp
    }
}

// Everything optional so that missing keys surface as structure errors.
#[derive(Deserialize)]
struct RawClaim {
    #[serde(default, deserialize_with = "lenient_string")]
    user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    event_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    registration_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    issued_at: Option<String>,
    #[serde(default)]
    exp: Option<Value>,
    #[serde(default)]
    participant: Option<ParticipantSnapshot>,
    #[serde(default)]
    event: Option<EventSnapshot>,
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso_millis(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize a claim to its unsigned transport string.
pub fn encode(claim: &Claim) -> Result<String, CodecError> {
    let json = serde_json::to_vec(claim).map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(STANDARD.encode(json))
}

/// Parse an unsigned transport string back into a claim.
pub fn decode(token: &str) -> Result<Claim, CodecError> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|e| CodecError::Format(format!("not valid base64: {}", e)))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| CodecError::Format(format!("not valid UTF-8: {}", e)))?;
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CodecError::Format(format!("not valid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(CodecError::Format("claim is not a JSON object".to_string()));
    }
    let raw: RawClaim = serde_json::from_value(value)
        .map_err(|e| CodecError::Format(format!("not a claim object: {}", e)))?;

    let user_id = required(raw.user_id, "user_id")?;
    let event_id = required(raw.event_id, "event_id")?;
    let exp = raw
        .exp
        .as_ref()
        .and_then(epoch_millis)
        .ok_or_else(|| CodecError::Structure("missing required field 'exp'".to_string()))?;

    Ok(Claim {
        user_id,
        event_id,
        registration_id: raw.registration_id.unwrap_or_default(),
        issued_at: raw.issued_at,
        exp,
        participant: raw.participant.unwrap_or_default(),
        event: raw.event.unwrap_or_default(),
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, CodecError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CodecError::Structure(format!(
            "missing required field '{}'",
            field
        ))),
    }
}

// Zero and non-numeric values count as absent.
fn epoch_millis(value: &Value) -> Option<i64> {
    let millis = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (millis != 0).then_some(millis)
}

/// Accepts strings, numbers and booleans for display fields; `null` is `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

/// HMAC-SHA256 signer for issued tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSigner(..)")
    }
}

impl TokenSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac_hex(&self, payload: &str) -> Result<String, CodecError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| CodecError::Signature("invalid signing secret".to_string()))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Append the signature to an encoded payload.
    pub fn sign(&self, payload: &str) -> Result<String, CodecError> {
        Ok(format!(
            "{}{}{}",
            payload,
            SIGNATURE_SEPARATOR,
            self.mac_hex(payload)?
        ))
    }

    /// Check the signature of a signed token and return its payload part.
    pub fn verify<'a>(&self, token: &'a str) -> Result<&'a str, CodecError> {
        let token = token.trim();
        let (payload, provided) = token
            .rsplit_once(SIGNATURE_SEPARATOR)
            .ok_or_else(|| CodecError::Signature("token is not signed".to_string()))?;

        let expected = self.mac_hex(payload)?;
        if constant_time_eq(expected.as_bytes(), provided.to_ascii_lowercase().as_bytes()) {
            Ok(payload)
        } else {
            Err(CodecError::Signature("signature mismatch".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim() -> Claim {
        Claim {
            user_id: "u-1".into(),
            event_id: "e-1".into(),
            registration_id: "r-1".into(),
            issued_at: Some("2025-06-01T10:00:00.000Z".into()),
            exp: 1_748_800_800_000,
            participant: ParticipantSnapshot {
                name: Some("Asha".into()),
                year: Some("3".into()),
                ..Default::default()
            },
            event: EventSnapshot {
                title: Some("Hackathon".into()),
                ..Default::default()
            },
        }
    }

    fn b64(json: &str) -> String {
        STANDARD.encode(json)
    }

    #[test]
    fn test_round_trip() {
        let c = claim();
        let token = encode(&c).unwrap();
        assert_eq!(decode(&token).unwrap(), c);
    }

    #[test]
    fn test_wire_keys() {
        let token = encode(&claim()).unwrap();
        let json: Value = serde_json::from_slice(&STANDARD.decode(token).unwrap()).unwrap();
        for key in [
            "user_id",
            "event_id",
            "registration_id",
            "issued_at",
            "exp",
            "participant",
            "event",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["exp"], Value::from(1_748_800_800_000_i64));
    }

    #[test]
    fn test_format_errors() {
        assert!(matches!(decode("%%%not-base64%%%"), Err(CodecError::Format(_))));
        assert!(matches!(decode(&b64("{not json")), Err(CodecError::Format(_))));
        assert!(matches!(decode(&b64("[1, 2, 3]")), Err(CodecError::Format(_))));
        assert!(matches!(
            decode(&b64(r#"["u","e","r","2025",99999999999999]"#)),
            Err(CodecError::Format(_))
        ));
        assert!(matches!(decode(&b64("\"u-1\"")), Err(CodecError::Format(_))));
        assert!(matches!(decode(&b64("null")), Err(CodecError::Format(_))));
        assert!(matches!(
            decode(&STANDARD.encode([0xff_u8, 0xfe, 0xfd])),
            Err(CodecError::Format(_))
        ));
    }

    #[test]
    fn test_structure_errors() {
        let missing_exp = b64(r#"{"user_id":"u-1","event_id":"e-1"}"#);
        assert!(matches!(decode(&missing_exp), Err(CodecError::Structure(_))));

        let empty_user = b64(r#"{"user_id":"","event_id":"e-1","exp":5}"#);
        assert!(matches!(decode(&empty_user), Err(CodecError::Structure(_))));

        let zero_exp = b64(r#"{"user_id":"u-1","event_id":"e-1","exp":0}"#);
        assert!(matches!(decode(&zero_exp), Err(CodecError::Structure(_))));

        let word_exp = b64(r#"{"user_id":"u-1","event_id":"e-1","exp":"soon"}"#);
        assert!(matches!(decode(&word_exp), Err(CodecError::Structure(_))));
    }

    #[test]
    fn test_lenient_participant_fields() {
        let token = b64(
            r#"{"user_id":"u-1","event_id":"e-1","exp":1748800800000,
                "participant":{"name":"Ravi","year":3,"class":null}}"#,
        );
        let decoded = decode(&token).unwrap();
        assert_eq!(decoded.participant.year.as_deref(), Some("3"));
        assert_eq!(decoded.participant.class, None);
        assert_eq!(decoded.registration_id, "");
        assert_eq!(decoded.event, EventSnapshot::default());
    }

    #[test]
    fn test_expiry_is_strict() {
        let c = claim();
        let at_exp = DateTime::from_timestamp_millis(c.exp).unwrap();
        assert!(!c.is_expired_at(at_exp));
        assert!(c.is_expired_at(at_exp + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_signing() {
        let signer = TokenSigner::new("server-key");
        let payload = encode(&claim()).unwrap();
        let signed = signer.sign(&payload).unwrap();

        assert_eq!(signer.verify(&signed).unwrap(), payload);
        assert!(matches!(signer.verify(&payload), Err(CodecError::Signature(_))));

        let other = TokenSigner::new("other-key");
        assert!(matches!(other.verify(&signed), Err(CodecError::Signature(_))));

        let mut tampered = signed.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == '0' { '1' } else { '0' });
        assert!(signer.verify(&tampered).is_err());
    }
}

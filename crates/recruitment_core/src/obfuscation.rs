//! crates/recruitment_core/src/obfuscation.rs
//!
//! The check-in token carried by the candidate's QR code.
//!
//! This is an obfuscation encoding, NOT encryption: JSON, then Base64, then the
//! characters reversed, prefixed with the creation time in base 36. Anyone who
//! knows the format can read the payload back. The format is shared with the
//! check-in desk and must stay byte-compatible.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SEPARATOR: char = '_';

#[derive(Debug, thiserror::Error)]
pub enum ObfuscationError {
    #[error("token has no '_' separator")]
    MissingSeparator,
    #[error("token body is not valid Base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token body is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("payload could not be serialized: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the check-in desk reads from the QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInPayload {
    pub nik: String,
    #[serde(rename = "jadwalTest")]
    pub test_schedule: String,
    pub timestamp: i64,
}

impl CheckInPayload {
    /// An empty schedule is written as `unscheduled`.
    pub fn new(nik: &str, test_schedule: &str, timestamp: i64) -> Self {
        let test_schedule = if test_schedule.is_empty() {
            "unscheduled"
        } else {
            test_schedule
        };
        Self {
            nik: nik.to_string(),
            test_schedule: test_schedule.to_string(),
            timestamp,
        }
    }
}

/// Lower-case base-36 rendering of a non-negative number.
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Encodes any serializable payload into a token salted with `now_millis`.
pub fn encode_token<T: Serialize>(payload: &T, now_millis: u64) -> Result<String, ObfuscationError> {
    let json = serde_json::to_string(payload)?;
    let reversed: String = STANDARD.encode(json).chars().rev().collect();
    Ok(format!("{}{SEPARATOR}{reversed}", to_base36(now_millis)))
}

/// Reads a token back. Text that is not JSON comes back as a JSON string.
pub fn decode_token(token: &str) -> Result<Value, ObfuscationError> {
    let (_salt, body) = token
        .split_once(SEPARATOR)
        .ok_or(ObfuscationError::MissingSeparator)?;
    let encoded: String = body.chars().rev().collect();
    let text = String::from_utf8(STANDARD.decode(encoded)?)?;
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn token_layout() {
        let token = encode_token(&json!({"a": 1}), 36).unwrap();
        // {"a":1} -> eyJhIjoxfQ== reversed
        assert_eq!(token, "10_==QfxojIhJye");
    }

    #[test]
    fn payload_round_trips() {
        let payload = CheckInPayload::new("1234567890123456", "2024-01-15 10:00", 1_705_300_000_000);
        let token = encode_token(&payload, 1_705_300_000_123).unwrap();
        let decoded: CheckInPayload = serde_json::from_value(decode_token(&token).unwrap()).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn arbitrary_json_round_trips() {
        let payloads = [
            json!(null),
            json!("Desa Contoh"),
            json!([1, 2.5, "tiga", {"empat": true}]),
            json!({"nik": "3201", "nested": {"kota": "Bandung", "ünï": "çödé"}}),
        ];
        for (salt, payload) in payloads.iter().enumerate() {
            let token = encode_token(payload, salt as u64 * 1_000_003).unwrap();
            assert_eq!(&decode_token(&token).unwrap(), payload);
        }
    }

    #[test]
    fn empty_schedule_is_unscheduled() {
        let payload = CheckInPayload::new("1234567890123456", "", 1);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["jadwalTest"], "unscheduled");
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(decode_token("no-separator"), Err(ObfuscationError::MissingSeparator)));
        assert!(matches!(decode_token("abc_***"), Err(ObfuscationError::Base64(_))));
    }
}

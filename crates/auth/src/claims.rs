//! Claim decoding for the bearer credential.
//!
//! The credential is `header.payload.signature`. Only the payload is read, and
//! the signature is never checked client-side: the server is the authority,
//! the client merely wants to know who it is showing the screen to.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::{Map, Value};

use crate::Role;

/// Source keys for the subject id, in precedence order.
pub const SUBJECT_ID_KEYS: [&str; 6] = [
    "nameid",
    "nameId",
    "sub",
    "id",
    "Id",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier",
];

/// Source keys for the role, in precedence order.
pub const ROLE_KEYS: [&str; 2] = [
    "role",
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
];

/// Source keys for the display name, in precedence order.
pub const NAME_KEYS: [&str; 2] = [
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name",
    "name",
];

// Standard alphabet (after the url-safe translation), padding optional and
// trailing bits tolerated, matching how browsers decode payload segments.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Loosely-typed claims taken from a credential payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClaimBag(Map<String, Value>);

impl ClaimBag {
    /// Decode the payload segment of `credential`.
    ///
    /// Returns `None` unless the credential has exactly three segments and the
    /// middle one is base64 of a JSON object. Never panics.
    pub fn decode(credential: &str) -> Option<Self> {
        let segments: Vec<&str> = credential.split('.').collect();
        if segments.len() != 3 {
            tracing::debug!(segments = segments.len(), "credential is not a three-part token");
            return None;
        }

        let standard: String = segments[1]
            .chars()
            .map(|c| match c {
                '-' => '+',
                '_' => '/',
                other => other,
            })
            .collect();

        let bytes = match PAYLOAD_ENGINE.decode(standard.as_bytes()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!("credential payload is not base64: {err}");
                return None;
            }
        };

        match serde_json::from_slice::<Map<String, Value>>(&bytes) {
            Ok(map) => Some(Self(map)),
            Err(err) => {
                tracing::debug!("credential payload is not a JSON object: {err}");
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First candidate key whose value is present and not `null`.
    fn first_present(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    /// Numeric subject id.
    ///
    /// The first present candidate decides; when it is not an integer the id
    /// is absent, even if a later candidate would have parsed. A numeric `0`
    /// is treated as unset, but the string `"0"` is a real id. Numbers outside
    /// the `i64` range are absent rather than clamped.
    pub fn subject_id(&self) -> Option<i64> {
        match self.first_present(&SUBJECT_ID_KEYS)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(whole_i64))
                .filter(|id| *id != 0),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Role claim. A present but unrecognized role still wins over later keys.
    pub fn role(&self) -> Option<Role> {
        self.first_present(&ROLE_KEYS)?.as_str()?.parse().ok()
    }

    /// Display name: first candidate holding a non-empty string.
    pub fn display_name(&self) -> Option<String> {
        NAME_KEYS
            .iter()
            .filter_map(|key| self.0.get(*key))
            .filter_map(Value::as_str)
            .find(|name| !name.is_empty())
            .map(str::to_string)
    }
}

fn whole_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

/// Decode an optional credential; absence decodes to no claims.
pub fn decode(credential: Option<&str>) -> Option<ClaimBag> {
    credential.and_then(ClaimBag::decode)
}

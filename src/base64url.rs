//! Base64url codec (RFC 4648 §5, padding optional).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::InputError;

/// Decode a base64url string. Trailing `=` padding is tolerated but
/// never required; any character outside the base64url alphabet is an
/// error.
pub fn decode(encoded: &str) -> Result<Vec<u8>, InputError> {
    let trimmed = encoded.trim_end_matches('=');
    Ok(URL_SAFE_NO_PAD.decode(trimmed.as_bytes())?)
}

/// Encode bytes as unpadded base64url. The output never contains `+`,
/// `/`, or `=`.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

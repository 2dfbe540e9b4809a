//! Compact JWT segmentation and signature decoding.

use num_bigint::BigUint;

use crate::base64url;
use crate::error::InputError;

/// The three base64url segments of a compact JWT. `header.payload` is
/// the exact byte sequence the issuer signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtToken<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> JwtToken<'a> {
    /// Split a compact token. Exactly three non-empty dot-separated
    /// segments; anything else is a format error.
    pub fn parse(raw: &'a str) -> Result<Self, InputError> {
        let mut parts = raw.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(payload), Some(signature), None)
                if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
            {
                Ok(Self {
                    header,
                    payload,
                    signature,
                })
            }
            _ => Err(InputError::MalformedToken),
        }
    }

    /// The exact signed message: `header ++ "." ++ payload` in ASCII.
    pub fn signed_message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(self.header.len() + 1 + self.payload.len());
        message.extend_from_slice(self.header.as_bytes());
        message.push(b'.');
        message.extend_from_slice(self.payload.as_bytes());
        message
    }

    /// Byte index of the separating dot within the signed message.
    pub fn period_index(&self) -> usize {
        self.header.len()
    }

    pub fn decode_header(&self) -> Result<Vec<u8>, InputError> {
        base64url::decode(self.header)
    }

    pub fn decode_payload(&self) -> Result<Vec<u8>, InputError> {
        base64url::decode(self.payload)
    }

    /// Decode the JOSE signature into its `(r, s)` components. ES256
    /// signatures are the raw 64-byte concatenation of two big-endian
    /// 32-byte integers.
    pub fn decode_signature(&self) -> Result<(BigUint, BigUint), InputError> {
        let bytes = base64url::decode(self.signature)?;
        if bytes.len() != 64 {
            return Err(InputError::SignatureLength(bytes.len()));
        }
        let r = BigUint::from_bytes_be(&bytes[..32]);
        let s = BigUint::from_bytes_be(&bytes[32..]);
        Ok((r, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_segments() {
        let token = JwtToken::parse("aGVhZGVy.cGF5bG9hZA.c2ln").unwrap();
        assert_eq!(token.header, "aGVhZGVy");
        assert_eq!(token.payload, "cGF5bG9hZA");
        assert_eq!(token.signature, "c2ln");
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        for raw in ["", "a.b", "a.b.c.d", ".b.c", "a..c", "a.b."] {
            assert!(
                matches!(JwtToken::parse(raw), Err(InputError::MalformedToken)),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn signed_message_joins_header_and_payload() {
        let token = JwtToken::parse("abc.defg.sig").unwrap();
        assert_eq!(token.signed_message(), b"abc.defg");
        assert_eq!(token.period_index(), 3);
    }

    #[test]
    fn decodes_raw_signature_into_r_and_s() {
        let mut sig = [0u8; 64];
        sig[31] = 5;
        sig[63] = 9;
        let encoded = base64url::encode(&sig);
        let raw = format!("aGVhZGVy.cGF5bG9hZA.{encoded}");
        let token = JwtToken::parse(&raw).unwrap();
        let (r, s) = token.decode_signature().unwrap();
        assert_eq!(r, BigUint::from(5u8));
        assert_eq!(s, BigUint::from(9u8));
    }

    #[test]
    fn rejects_der_encoded_signature() {
        // A DER ECDSA signature is ~70 bytes, not the raw 64-byte form.
        let encoded = base64url::encode(&[1u8; 70]);
        let raw = format!("a.b.{encoded}");
        let token = JwtToken::parse(&raw).unwrap();
        assert!(matches!(
            token.decode_signature(),
            Err(InputError::SignatureLength(70))
        ));
    }
}

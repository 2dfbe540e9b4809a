//! Fixed-shape ASN.1 walk over a DER SubjectPublicKeyInfo.
//!
//! This is deliberately not a general DER parser: it descends the one
//! tag sequence an uncompressed P-256 SPKI has (SEQUENCE, SEQUENCE, OID,
//! OID, BIT STRING) and pulls the raw X/Y coordinates out of the
//! `0x04 || X || Y` point. The OIDs are consumed but never compared
//! against the expected curve identifiers; any shape deviation fails
//! closed with a structured error instead of being reinterpreted.

use num_bigint::BigUint;

use crate::base64url;
use crate::error::{InputError, SpkiError};

const TAG_SEQUENCE: u8 = 0x30;
const TAG_OID: u8 = 0x06;
const TAG_BIT_STRING: u8 = 0x03;

const POINT_UNCOMPRESSED: u8 = 0x04;

struct DerReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read_u8(&mut self) -> Result<u8, SpkiError> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or(SpkiError::Truncated { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read a tag byte and its length, asserting the expected tag.
    /// Returns the content length; the cursor is left at the content.
    fn read_header(&mut self, expected: u8) -> Result<usize, SpkiError> {
        let offset = self.pos;
        let tag = self.read_u8()?;
        if tag != expected {
            return Err(SpkiError::UnexpectedTag {
                offset,
                expected,
                found: tag,
            });
        }

        let first = self.read_u8()?;
        let len = if first & 0x80 == 0 {
            first as usize
        } else {
            // Long form: up to 4 length bytes is far more than any SPKI
            // needs, but mirrors what a general BER reader accepts.
            let n = (first & 0x7f) as usize;
            if n == 0 || n > 4 {
                return Err(SpkiError::BadLength { offset });
            }
            let mut len = 0usize;
            for _ in 0..n {
                len = (len << 8) | self.read_u8()? as usize;
            }
            len
        };

        if self.pos + len > self.buf.len() {
            return Err(SpkiError::Truncated { offset: self.pos });
        }
        Ok(len)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], SpkiError> {
        if self.pos + len > self.buf.len() {
            return Err(SpkiError::Truncated { offset: self.pos });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}

/// Extract the big-endian X/Y coordinates from a DER-encoded P-256
/// SubjectPublicKeyInfo.
pub fn extract_xy(der: &[u8]) -> Result<(BigUint, BigUint), SpkiError> {
    let mut reader = DerReader::new(der);

    reader.read_header(TAG_SEQUENCE)?;
    reader.read_header(TAG_SEQUENCE)?;

    // Algorithm and curve OIDs: consumed, not validated.
    let len = reader.read_header(TAG_OID)?;
    reader.take(len)?;
    let len = reader.read_header(TAG_OID)?;
    reader.take(len)?;

    let len = reader.read_header(TAG_BIT_STRING)?;
    let bits = reader.take(len)?;
    // First byte of a BIT STRING is the unused-bits count.
    let point = bits
        .get(1..)
        .ok_or(SpkiError::Truncated { offset: der.len() })?;
    if point.len() != 65 {
        return Err(SpkiError::BadPointLength(point.len()));
    }
    if point[0] != POINT_UNCOMPRESSED {
        return Err(SpkiError::NotUncompressed(point[0]));
    }

    let x = BigUint::from_bytes_be(&point[1..33]);
    let y = BigUint::from_bytes_be(&point[33..65]);
    Ok((x, y))
}

/// Extract X/Y from a PEM-armored public key: strip the armor lines,
/// base64-decode the body, then walk the DER.
pub fn from_pem(pem: &str) -> Result<(BigUint, BigUint), InputError> {
    let mut body = String::new();
    let mut seen_begin = false;
    let mut seen_end = false;
    for line in pem.lines() {
        let line = line.trim();
        if line.starts_with("-----BEGIN") {
            seen_begin = true;
        } else if line.starts_with("-----END") {
            seen_end = true;
        } else if seen_begin && !seen_end {
            body.push_str(line);
        }
    }
    if !seen_begin || !seen_end || body.is_empty() {
        return Err(InputError::MalformedPem);
    }

    // PEM bodies use the standard alphabet; map `+`/`/` to the url-safe
    // characters before decoding.
    let url_safe = body.replace('+', "-").replace('/', "_");
    let der = base64url::decode(&url_safe)?;
    Ok(extract_xy(&der)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // prime256v1 SPKI prefix: SEQUENCE(91) { SEQUENCE(19) { OID ecPublicKey,
    // OID prime256v1 }, BIT STRING(66) { 00, 04 || X || Y } }
    fn build_spki(x: &[u8; 32], y: &[u8; 32]) -> Vec<u8> {
        let mut der = vec![
            0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06,
            0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, 0x42, 0x00, 0x04,
        ];
        der.extend_from_slice(x);
        der.extend_from_slice(y);
        der
    }

    #[test]
    fn extracts_known_coordinates() {
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x[31] = 7;
        y[0] = 0xde;
        y[31] = 0xad;
        let der = build_spki(&x, &y);
        let (got_x, got_y) = extract_xy(&der).unwrap();
        assert_eq!(got_x, BigUint::from(7u8));
        assert_eq!(got_y, BigUint::from_bytes_be(&y));
    }

    #[test]
    fn truncated_der_fails_closed() {
        let der = build_spki(&[1u8; 32], &[2u8; 32]);
        let truncated = &der[..der.len() - 1];
        assert!(matches!(
            extract_xy(truncated),
            Err(SpkiError::Truncated { .. })
        ));
    }

    #[test]
    fn wrong_outer_tag_is_reported_with_offset() {
        let mut der = build_spki(&[1u8; 32], &[2u8; 32]);
        der[0] = 0x31;
        assert_eq!(
            extract_xy(&der),
            Err(SpkiError::UnexpectedTag {
                offset: 0,
                expected: TAG_SEQUENCE,
                found: 0x31
            })
        );
    }

    #[test]
    fn compressed_point_is_rejected() {
        let mut der = build_spki(&[1u8; 32], &[2u8; 32]);
        der[26] = 0x02;
        assert_eq!(
            extract_xy(&der),
            Err(SpkiError::NotUncompressed(0x02))
        );
    }

    #[test]
    fn short_point_is_rejected() {
        // Shrink the bit string to 64 content bytes (unused byte + 63).
        let der = build_spki(&[1u8; 32], &[2u8; 32]);
        let mut short = der.clone();
        short[24] = 0x41; // BIT STRING length 65 instead of 66
        short[1] -= 1; // outer SEQUENCE length
        short.pop();
        assert_eq!(extract_xy(&short), Err(SpkiError::BadPointLength(64)));
    }

    #[test]
    fn pem_round_trip() {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;
        let der = build_spki(&[0xaa; 32], &[0xbb; 32]);
        let pem = format!(
            "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----",
            STANDARD.encode(&der)
        );
        let (x, y) = from_pem(&pem).unwrap();
        assert_eq!(x, BigUint::from_bytes_be(&[0xaa; 32]));
        assert_eq!(y, BigUint::from_bytes_be(&[0xbb; 32]));
    }

    #[test]
    fn pem_without_armor_is_rejected() {
        assert!(matches!(
            from_pem("just some text"),
            Err(InputError::MalformedPem)
        ));
    }
}

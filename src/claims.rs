//! Selective-disclosure matching and claim location.
//!
//! The payload is traversed through a typed schema rather than free-form
//! JSON lookups: `vc.credentialSubject._sd` is an ordered list of
//! base64url SHA-256 digests, and a missing level anywhere along that
//! path means "no hashed claims", which is a valid state (the signature
//! can still be proven with zero disclosures).
//!
//! Digest comparison is strictly positional: disclosure `i` must hash to
//! `_sd[i]`. This mirrors the credential format's encoding of
//! disclosures as an ordered, not keyed, list.

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::base64url;
use crate::error::InputError;

/// The subset of the SD-JWT payload the pipeline relies on. Every level
/// is optional; absence is handled, never a crash.
#[derive(Debug, Default, Deserialize)]
pub struct JwtPayload {
    pub vc: Option<VerifiableCredential>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifiableCredential {
    #[serde(rename = "credentialSubject")]
    pub credential_subject: Option<CredentialSubject>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CredentialSubject {
    #[serde(rename = "_sd")]
    pub sd: Option<Vec<String>>,
    #[serde(rename = "_sd_alg")]
    pub sd_alg: Option<String>,
}

impl JwtPayload {
    pub fn from_slice(payload_json: &[u8]) -> Result<Self, InputError> {
        Ok(serde_json::from_slice(payload_json)?)
    }

    /// The ordered `_sd` digest list, or empty when any level of
    /// `vc.credentialSubject._sd` is absent.
    pub fn sd_digests(&self) -> &[String] {
        self.vc
            .as_ref()
            .and_then(|vc| vc.credential_subject.as_ref())
            .and_then(|subject| subject.sd.as_deref())
            .unwrap_or(&[])
    }
}

/// The base64url-encoded SHA-256 digest of a disclosed claim, the form
/// `_sd` entries carry.
pub fn disclosure_digest(claim: &str) -> String {
    base64url::encode(&Sha256::digest(claim.as_bytes()))
}

/// Check each disclosed claim against the `_sd` digest at the same
/// ordinal. Fewer disclosures than digests is fine (only supplied
/// ordinals are checked); a disclosure past the end of `_sd`, or one
/// whose digest differs, fails with the offending index.
pub fn match_disclosures(digests: &[String], disclosed: &[String]) -> Result<(), InputError> {
    for (index, claim) in disclosed.iter().enumerate() {
        let expected = digests.get(index).ok_or(InputError::ClaimMismatch(index))?;
        if &disclosure_digest(claim) != expected {
            return Err(InputError::ClaimMismatch(index));
        }
    }
    Ok(())
}

/// Locate each target's first occurrence inside `haystack`, returning
/// `(offset, length)` pairs in target order. These become the circuit
/// signals that constrain substring membership without the circuit
/// parsing JSON itself.
pub fn locate_offsets<S: AsRef<str>>(
    haystack: &[u8],
    targets: &[S],
) -> Result<Vec<(usize, usize)>, InputError> {
    targets
        .iter()
        .map(|target| {
            let needle = target.as_ref().as_bytes();
            find(haystack, needle)
                .map(|offset| (offset, needle.len()))
                .ok_or_else(|| InputError::ClaimNotFound(target.as_ref().to_string()))
        })
        .collect()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with_sd(digests: &[&str]) -> Vec<u8> {
        serde_json::json!({
            "iss": "did:example:issuer",
            "vc": {
                "credentialSubject": {
                    "_sd": digests,
                    "_sd_alg": "sha-256"
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn extracts_sd_digests_in_order() {
        let payload = JwtPayload::from_slice(&payload_with_sd(&["d1", "d2"])).unwrap();
        assert_eq!(payload.sd_digests(), ["d1", "d2"]);
    }

    #[test]
    fn missing_levels_mean_no_disclosures() {
        for json in [
            r#"{}"#,
            r#"{"vc":{}}"#,
            r#"{"vc":{"credentialSubject":{}}}"#,
        ] {
            let payload = JwtPayload::from_slice(json.as_bytes()).unwrap();
            assert!(payload.sd_digests().is_empty(), "{json}");
        }
    }

    #[test]
    fn matches_positionally() {
        let digests = vec![disclosure_digest("claim-a"), disclosure_digest("claim-b")];
        let disclosed = vec!["claim-a".to_string(), "claim-b".to_string()];
        assert!(match_disclosures(&digests, &disclosed).is_ok());
    }

    #[test]
    fn reports_the_mismatching_ordinal() {
        let digests = vec![disclosure_digest("claim-a"), disclosure_digest("claim-b")];
        let disclosed = vec!["claim-a".to_string(), "claim-c".to_string()];
        assert!(matches!(
            match_disclosures(&digests, &disclosed),
            Err(InputError::ClaimMismatch(1))
        ));
    }

    #[test]
    fn fewer_disclosures_than_digests_is_ok() {
        let digests = vec![disclosure_digest("claim-a"), disclosure_digest("claim-b")];
        assert!(match_disclosures(&digests, &["claim-a".to_string()]).is_ok());
    }

    #[test]
    fn disclosure_past_the_sd_list_fails() {
        let digests = vec![disclosure_digest("claim-a")];
        let disclosed = vec!["claim-a".to_string(), "claim-b".to_string()];
        assert!(matches!(
            match_disclosures(&digests, &disclosed),
            Err(InputError::ClaimMismatch(1))
        ));
    }

    #[test]
    fn swapped_order_is_a_mismatch_at_index_zero() {
        let digests = vec![disclosure_digest("claim-a"), disclosure_digest("claim-b")];
        let disclosed = vec!["claim-b".to_string(), "claim-a".to_string()];
        assert!(matches!(
            match_disclosures(&digests, &disclosed),
            Err(InputError::ClaimMismatch(0))
        ));
    }

    #[test]
    fn locates_targets_in_a_buffer() {
        let haystack = br#"{"_sd":["abc","defg"]}"#;
        let offsets = locate_offsets(haystack, &["abc", "defg"]).unwrap();
        assert_eq!(offsets, vec![(9, 3), (15, 4)]);
    }

    #[test]
    fn absent_target_names_the_claim() {
        let haystack = b"nothing to see";
        match locate_offsets(haystack, &["ghost"]) {
            Err(InputError::ClaimNotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected ClaimNotFound, got {other:?}"),
        }
    }
}

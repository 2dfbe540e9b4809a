//! Circuit input assembly: from a compact SD-JWT, a P-256 public key,
//! and the disclosed claims to the full named-signal map the external
//! Groth16 circuit expects.
//!
//! The circuit's topology is fixed at compile time, so every buffer is
//! padded or rejected against [`CircuitParams`], and every numeric value
//! is emitted as a decimal string the witness generator can ingest
//! directly. Assembly is a pure function: identical inputs always yield
//! a bit-identical map.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use serde::Serialize;
use tracing::debug;

use crate::base64url;
use crate::claims::{self, JwtPayload};
use crate::error::InputError;
use crate::jwt::JwtToken;
use crate::limbs;
use crate::padding;
use crate::spki;

/// The fixed sizes the consuming circuit was compiled with. Exceeding
/// any maximum is a fatal input error; the circuit cannot take oversize
/// data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitParams {
    /// Bits per limb of a non-native 256-bit value.
    pub limb_bits: usize,
    /// Limbs per 256-bit value.
    pub limb_count: usize,
    /// Fixed byte length of the padded signed-message buffer.
    pub max_message_len: usize,
    /// Maximum decoded payload byte length.
    pub max_payload_len: usize,
    /// Fixed slot length for claim and digest strings.
    pub max_claim_len: usize,
    /// Maximum number of located substrings.
    pub max_match_count: usize,
    /// Maximum number of disclosed claims.
    pub max_sd_count: usize,
}

impl CircuitParams {
    /// Parameters of the deployed ES256 SD-JWT circuit.
    pub fn es256_sd_jwt() -> Self {
        Self {
            limb_bits: 43,
            limb_count: 6,
            max_message_len: 1024,
            max_payload_len: 256,
            max_claim_len: 256,
            max_match_count: 5,
            max_sd_count: 8,
        }
    }
}

/// The two key input forms the verifier hands over: JWK coordinates or
/// a PEM-armored SPKI blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyInput {
    /// Base64url-encoded 32-byte big-endian coordinates.
    Jwk { x: String, y: String },
    Pem(String),
}

/// An uncompressed P-256 point as two integers below 2^256.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyPoint {
    pub x: BigUint,
    pub y: BigUint,
}

impl PublicKeyPoint {
    pub fn from_input(key: &PublicKeyInput) -> Result<Self, InputError> {
        match key {
            PublicKeyInput::Jwk { x, y } => {
                let x = decode_coordinate(x, "x")?;
                let y = decode_coordinate(y, "y")?;
                Ok(Self { x, y })
            }
            PublicKeyInput::Pem(pem) => {
                let (x, y) = spki::from_pem(pem)?;
                Ok(Self { x, y })
            }
        }
    }
}

fn decode_coordinate(encoded: &str, coordinate: &'static str) -> Result<BigUint, InputError> {
    let bytes = base64url::decode(encoded)?;
    if bytes.len() != 32 {
        return Err(InputError::CoordinateLength {
            coordinate,
            len: bytes.len(),
        });
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

/// The assembled witness: signal name → decimal-string values, ordered
/// so that serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CircuitInputMap {
    signals: BTreeMap<String, Vec<String>>,
}

impl CircuitInputMap {
    fn insert_scalar(&mut self, name: &str, value: impl ToString) {
        self.signals.insert(name.to_string(), vec![value.to_string()]);
    }

    fn insert_bytes(&mut self, name: &str, bytes: &[u8]) {
        self.signals.insert(
            name.to_string(),
            bytes.iter().map(|b| b.to_string()).collect(),
        );
    }

    fn insert_limbs(&mut self, name: &str, limbs: &[BigUint]) {
        self.signals.insert(
            name.to_string(),
            limbs.iter().map(|l| l.to_str_radix(10)).collect(),
        );
    }

    fn insert_u64s(&mut self, name: &str, values: &[u64]) {
        self.signals.insert(
            name.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.signals.get(name).map(Vec::as_slice)
    }

    pub fn signal_names(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Compile the complete input map for one proving invocation.
///
/// Any failure along the way aborts the whole assembly; no partial map
/// is ever returned.
pub fn assemble(
    raw_token: &str,
    key: &PublicKeyInput,
    disclosed_claims: &[String],
    params: &CircuitParams,
) -> Result<CircuitInputMap, InputError> {
    let token = JwtToken::parse(raw_token)?;

    let signed_message = token.signed_message();
    let padded = padding::sha256_pad(&signed_message, params.max_message_len)?;
    debug!(
        message_len = signed_message.len(),
        padded_len = padded.padded_len,
        "padded signed message"
    );

    let (sig_r, sig_s) = token.decode_signature()?;
    let point = PublicKeyPoint::from_input(key)?;

    let payload_json = token.decode_payload()?;
    if payload_json.len() > params.max_payload_len {
        return Err(InputError::CapacityExceeded {
            what: "decoded payload",
            len: payload_json.len(),
            max: params.max_payload_len,
        });
    }

    if disclosed_claims.len() > params.max_sd_count {
        return Err(InputError::CapacityExceeded {
            what: "disclosed claims",
            len: disclosed_claims.len(),
            max: params.max_sd_count,
        });
    }
    if disclosed_claims.len() > params.max_match_count {
        return Err(InputError::CapacityExceeded {
            what: "digest matches",
            len: disclosed_claims.len(),
            max: params.max_match_count,
        });
    }

    let payload = JwtPayload::from_slice(&payload_json)?;
    let digests = payload.sd_digests();
    claims::match_disclosures(digests, disclosed_claims)?;

    // Each verified disclosure's digest appears as literal text in the
    // decoded payload; its position becomes a public signal so the
    // circuit can constrain the byte range without parsing JSON.
    let matched_digests = &digests[..disclosed_claims.len()];
    let offsets = claims::locate_offsets(&payload_json, matched_digests)?;

    let mut map = CircuitInputMap::default();

    map.insert_bytes("message", &padded.bytes);
    map.insert_scalar("messageLength", padded.padded_len);
    map.insert_scalar("periodIndex", token.period_index());
    map.insert_scalar("payloadLength", payload_json.len());

    map.insert_limbs("sig_r", &limbs::to_limbs(&sig_r, params.limb_bits, params.limb_count)?);
    map.insert_limbs("sig_s", &limbs::to_limbs(&sig_s, params.limb_bits, params.limb_count)?);
    map.insert_limbs(
        "pubKeyX",
        &limbs::to_limbs(&point.x, params.limb_bits, params.limb_count)?,
    );
    map.insert_limbs(
        "pubKeyY",
        &limbs::to_limbs(&point.y, params.limb_bits, params.limb_count)?,
    );

    // Disclosed claims, one fixed-size row of code points per _sd slot.
    let mut claim_rows = Vec::with_capacity(params.max_sd_count * params.max_claim_len);
    let mut claim_lengths = Vec::with_capacity(params.max_sd_count);
    for slot in 0..params.max_sd_count {
        match disclosed_claims.get(slot) {
            Some(claim) => {
                claim_rows.extend(limbs::pad_string(claim, params.max_claim_len)?);
                claim_lengths.push(claim.chars().count() as u64);
            }
            None => {
                claim_rows.extend(std::iter::repeat(0).take(params.max_claim_len));
                claim_lengths.push(0);
            }
        }
    }
    map.insert_u64s("claims", &claim_rows);
    map.insert_u64s("claimLengths", &claim_lengths);
    map.insert_scalar("claimsCount", disclosed_claims.len());

    // Located digest substrings, one fixed-size row per match slot.
    let mut match_rows = Vec::with_capacity(params.max_match_count * params.max_claim_len);
    let mut match_index = vec![0u64; params.max_match_count];
    let mut match_length = vec![0u64; params.max_match_count];
    for slot in 0..params.max_match_count {
        match matched_digests.get(slot) {
            Some(digest) => {
                match_rows.extend(limbs::pad_string(digest, params.max_claim_len)?);
                let (offset, len) = offsets[slot];
                match_index[slot] = offset as u64;
                match_length[slot] = len as u64;
            }
            None => match_rows.extend(std::iter::repeat(0).take(params.max_claim_len)),
        }
    }
    map.insert_u64s("matchSubstring", &match_rows);
    map.insert_u64s("matchIndex", &match_index);
    map.insert_u64s("matchLength", &match_length);
    map.insert_scalar("matchesCount", disclosed_claims.len());

    debug!(signals = map.len(), "assembled circuit input map");
    Ok(map)
}

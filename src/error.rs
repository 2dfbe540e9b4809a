//! Error taxonomy for the input-compilation pipeline.
//!
//! Every failure here is a deterministic function of bad input: the
//! pipeline fails fast on the first error and never returns a partial
//! input map, so there is nothing to retry.

/// Errors raised while compiling an SD-JWT into circuit inputs.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The compact token does not have exactly three non-empty
    /// dot-separated segments.
    #[error("invalid JWT format: expected header.payload.signature")]
    MalformedToken,

    /// A segment (or JWK coordinate) is not valid base64url.
    #[error("invalid base64url input: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded JOSE signature is not the raw 64-byte `r || s` form.
    #[error("signature must decode to 64 bytes, got {0}")]
    SignatureLength(usize),

    /// A JWK coordinate did not decode to a 32-byte value.
    #[error("JWK coordinate '{coordinate}' must decode to 32 bytes, got {len}")]
    CoordinateLength { coordinate: &'static str, len: usize },

    /// A value does not fit in the configured limb decomposition.
    #[error("value of {value_bits} bits does not fit in {limb_count} limbs of {limb_bits} bits")]
    LimbOverflow {
        value_bits: u64,
        limb_bits: usize,
        limb_count: usize,
    },

    /// A string is longer than the fixed slot it must be padded into.
    #[error("string of {len} code points exceeds pad length {max}")]
    PadOverflow { len: usize, max: usize },

    /// More values were supplied than the circuit has slots for.
    #[error("{what}: {len} exceeds circuit capacity {max}")]
    CapacityExceeded {
        what: &'static str,
        len: usize,
        max: usize,
    },

    /// The SHA-256 padded message would not fit the circuit's buffer.
    #[error("message too long: padded length {padded} exceeds max {max}")]
    MessageTooLong { padded: usize, max: usize },

    /// The DER public key does not match the assumed SPKI shape.
    #[error(transparent)]
    Spki(#[from] SpkiError),

    /// The PEM armor around a public key is malformed.
    #[error("malformed PEM: missing BEGIN/END public key markers")]
    MalformedPem,

    /// The JWT payload is not the JSON the schema expects.
    #[error("invalid payload JSON: {0}")]
    PayloadJson(#[from] serde_json::Error),

    /// A disclosed claim's digest does not equal the `_sd` entry at the
    /// same ordinal (or there is no entry at that ordinal).
    #[error("disclosed claim at index {0} does not match the _sd digest at that position")]
    ClaimMismatch(usize),

    /// A requested substring could not be located in the search buffer.
    #[error("claim '{0}' not found in message buffer")]
    ClaimNotFound(String),
}

/// Structured failure from the fixed-shape SPKI walk.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpkiError {
    #[error("unexpected DER tag at offset {offset}: expected {expected:#04x}, found {found:#04x}")]
    UnexpectedTag {
        offset: usize,
        expected: u8,
        found: u8,
    },

    #[error("DER structure truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("unsupported DER length encoding at offset {offset}")]
    BadLength { offset: usize },

    #[error("EC point payload must be 65 bytes (0x04 marker + 2×32), got {0}")]
    BadPointLength(usize),

    #[error("EC point is not in uncompressed form (marker {0:#04x})")]
    NotUncompressed(u8),
}

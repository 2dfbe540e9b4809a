//! Circuit input compilation for SD-JWT credentials
//!
//! This library turns a Selective-Disclosure JWT, an ECDSA P-256 public
//! key, and the holder's disclosed claims into the exact named-signal
//! input map a fixed-topology Groth16 circuit expects:
//! - base64url codec and JWT segmentation
//! - SHA-256 preimage padding into the circuit's fixed buffer
//! - fixed-radix limb decomposition of 256-bit values
//! - naive ASN.1 SPKI extraction of P-256 coordinates
//! - positional `_sd` disclosure matching and claim location
//!
//! The proving engine itself is external and opaque; see [`prover`] for
//! the boundary.

pub mod base64url;
pub mod claims;
pub mod error;
pub mod inputs;
pub mod jwt;
pub mod limbs;
pub mod padding;
pub mod prover;
pub mod spki;

// Re-export commonly used types and functions
pub use claims::{disclosure_digest, locate_offsets, match_disclosures, JwtPayload};
pub use error::{InputError, SpkiError};
pub use inputs::{assemble, CircuitInputMap, CircuitParams, PublicKeyInput, PublicKeyPoint};
pub use jwt::JwtToken;
pub use limbs::{from_limbs, pad_string, to_limbs};
pub use padding::{sha256_pad, PaddedMessage};
pub use prover::{CircuitArtifacts, Es256Verifier, Groth16Prover};
pub use spki::extract_xy;

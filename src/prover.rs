//! Boundaries to the external prover and the platform signature check.
//!
//! The core never interprets circuit artifacts: the witness-generation
//! program, proving key, and verification key are opaque blobs handed to
//! whichever Groth16 engine the embedding application links in. The
//! plain (non-ZK) ES256 validity check likewise belongs to the platform;
//! only the seam is defined here.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use memmap2::Mmap;
use tracing::info;

use crate::inputs::{CircuitInputMap, PublicKeyInput};

pub const JWT_WITNESS_PROGRAM: &str = "artifacts/jwt.wasm";
pub const JWT_PROVING_KEY: &str = "artifacts/jwt.zkey";
pub const JWT_VERIFICATION_KEY: &str = "artifacts/jwt_vkey.json";

/// The three opaque artifacts a Groth16 invocation needs. Proving keys
/// routinely run to hundreds of megabytes, so that one is memory-mapped
/// rather than read into a buffer.
pub struct CircuitArtifacts {
    pub witness_program: Vec<u8>,
    pub proving_key: Mmap,
    pub verification_key: Vec<u8>,
}

impl CircuitArtifacts {
    pub fn load(
        witness_program_path: &str,
        proving_key_path: &str,
        verification_key_path: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let witness_program = std::fs::read(witness_program_path)?;
        info!(
            path = witness_program_path,
            bytes = witness_program.len(),
            "loaded witness program"
        );

        let zkey_file = File::open(proving_key_path)?;
        let proving_key = unsafe { Mmap::map(&zkey_file)? };
        info!(
            path = proving_key_path,
            bytes = proving_key.len(),
            "mapped proving key"
        );

        let verification_key = std::fs::read(verification_key_path)?;
        info!(path = verification_key_path, "loaded verification key");

        Ok(Self {
            witness_program,
            proving_key,
            verification_key,
        })
    }
}

/// The external Groth16 engine consuming the assembled input map.
pub trait Groth16Prover {
    type Proof;
    type Error: std::error::Error;

    /// Produce a proof and its public signals from the fixed artifacts
    /// and one assembled input map.
    fn prove(
        &self,
        artifacts: &CircuitArtifacts,
        inputs: &CircuitInputMap,
    ) -> Result<(Self::Proof, Vec<String>), Self::Error>;

    fn verify(
        &self,
        verification_key: &[u8],
        proof: &Self::Proof,
        public_signals: &[String],
    ) -> Result<bool, Self::Error>;
}

/// The platform's plain ECDSA/P-256/SHA-256 check over `header.payload`.
/// The pipeline re-derives signature bytes for circuit encoding but
/// relies on this separate path for ordinary validity confirmation.
pub trait Es256Verifier {
    type Error: std::error::Error;

    fn verify_signature(&self, token: &str, key: &PublicKeyInput) -> Result<bool, Self::Error>;
}

/// Write the input map as JSON for a snarkjs-style witness generator.
/// Signal order is deterministic, so identical maps produce identical
/// files.
pub fn write_inputs_json(path: &Path, inputs: &CircuitInputMap) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(inputs)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    info!(path = %path.display(), "wrote circuit inputs");
    Ok(())
}

//! SHA-256 preimage padding into a fixed-size buffer.
//!
//! The circuit's hash gadget always processes `max_len` bytes, so the
//! message is finalized here exactly as FIPS 180-4 would: `0x80` marker,
//! minimal zero fill to a 64-byte block boundary, and the original bit
//! length as a 64-bit big-endian suffix. The reported `padded_len` tells
//! the circuit where genuine content ends and inert padding begins.

use crate::error::InputError;

/// A message padded into the circuit's fixed-size hash buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedMessage {
    /// Exactly `max_len` bytes; everything past `padded_len` is zero.
    pub bytes: Vec<u8>,
    /// Length of the used region: message + 0x80 + zero fill + 8-byte
    /// length suffix. Always a multiple of 64.
    pub padded_len: usize,
    /// Bit length of the original message, as written into the suffix.
    pub bit_len: u64,
}

/// Pad `message` into a buffer of exactly `max_len` bytes.
pub fn sha256_pad(message: &[u8], max_len: usize) -> Result<PaddedMessage, InputError> {
    let bit_len = (message.len() as u64) * 8;

    // Minimal zero fill so that message + 0x80 + fill + 8 is a multiple
    // of the 64-byte block size.
    let unpadded = message.len() + 1 + 8;
    let fill = (64 - unpadded % 64) % 64;
    let padded_len = unpadded + fill;

    if padded_len > max_len {
        return Err(InputError::MessageTooLong {
            padded: padded_len,
            max: max_len,
        });
    }

    let mut bytes = vec![0u8; max_len];
    bytes[..message.len()].copy_from_slice(message);
    bytes[message.len()] = 0x80;
    bytes[padded_len - 8..padded_len].copy_from_slice(&bit_len.to_be_bytes());

    Ok(PaddedMessage {
        bytes,
        padded_len,
        bit_len,
    })
}

//! Fixed-radix limb decomposition for values wider than the circuit's
//! native field.
//!
//! The circuit represents 256-bit ECDSA values as `limb_count` limbs of
//! `limb_bits` bits each, little-endian: `limb[i] = (v >> (i * bits)) mod
//! 2^bits`. The decomposition must be exactly reversible, so everything
//! here is plain `BigUint` arithmetic with no intermediate floats.

use num_bigint::BigUint;

use crate::error::InputError;

/// Split `value` into exactly `limb_count` little-endian limbs of
/// `limb_bits` bits. Fails if the value does not fit.
pub fn to_limbs(
    value: &BigUint,
    limb_bits: usize,
    limb_count: usize,
) -> Result<Vec<BigUint>, InputError> {
    if value.bits() > (limb_bits * limb_count) as u64 {
        return Err(InputError::LimbOverflow {
            value_bits: value.bits(),
            limb_bits,
            limb_count,
        });
    }

    let mask = (BigUint::from(1u8) << limb_bits) - 1u8;
    let mut limbs = Vec::with_capacity(limb_count);
    let mut rest = value.clone();
    for _ in 0..limb_count {
        limbs.push(&rest & &mask);
        rest >>= limb_bits;
    }
    Ok(limbs)
}

/// Reconstruct the original value from little-endian limbs.
pub fn from_limbs(limbs: &[BigUint], limb_bits: usize) -> BigUint {
    let mut value = BigUint::from(0u8);
    for limb in limbs.iter().rev() {
        value = (value << limb_bits) + limb;
    }
    value
}

/// Map each character of `s` to its code point and right-pad with zeros
/// to exactly `length` entries. Fails if `s` is already longer.
pub fn pad_string(s: &str, length: usize) -> Result<Vec<u64>, InputError> {
    let mut values: Vec<u64> = s.chars().map(|c| c as u64).collect();
    if values.len() > length {
        return Err(InputError::PadOverflow {
            len: values.len(),
            max: length,
        });
    }
    values.resize(length, 0);
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: u128) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn decomposes_small_value() {
        // 2^43 lands exactly in the second 43-bit limb.
        let v = big(1) << 43;
        let limbs = to_limbs(&v, 43, 6).unwrap();
        assert_eq!(limbs.len(), 6);
        assert_eq!(limbs[0], big(0));
        assert_eq!(limbs[1], big(1));
        assert!(limbs[2..].iter().all(|l| *l == big(0)));
    }

    #[test]
    fn round_trips_a_256_bit_value() {
        let v = BigUint::parse_bytes(
            b"fffffffe00000003fffffffd0000000200000001fffffffe0000000300000004",
            16,
        )
        .unwrap();
        let limbs = to_limbs(&v, 43, 6).unwrap();
        assert_eq!(from_limbs(&limbs, 43), v);
        let mask = (big(1) << 43) - 1u8;
        assert!(limbs.iter().all(|l| l <= &mask));
    }

    #[test]
    fn rejects_value_that_does_not_fit() {
        let v = big(1) << (43 * 6);
        assert!(matches!(
            to_limbs(&v, 43, 6),
            Err(InputError::LimbOverflow { .. })
        ));
        // One less fits.
        let v = (big(1) << (43 * 6)) - 1u8;
        assert!(to_limbs(&v, 43, 6).is_ok());
    }

    #[test]
    fn pads_string_with_zero_code_points() {
        let padded = pad_string("iat", 6).unwrap();
        assert_eq!(padded, vec![105, 97, 116, 0, 0, 0]);
    }

    #[test]
    fn pad_string_rejects_overlong_input() {
        assert!(matches!(
            pad_string("overlong", 4),
            Err(InputError::PadOverflow { len: 8, max: 4 })
        ));
    }
}

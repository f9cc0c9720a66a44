// src/reserves.rs
//
// Decodes the packed getReserves() return value.

use ethers::types::U256;

/// Width of one ABI-encoded word in hex digits.
const WORD_HEX: usize = 64;
/// getReserves() returns three words: reserve0, reserve1, blockTimestampLast.
const RETURN_HEX: usize = WORD_HEX * 3;

/// The two reserves of a pair. Values fit in 112 bits by protocol
/// convention; that bound is assumed, not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservePair {
    pub reserve0: U256,
    pub reserve1: U256,
}

/// Decodes a hex-encoded getReserves() payload into a reserve pair.
///
/// The payload must carry the standard `0x` prefix. Shorter payloads are
/// treated as right-aligned low-order data and padded with zero upper
/// digits up to the full three words; the third word (the pair's last
/// update timestamp) is carried in the padding math but never read. Any
/// malformed input yields `None`.
pub fn decode_reserves(hexdata: &str) -> Option<ReservePair> {
    let body = hexdata.strip_prefix("0x")?;
    if !body.is_ascii() {
        return None;
    }

    let padded = if body.len() < RETURN_HEX {
        format!("{:0>width$}", body, width = RETURN_HEX)
    } else {
        body.to_string()
    };

    let reserve0 = U256::from_str_radix(padded.get(..WORD_HEX)?, 16).ok()?;
    let reserve1 = U256::from_str_radix(padded.get(WORD_HEX..2 * WORD_HEX)?, 16).ok()?;
    Some(ReservePair { reserve0, reserve1 })
}

/// Encodes a reserve pair as a full three-word getReserves() payload.
/// Test helper for round-tripping through [`decode_reserves`].
#[cfg(test)]
pub fn encode_reserves(reserve0: u128, reserve1: u128, timestamp: u32) -> String {
    format!("0x{reserve0:064x}{reserve1:064x}{timestamp:064x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_three_words() {
        let payload = encode_reserves(1000, 2000, 1_700_000_000);
        let pair = decode_reserves(&payload).unwrap();
        assert_eq!(pair.reserve0, U256::from(1000u64));
        assert_eq!(pair.reserve1, U256::from(2000u64));
    }

    #[test]
    fn timestamp_word_is_ignored() {
        let a = decode_reserves(&encode_reserves(7, 9, 0)).unwrap();
        let b = decode_reserves(&encode_reserves(7, 9, u32::MAX)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_prefix_or_empty_is_absent() {
        assert!(decode_reserves("").is_none());
        assert!(decode_reserves("0902f1ac").is_none());
        assert!(decode_reserves("deadbeef").is_none());
    }

    #[test]
    fn invalid_hex_digits_are_absent() {
        assert!(decode_reserves("0xzz").is_none());
        let mut payload = encode_reserves(1, 2, 3);
        payload.replace_range(10..11, "g");
        assert!(decode_reserves(&payload).is_none());
        assert!(decode_reserves("0x00ff\u{00e9}e").is_none());
    }

    #[test]
    fn short_payload_is_right_aligned() {
        // A bare "0x" decodes as an all-zero return value.
        let pair = decode_reserves("0x").unwrap();
        assert_eq!(pair.reserve0, U256::zero());
        assert_eq!(pair.reserve1, U256::zero());

        // A single trailing digit lands in the unused timestamp word.
        let pair = decode_reserves("0x5").unwrap();
        assert_eq!(pair.reserve0, U256::zero());
        assert_eq!(pair.reserve1, U256::zero());

        // Two words pad into (0, first-word): missing leading words are zero.
        let two_words = format!("0x{:064x}{:064x}", 1000u64, 2000u64);
        let pair = decode_reserves(&two_words).unwrap();
        assert_eq!(pair.reserve0, U256::zero());
        assert_eq!(pair.reserve1, U256::from(1000u64));
    }

    #[test]
    fn full_width_values_survive() {
        let max_u112 = (1u128 << 112) - 1;
        let pair = decode_reserves(&encode_reserves(max_u112, max_u112, 0)).unwrap();
        assert_eq!(pair.reserve0, U256::from(max_u112));
        assert_eq!(pair.reserve1, U256::from(max_u112));
    }
}

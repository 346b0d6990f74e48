//! Module for bit level manipulation.

/// Unpack a 64-bit word into its 64 bit-values, most significant first.
/// The word is reinterpreted as unsigned before unpacking so that
/// negative inputs yield their two's-complement bit pattern rather
/// than a sign-extended one. The packed fields in region data are
/// stored as signed longs but represent unsigned bit vectors.
pub fn unpack(word: i64) -> [u8; 64] {
	let word = word as u64;
	let mut bits = [0u8; 64];
	for (i, bit) in bits.iter_mut().enumerate() {
		*bit = ((word >> (63 - i)) & 1) as u8;
	}
	bits
}

/// Fold a slice of bit-values back into an integer, most significant
/// bit first. Slices shorter than 64 bits produce values in `0..2^len`.
pub fn pack(bits: &[u8]) -> u64 {
	bits.iter().fold(0u64, |acc, &bit| (acc << 1) | bit as u64)
}

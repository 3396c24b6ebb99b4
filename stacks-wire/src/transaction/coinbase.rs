use super::fixed_bytes;

/// Length of the coinbase buffer
pub const COINBASE_BYTES_LENGTH: usize = 32;
/// Length of an ECVRF proof
pub const VRF_PROOF_BYTES_LENGTH: usize = 80;

fixed_bytes!(
	/// Opaque bytes the miner puts in a coinbase
	CoinbaseBytes,
	COINBASE_BYTES_LENGTH
);

fixed_bytes!(
	/// Verifiable random function proof of a Nakamoto coinbase
	VrfProof,
	VRF_PROOF_BYTES_LENGTH
);

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::Codec;

	#[test]
	fn should_require_exact_lengths() {
		assert!(CoinbaseBytes::from_hex("00".repeat(32)).is_ok());
		assert!(CoinbaseBytes::from_hex("00".repeat(31)).is_err());
		assert!(VrfProof::from_hex(format!("0x{}", "ab".repeat(80))).is_ok());
		assert!(VrfProof::deserialize([0u8; 79]).is_err());
	}
}

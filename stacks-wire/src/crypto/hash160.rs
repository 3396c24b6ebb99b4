use ripemd::{Digest, Ripemd160};
use serde::{Deserialize, Serialize};

use super::sha256::Sha256Hasher;
use crate::crypto::{Hasher, Hashing};

pub(crate) const HASH160_LENGTH: usize = 20;

#[derive(
	Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
)]
/// Hash160 hash type
pub struct Hash160Hashing([u8; HASH160_LENGTH]);

impl Hashing<HASH160_LENGTH> for Hash160Hashing {
	fn hash(data: &[u8]) -> Self {
		Self(Ripemd160::digest(Sha256Hasher::new(data)).into())
	}

	fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	fn from_array(bytes: [u8; HASH160_LENGTH]) -> Self {
		Self(bytes)
	}
}

/// Hash160 hasher type
pub type Hash160Hasher = Hasher<Hash160Hashing, HASH160_LENGTH>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_hash160_correctly() {
		let plaintext = "Hello world";
		let expected_hash_hex = "f5e95668dadf6fdef8521f7e1aa8a5e650c9f849";

		assert_eq!(
			hex::encode(Hash160Hasher::hash(plaintext.as_bytes())),
			expected_hash_hex
		);
	}

	#[test]
	fn should_reject_wrong_length() {
		assert!(Hash160Hasher::from_bytes(&[0; 19]).is_err());
		assert_eq!(
			Hash160Hasher::from_bytes(&[0; 20]).unwrap(),
			Hash160Hasher::zeroes()
		);
	}
}

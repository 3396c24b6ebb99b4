//! SHA-512/256, the digest Stacks uses for transaction ids and sighashes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};

use crate::crypto::{Hasher, Hashing};

pub(crate) const SHA512_256_LENGTH: usize = 32;

#[derive(
	Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
)]
/// The Sha512/256 hashing type
pub struct Sha512Trunc256Hashing([u8; SHA512_256_LENGTH]);

impl Hashing<SHA512_256_LENGTH> for Sha512Trunc256Hashing {
	fn hash(data: &[u8]) -> Self {
		Self(Sha512_256::digest(data).into())
	}

	fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	fn from_array(bytes: [u8; SHA512_256_LENGTH]) -> Self {
		Self(bytes)
	}
}

/// The Sha512/256 hasher type
pub type Sha512Trunc256Hasher =
	Hasher<Sha512Trunc256Hashing, SHA512_256_LENGTH>;

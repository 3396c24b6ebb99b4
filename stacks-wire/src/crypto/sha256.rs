use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::crypto::{Hasher, Hashing};

pub(crate) const SHA256_LENGTH: usize = 32;

#[derive(
	Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
)]
/// The Sha256 hashing type
pub struct Sha256Hashing([u8; SHA256_LENGTH]);

impl Hashing<SHA256_LENGTH> for Sha256Hashing {
	fn hash(data: &[u8]) -> Self {
		Self(Sha256::digest(data).into())
	}

	fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	fn from_array(bytes: [u8; SHA256_LENGTH]) -> Self {
		Self(bytes)
	}
}

#[derive(
	Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
)]
/// The DoubleSha256 hashing type
pub struct DoubleSha256Hashing(Sha256Hashing);

impl Hashing<SHA256_LENGTH> for DoubleSha256Hashing {
	fn hash(data: &[u8]) -> Self {
		Self(Sha256Hashing::hash(Sha256Hashing::hash(data).as_bytes()))
	}

	fn as_bytes(&self) -> &[u8] {
		self.0.as_bytes()
	}

	fn from_array(bytes: [u8; SHA256_LENGTH]) -> Self {
		Self(Sha256Hashing::from_array(bytes))
	}
}

/// The Sha256 hasher type
pub type Sha256Hasher = Hasher<Sha256Hashing, SHA256_LENGTH>;
/// The DoubleSha256 hasher type
pub type DoubleSha256Hasher = Hasher<DoubleSha256Hashing, SHA256_LENGTH>;

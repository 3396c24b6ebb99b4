//! Hashing, keys and signatures.

pub use bitcoin::secp256k1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{StacksError, StacksResult};

/// Module for hash160 hashing
pub mod hash160;
/// Module for private and public keys
pub mod keys;
/// Module for sha256 hashing
pub mod sha256;
/// Module for sha512/256 hashing
pub mod sha512_256;
/// Module for recoverable signatures
pub mod signature;
/// Module for WIF private key encoding
pub mod wif;

const CHECKSUM_LENGTH: usize = 4;

/// Errors from key handling, signing and recovery
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
	/// Private key bytes do not form a valid key
	#[error("Invalid private key: {0}")]
	InvalidPrivateKey(&'static str),
	/// Public key bytes are not a valid curve point encoding
	#[error("Invalid public key point")]
	InvalidPoint,
	/// Message hash is not 32 bytes
	#[error("Message hash must be 32 bytes, got {0}")]
	InvalidMessageHash(usize),
	/// Signature bytes are malformed
	#[error("Invalid signature: {0}")]
	InvalidSignature(&'static str),
	/// The signer produced no usable recovery id
	#[error("Signature has no recovery id")]
	NoRecoveryId,
	/// The public key could not be recovered
	#[error("Could not recover public key from signature")]
	RecoveryFailed,
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct Hex(String);

/// Hashing algorithm with a fixed digest length
pub trait Hashing<const LENGTH: usize>: Clone + Sized {
	/// Hash the given data
	fn hash(data: &[u8]) -> Self;
	/// Get the hash as bytes
	fn as_bytes(&self) -> &[u8];
	/// Wrap an existing digest
	fn from_array(bytes: [u8; LENGTH]) -> Self;

	/// Wrap an existing digest given as a slice
	fn from_bytes(bytes: &[u8]) -> StacksResult<Self> {
		Ok(Self::from_array(bytes.try_into()?))
	}

	/// Hash the given value
	fn new(value: impl AsRef<[u8]>) -> Self {
		Self::hash(value.as_ref())
	}

	/// All-zero digest
	fn zeroes() -> Self {
		Self::from_array([0; LENGTH])
	}

	/// First four bytes of the digest
	fn checksum(&self) -> [u8; CHECKSUM_LENGTH] {
		let mut buffer = [0; CHECKSUM_LENGTH];
		buffer.copy_from_slice(&self.as_bytes()[..CHECKSUM_LENGTH]);

		buffer
	}

	/// Parse a digest from hex
	fn from_hex(data: impl AsRef<str>) -> StacksResult<Self> {
		Self::from_bytes(&hex::decode(data.as_ref().as_bytes())?)
	}

	/// Hex encoding of the digest
	fn to_hex(&self) -> String {
		hex::encode(self.as_bytes())
	}
}

#[derive(
	Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
)]
#[serde(try_from = "Hex")]
#[serde(into = "Hex")]
/// Hasher type
pub struct Hasher<T, const LENGTH: usize>(T)
where
	T: Hashing<LENGTH>;

impl<T, const LENGTH: usize> Hashing<LENGTH> for Hasher<T, LENGTH>
where
	T: Hashing<LENGTH>,
{
	fn hash(data: &[u8]) -> Self {
		Self(T::hash(data))
	}

	fn as_bytes(&self) -> &[u8] {
		T::as_bytes(&self.0)
	}

	fn from_array(bytes: [u8; LENGTH]) -> Self {
		Self(T::from_array(bytes))
	}
}

impl<T, const LENGTH: usize> AsRef<[u8]> for Hasher<T, LENGTH>
where
	T: Hashing<LENGTH>,
{
	fn as_ref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl<T, const LENGTH: usize> TryFrom<&[u8]> for Hasher<T, LENGTH>
where
	T: Hashing<LENGTH>,
{
	type Error = StacksError;

	fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
		Self::from_bytes(value)
	}
}

impl<T, const LENGTH: usize> From<[u8; LENGTH]> for Hasher<T, LENGTH>
where
	T: Hashing<LENGTH>,
{
	fn from(value: [u8; LENGTH]) -> Self {
		Self::from_array(value)
	}
}

impl<T, const LENGTH: usize> Default for Hasher<T, LENGTH>
where
	T: Hashing<LENGTH>,
{
	fn default() -> Self {
		Self::zeroes()
	}
}

// From conversion is fallible for this type
#[allow(clippy::from_over_into)]
impl<T, const LENGTH: usize> Into<Hex> for Hasher<T, LENGTH>
where
	T: Hashing<LENGTH>,
{
	fn into(self) -> Hex {
		Hex(hex::encode(self.as_bytes()))
	}
}

impl<T, const LENGTH: usize> TryFrom<Hex> for Hasher<T, LENGTH>
where
	T: Hashing<LENGTH>,
{
	type Error = StacksError;

	fn try_from(value: Hex) -> Result<Self, Self::Error> {
		Self::from_bytes(&hex::decode(value.0)?)
	}
}

/*!
Private and public key normalization.

A private key is 32 bytes, optionally followed by a `0x01` marker telling
that its public key is used in compressed form. Only the first 32 bytes take
part in curve arithmetic.
*/
use std::{fmt, str::FromStr};

use rand::thread_rng;

use super::{
	hash160::Hash160Hasher,
	secp256k1::{PublicKey, Secp256k1, SecretKey, Signing},
	CryptoError, Hashing,
};
use crate::{
	address::{AddressHashMode, AddressVersion, StacksAddress},
	Network, StacksError, StacksResult,
};

/// Length of a raw private key
pub const PRIVATE_KEY_LENGTH: usize = 32;
/// Length of a private key carrying the compression marker
pub const PRIVATE_KEY_COMPRESSED_LENGTH: usize = 33;
/// Marker byte appended to compressed private keys
pub const PRIVATE_KEY_COMPRESSED_MARKER: u8 = 0x01;
/// Length of a compressed public key
pub const PUBLIC_KEY_COMPRESSED_LENGTH: usize = 33;
/// Length of an uncompressed public key
pub const PUBLIC_KEY_UNCOMPRESSED_LENGTH: usize = 65;

/// A secp256k1 private key with its compression flag
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StacksPrivateKey {
	key: SecretKey,
	compressed: bool,
}

impl StacksPrivateKey {
	/// Wrap a secret key
	pub fn new(key: SecretKey, compressed: bool) -> Self {
		Self { key, compressed }
	}

	/// Generate a random key
	pub fn random(compressed: bool) -> Self {
		Self::new(SecretKey::new(&mut thread_rng()), compressed)
	}

	/// Parse 32 raw bytes, or 33 bytes ending with the compression marker
	pub fn from_bytes(bytes: impl AsRef<[u8]>) -> StacksResult<Self> {
		let bytes = bytes.as_ref();

		let compressed = match bytes.len() {
			PRIVATE_KEY_LENGTH => false,
			PRIVATE_KEY_COMPRESSED_LENGTH => {
				if bytes[PRIVATE_KEY_LENGTH] != PRIVATE_KEY_COMPRESSED_MARKER {
					return Err(CryptoError::InvalidPrivateKey(
						"Compression marker must be 0x01",
					)
					.into());
				}

				true
			}
			_ => {
				return Err(CryptoError::InvalidPrivateKey(
					"Private key must be 32 or 33 bytes",
				)
				.into())
			}
		};

		let key = SecretKey::from_slice(&bytes[..PRIVATE_KEY_LENGTH]).map_err(
			|_| CryptoError::InvalidPrivateKey("Key is not a valid scalar"),
		)?;

		Ok(Self::new(key, compressed))
	}

	/// Parse a hex encoded key
	pub fn from_hex(data: impl AsRef<str>) -> StacksResult<Self> {
		Self::from_bytes(hex::decode(data.as_ref())?)
	}

	/// Key bytes, with the marker when compressed
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut bytes = self.key.secret_bytes().to_vec();

		if self.compressed {
			bytes.push(PRIVATE_KEY_COMPRESSED_MARKER);
		}

		bytes
	}

	/// Hex encoding of [Self::to_bytes]
	pub fn to_hex(&self) -> String {
		hex::encode(self.to_bytes())
	}

	/// Whether the public key is used in compressed form
	pub fn is_compressed(&self) -> bool {
		self.compressed
	}

	/// The underlying secret key
	pub fn secret_key(&self) -> &SecretKey {
		&self.key
	}

	/// Derive the public key, compressed as the private key says
	pub fn public_key<C: Signing>(&self, secp: &Secp256k1<C>) -> StacksPublicKey {
		StacksPublicKey::new(
			PublicKey::from_secret_key(secp, &self.key),
			self.compressed,
		)
	}

	/// Single signature address of this key on the given network
	pub fn address<C: Signing>(
		&self,
		secp: &Secp256k1<C>,
		network: Network,
	) -> StacksAddress {
		self.public_key(secp).address_for(network)
	}
}

impl fmt::Debug for StacksPrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StacksPrivateKey")
			.field("key", &"<redacted>")
			.field("compressed", &self.compressed)
			.finish()
	}
}

impl FromStr for StacksPrivateKey {
	type Err = StacksError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_hex(s)
	}
}

/// A secp256k1 public key with its serialized form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StacksPublicKey {
	key: PublicKey,
	compressed: bool,
}

impl StacksPublicKey {
	/// Wrap a public key
	pub fn new(key: PublicKey, compressed: bool) -> Self {
		Self { key, compressed }
	}

	/// Parse a 33 byte compressed or 65 byte uncompressed key
	pub fn from_bytes(bytes: impl AsRef<[u8]>) -> StacksResult<Self> {
		let bytes = bytes.as_ref();

		let compressed = match (bytes.len(), bytes.first()) {
			(PUBLIC_KEY_COMPRESSED_LENGTH, Some(0x02 | 0x03)) => true,
			(PUBLIC_KEY_UNCOMPRESSED_LENGTH, Some(0x04)) => false,
			_ => return Err(CryptoError::InvalidPoint.into()),
		};

		let key =
			PublicKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPoint)?;

		Ok(Self::new(key, compressed))
	}

	/// Parse a hex encoded key
	pub fn from_hex(data: impl AsRef<str>) -> StacksResult<Self> {
		Self::from_bytes(hex::decode(data.as_ref())?)
	}

	/// Serialized key in its own form
	pub fn to_bytes(&self) -> Vec<u8> {
		if self.compressed {
			self.key.serialize().to_vec()
		} else {
			self.key.serialize_uncompressed().to_vec()
		}
	}

	/// Hex encoding of [Self::to_bytes]
	pub fn to_hex(&self) -> String {
		hex::encode(self.to_bytes())
	}

	/// Whether the key serializes in compressed form
	pub fn is_compressed(&self) -> bool {
		self.compressed
	}

	/// Same point, compressed form
	pub fn compress(&self) -> Self {
		Self::new(self.key, true)
	}

	/// Same point, uncompressed form
	pub fn uncompress(&self) -> Self {
		Self::new(self.key, false)
	}

	/// The underlying curve point
	pub fn inner(&self) -> &PublicKey {
		&self.key
	}

	/// Hash160 of the serialized key
	pub fn hash160(&self) -> Hash160Hasher {
		Hash160Hasher::new(self.to_bytes())
	}

	/// Pay to public key hash address with the given version
	pub fn to_address(&self, version: AddressVersion) -> StacksAddress {
		StacksAddress::p2pkh(version, self)
	}

	/// Single signature address on the given network
	pub fn address_for(&self, network: Network) -> StacksAddress {
		self.to_address(AddressHashMode::SerializeP2PKH.address_version(network))
	}
}

impl FromStr for StacksPublicKey {
	type Err = StacksError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_hex(s)
	}
}

/// Re-encode a public key in compressed form
pub fn compress_public_key(bytes: impl AsRef<[u8]>) -> StacksResult<Vec<u8>> {
	Ok(StacksPublicKey::from_bytes(bytes)?.compress().to_bytes())
}

/// Re-encode a public key in uncompressed form
pub fn uncompress_public_key(bytes: impl AsRef<[u8]>) -> StacksResult<Vec<u8>> {
	Ok(StacksPublicKey::from_bytes(bytes)?.uncompress().to_bytes())
}

/// Address of the public key derived from a hex private key
pub fn get_address_from_private_key(
	private_key: impl AsRef<str>,
	network: Network,
) -> StacksResult<StacksAddress> {
	let secp = Secp256k1::signing_only();

	Ok(StacksPrivateKey::from_hex(private_key)?.address(&secp, network))
}

#[cfg(test)]
mod tests {
	use super::*;

	const PRIVATE_KEY_HEX: &str =
		"edf9aee84d9b7abc145504dde6726c64f369d37ee34ded868fabd876c26570bc01";

	#[test]
	fn should_detect_compression_from_length() {
		let compressed = StacksPrivateKey::from_hex(PRIVATE_KEY_HEX).unwrap();
		let uncompressed =
			StacksPrivateKey::from_hex(&PRIVATE_KEY_HEX[..64]).unwrap();

		assert!(compressed.is_compressed());
		assert!(!uncompressed.is_compressed());
		assert_eq!(compressed.to_hex(), PRIVATE_KEY_HEX);
		assert_eq!(compressed.secret_key(), uncompressed.secret_key());
	}

	#[test]
	fn should_reject_bad_private_keys() {
		let bad_marker = format!("{}02", &PRIVATE_KEY_HEX[..64]);

		assert!(StacksPrivateKey::from_hex(bad_marker).is_err());
		assert!(StacksPrivateKey::from_hex("00".repeat(32)).is_err());
		assert!(StacksPrivateKey::from_hex("01".repeat(31)).is_err());
	}

	#[test]
	fn should_derive_public_key_with_private_key_compression() {
		let secp = Secp256k1::new();
		let compressed = StacksPrivateKey::from_hex(PRIVATE_KEY_HEX).unwrap();
		let uncompressed =
			StacksPrivateKey::from_hex(&PRIVATE_KEY_HEX[..64]).unwrap();

		let compressed_public = compressed.public_key(&secp);
		let uncompressed_public = uncompressed.public_key(&secp);

		assert_eq!(compressed_public.to_bytes().len(), 33);
		assert_eq!(uncompressed_public.to_bytes().len(), 65);
		assert_eq!(uncompressed_public.compress(), compressed_public);
		assert_eq!(compressed_public.uncompress(), uncompressed_public);
	}

	#[test]
	fn should_convert_between_point_forms() {
		let compressed_hex =
			"03556902f83defc6c63a7eb56a2d8ee4baee109f2126aac41e4f9e3a0835f34bc5";

		let uncompressed = uncompress_public_key(hex::decode(compressed_hex).unwrap())
			.unwrap();

		assert_eq!(uncompressed.len(), 65);
		assert_eq!(uncompressed[0], 0x04);
		assert_eq!(
			hex::encode(compress_public_key(&uncompressed).unwrap()),
			compressed_hex
		);
	}

	#[test]
	fn should_reject_invalid_points() {
		let mut not_on_curve = vec![0x02];
		not_on_curve.extend([0xff; 32]);

		for bytes in [vec![0x04; 33], vec![0x02; 65], not_on_curve, vec![]] {
			assert!(matches!(
				StacksPublicKey::from_bytes(bytes),
				Err(StacksError::CryptoError(CryptoError::InvalidPoint))
			));
		}
	}

	#[test]
	fn should_derive_same_address_as_public_key() {
		let secp = Secp256k1::new();

		for _ in 0..10 {
			let key = StacksPrivateKey::random(true);
			let address = get_address_from_private_key(
				key.to_hex(),
				Network::Testnet,
			)
			.unwrap();

			assert_eq!(
				address,
				key.public_key(&secp).address_for(Network::Testnet)
			);
			assert_eq!(
				address.address_version(),
				Some(AddressVersion::TestnetSingleSig)
			);
			assert_eq!(address.hash(), &key.public_key(&secp).hash160());
		}
	}
}

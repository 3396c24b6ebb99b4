/*!
Recoverable ECDSA signatures.

Stacks transactions carry signatures as 65 bytes with the recovery id first
(VRS). Other tooling uses the recovery id last (RSV). Both orders hold the
same compact signature and convert by reordering bytes only.
*/
use std::io;

use super::{
	keys::{StacksPrivateKey, StacksPublicKey},
	secp256k1::{
		ecdsa::{RecoverableSignature, RecoveryId},
		Message, Secp256k1, Signing, Verification,
	},
	sha256::SHA256_LENGTH,
	CryptoError,
};
use crate::{
	codec::{BytesReader, Codec, CodecResult},
	StacksResult,
};

/// Length of a recoverable signature in either byte order
pub const RECOVERABLE_SIGNATURE_LENGTH: usize = 65;

const COMPACT_SIGNATURE_LENGTH: usize = 64;

fn message_from_hash(message_hash: &[u8]) -> StacksResult<Message> {
	if message_hash.len() != SHA256_LENGTH {
		return Err(CryptoError::InvalidMessageHash(message_hash.len()).into());
	}

	Message::from_slice(message_hash)
		.map_err(|_| CryptoError::InvalidMessageHash(message_hash.len()).into())
}

/// Recoverable signature with the recovery id first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrsSignature([u8; RECOVERABLE_SIGNATURE_LENGTH]);

/// Recoverable signature with the recovery id last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsvSignature([u8; RECOVERABLE_SIGNATURE_LENGTH]);

impl VrsSignature {
	/// Wrap raw bytes
	pub fn new(bytes: [u8; RECOVERABLE_SIGNATURE_LENGTH]) -> Self {
		Self(bytes)
	}

	/// Wrap a byte slice of the right length
	pub fn from_bytes(bytes: impl AsRef<[u8]>) -> StacksResult<Self> {
		Ok(Self(bytes.as_ref().try_into()?))
	}

	/// Parse hex
	pub fn from_hex(data: impl AsRef<str>) -> StacksResult<Self> {
		Self::from_bytes(hex::decode(data.as_ref())?)
	}

	/// Hex encoding
	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}

	/// Raw bytes
	pub fn as_bytes(&self) -> &[u8; RECOVERABLE_SIGNATURE_LENGTH] {
		&self.0
	}

	/// Recovery id byte
	pub fn recovery_id(&self) -> u8 {
		self.0[0]
	}

	/// Reorder into RSV
	pub fn to_rsv(&self) -> RsvSignature {
		let mut bytes = [0u8; RECOVERABLE_SIGNATURE_LENGTH];
		bytes[..COMPACT_SIGNATURE_LENGTH].copy_from_slice(&self.0[1..]);
		bytes[COMPACT_SIGNATURE_LENGTH] = self.0[0];

		RsvSignature(bytes)
	}

	/// Encode a secp256k1 recoverable signature
	pub fn from_recoverable(
		signature: &RecoverableSignature,
	) -> StacksResult<Self> {
		let (id, compact) = signature.serialize_compact();
		let id: u8 = id
			.to_i32()
			.try_into()
			.map_err(|_| CryptoError::NoRecoveryId)?;

		let mut bytes = [0u8; RECOVERABLE_SIGNATURE_LENGTH];
		bytes[0] = id;
		bytes[1..].copy_from_slice(&compact);

		Ok(Self(bytes))
	}

	/// Decode into a secp256k1 recoverable signature
	pub fn to_recoverable(&self) -> StacksResult<RecoverableSignature> {
		let id = RecoveryId::from_i32(self.0[0] as i32)
			.map_err(|_| CryptoError::InvalidSignature("Bad recovery id"))?;

		RecoverableSignature::from_compact(&self.0[1..], id)
			.map_err(|_| CryptoError::InvalidSignature("Bad r or s").into())
	}
}

impl RsvSignature {
	/// Wrap raw bytes
	pub fn new(bytes: [u8; RECOVERABLE_SIGNATURE_LENGTH]) -> Self {
		Self(bytes)
	}

	/// Wrap a byte slice of the right length
	pub fn from_bytes(bytes: impl AsRef<[u8]>) -> StacksResult<Self> {
		Ok(Self(bytes.as_ref().try_into()?))
	}

	/// Parse hex
	pub fn from_hex(data: impl AsRef<str>) -> StacksResult<Self> {
		Self::from_bytes(hex::decode(data.as_ref())?)
	}

	/// Hex encoding
	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}

	/// Raw bytes
	pub fn as_bytes(&self) -> &[u8; RECOVERABLE_SIGNATURE_LENGTH] {
		&self.0
	}

	/// Recovery id byte
	pub fn recovery_id(&self) -> u8 {
		self.0[COMPACT_SIGNATURE_LENGTH]
	}

	/// Reorder into VRS
	pub fn to_vrs(&self) -> VrsSignature {
		let mut bytes = [0u8; RECOVERABLE_SIGNATURE_LENGTH];
		bytes[0] = self.0[COMPACT_SIGNATURE_LENGTH];
		bytes[1..].copy_from_slice(&self.0[..COMPACT_SIGNATURE_LENGTH]);

		VrsSignature(bytes)
	}
}

impl From<RsvSignature> for VrsSignature {
	fn from(value: RsvSignature) -> Self {
		value.to_vrs()
	}
}

impl From<VrsSignature> for RsvSignature {
	fn from(value: VrsSignature) -> Self {
		value.to_rsv()
	}
}

impl Codec for VrsSignature {
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()> {
		dest.write_all(&self.0)
	}

	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized,
	{
		Ok(Self(data.read_array()?))
	}
}

/// Sign a 32 byte digest. The nonce is derived with RFC 6979 and the
/// signature is normalized to low S.
pub fn sign_message_hash<C: Signing>(
	secp: &Secp256k1<C>,
	message_hash: impl AsRef<[u8]>,
	private_key: &StacksPrivateKey,
) -> StacksResult<VrsSignature> {
	let message = message_from_hash(message_hash.as_ref())?;
	let signature =
		secp.sign_ecdsa_recoverable(&message, private_key.secret_key());

	VrsSignature::from_recoverable(&signature)
}

/// Sign a 32 byte digest, mixing extra data into the RFC 6979 nonce. The
/// recovery id is found by recovering against the signer's own key.
pub fn sign_message_hash_with_nonce_data<C: Signing + Verification>(
	secp: &Secp256k1<C>,
	message_hash: impl AsRef<[u8]>,
	private_key: &StacksPrivateKey,
	nonce_data: &[u8; 32],
) -> StacksResult<VrsSignature> {
	let message = message_from_hash(message_hash.as_ref())?;
	let compact = secp
		.sign_ecdsa_with_noncedata(
			&message,
			private_key.secret_key(),
			nonce_data,
		)
		.serialize_compact();
	let public_key = private_key.public_key(secp);

	for id in 0..4 {
		let Ok(recovery_id) = RecoveryId::from_i32(id) else {
			continue;
		};
		let Ok(signature) =
			RecoverableSignature::from_compact(&compact, recovery_id)
		else {
			continue;
		};

		if secp
			.recover_ecdsa(&message, &signature)
			.is_ok_and(|key| &key == public_key.inner())
		{
			return VrsSignature::from_recoverable(&signature);
		}
	}

	Err(CryptoError::NoRecoveryId.into())
}

/// Recover the signer key of a digest, in the requested form
pub fn recover_public_key<C: Verification>(
	secp: &Secp256k1<C>,
	message_hash: impl AsRef<[u8]>,
	signature: &VrsSignature,
	compressed: bool,
) -> StacksResult<StacksPublicKey> {
	let message = message_from_hash(message_hash.as_ref())?;
	let signature = signature
		.to_recoverable()
		.map_err(|_| CryptoError::RecoveryFailed)?;

	let key = secp
		.recover_ecdsa(&message, &signature)
		.map_err(|_| CryptoError::RecoveryFailed)?;

	Ok(StacksPublicKey::new(key, compressed))
}

/// Check a signature over a digest against a public key
pub fn verify_message_hash<C: Verification>(
	secp: &Secp256k1<C>,
	message_hash: impl AsRef<[u8]>,
	signature: &VrsSignature,
	public_key: &StacksPublicKey,
) -> StacksResult<bool> {
	let message = message_from_hash(message_hash.as_ref())?;
	let signature = signature.to_recoverable()?.to_standard();

	Ok(secp
		.verify_ecdsa(&message, &signature, public_key.inner())
		.is_ok())
}

#[cfg(test)]
mod tests {
	use rand::{thread_rng, Rng};

	use super::*;
	use crate::{crypto::secp256k1::SecretKey, StacksError};

	const SECRET_KEY_HEX: &str =
		"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
	const MESSAGE_HASH_HEX: &str =
		"1bf9ad7ce49adf6cbc707a689b6e17653151e95c1cd8a53f9fce54d3d51a2a24";
	const EXPECTED_VRS_HEX: &str = "0119874ebfb457c08cedb5ebf01fe13bf4b6ac216b6f4044763ad95a69022bf1ba3cdba26d7ebb695a7144c8de4ba672dddfc602ffa9e62a745d8f7e4206ae6a93";

	#[test]
	fn should_sign_deterministically() {
		let secp = Secp256k1::new();
		let key = StacksPrivateKey::from_hex(SECRET_KEY_HEX).unwrap();
		let hash = hex::decode(MESSAGE_HASH_HEX).unwrap();

		let first = sign_message_hash(&secp, &hash, &key).unwrap();
		let second = sign_message_hash(&secp, &hash, &key).unwrap();

		assert_eq!(first.to_hex(), EXPECTED_VRS_HEX);
		assert_eq!(first, second);
	}

	#[test]
	fn should_recover_signer() {
		let secp = Secp256k1::new();
		let hash = hex::decode(MESSAGE_HASH_HEX).unwrap();

		for compressed in [true, false] {
			let key = StacksPrivateKey::new(
				SecretKey::new(&mut thread_rng()),
				compressed,
			);
			let signature = sign_message_hash(&secp, &hash, &key).unwrap();
			let recovered =
				recover_public_key(&secp, &hash, &signature, compressed)
					.unwrap();

			assert_eq!(recovered, key.public_key(&secp));
			assert!(verify_message_hash(&secp, &hash, &signature, &recovered)
				.unwrap());
		}
	}

	#[test]
	fn should_roundtrip_byte_orders() {
		let secp = Secp256k1::new();
		let mut rng = thread_rng();

		for _ in 0..100 {
			let key = StacksPrivateKey::random(true);
			let hash: [u8; 32] = rng.gen();

			let vrs = sign_message_hash(&secp, hash, &key).unwrap();
			let rsv = vrs.to_rsv();

			assert_eq!(rsv.recovery_id(), vrs.recovery_id());
			assert_eq!(&rsv.as_bytes()[..64], &vrs.as_bytes()[1..]);
			assert_eq!(rsv.to_vrs(), vrs);
			assert_eq!(VrsSignature::from(RsvSignature::from(vrs)), vrs);
		}
	}

	#[test]
	fn should_fail_recovery_with_bad_id() {
		let secp = Secp256k1::new();
		let hash = hex::decode(MESSAGE_HASH_HEX).unwrap();
		let mut bytes = hex::decode(EXPECTED_VRS_HEX).unwrap();
		bytes[0] = 4;

		let signature = VrsSignature::from_bytes(bytes).unwrap();

		assert!(matches!(
			recover_public_key(&secp, &hash, &signature, true),
			Err(StacksError::CryptoError(CryptoError::RecoveryFailed))
		));
	}

	#[test]
	fn should_fail_recovery_with_non_ecdsa_bytes() {
		let secp = Secp256k1::new();
		let hash = hex::decode(MESSAGE_HASH_HEX).unwrap();
		let mut bytes = [255u8; RECOVERABLE_SIGNATURE_LENGTH];
		bytes[0] = 1;

		assert!(matches!(
			recover_public_key(&secp, &hash, &VrsSignature::new(bytes), true),
			Err(StacksError::CryptoError(CryptoError::RecoveryFailed))
		));
	}

	#[test]
	fn should_reject_short_digest() {
		let secp = Secp256k1::new();
		let key = StacksPrivateKey::from_hex(SECRET_KEY_HEX).unwrap();

		assert!(matches!(
			sign_message_hash(&secp, [0u8; 31], &key),
			Err(StacksError::CryptoError(CryptoError::InvalidMessageHash(31)))
		));
	}

	#[test]
	fn should_use_nonce_data() {
		let secp = Secp256k1::new();
		let key = StacksPrivateKey::from_hex(SECRET_KEY_HEX).unwrap();
		let hash = hex::decode(MESSAGE_HASH_HEX).unwrap();

		let plain = sign_message_hash(&secp, &hash, &key).unwrap();
		let with_data =
			sign_message_hash_with_nonce_data(&secp, &hash, &key, &[7; 32])
				.unwrap();

		assert_ne!(plain, with_data);
		assert_eq!(
			recover_public_key(&secp, &hash, &with_data, true).unwrap(),
			key.public_key(&secp)
		);
	}
}

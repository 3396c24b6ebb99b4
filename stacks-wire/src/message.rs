/*!
Signing of arbitrary messages.

A message is framed as the length prefixed domain prefix, a Bitcoin
CompactSize length and the message bytes. The frame is hashed with a single
sha256 and the digest signed like any other.
*/
use bitcoin::{
	consensus::encode::{deserialize_partial, serialize, VarInt},
	secp256k1::{Secp256k1, Signing, Verification},
};

use crate::{
	crypto::{
		sha256::Sha256Hasher,
		signature::{
			recover_public_key, sign_message_hash, verify_message_hash,
			VrsSignature,
		},
		Hashing,
	},
	StacksError, StacksPrivateKey, StacksPublicKey, StacksResult,
};

/// Domain prefix for message signing, preceded by its length
pub const STACKS_MESSAGE_PREFIX: &[u8] = b"\x18Stacks Message Signing:\n";

/// Prefix used by wallets for structured signing requests
pub const STACKS_WALLET_MESSAGE_PREFIX: &[u8] = b"\x17Stacks Signed Message:\n";

/// Frame a message with the default prefix
pub fn encode_message(message: impl AsRef<[u8]>) -> Vec<u8> {
	encode_message_with_prefix(STACKS_MESSAGE_PREFIX, message)
}

/// Frame a message with the given prefix
pub fn encode_message_with_prefix(
	prefix: &[u8],
	message: impl AsRef<[u8]>,
) -> Vec<u8> {
	let message = message.as_ref();
	let length = serialize(&VarInt(message.len() as u64));

	let mut encoded =
		Vec::with_capacity(prefix.len() + length.len() + message.len());
	encoded.extend_from_slice(prefix);
	encoded.extend_from_slice(&length);
	encoded.extend_from_slice(message);

	encoded
}

/// Recover the message from a frame with the default prefix
pub fn decode_message(encoded: impl AsRef<[u8]>) -> StacksResult<Vec<u8>> {
	decode_message_with_prefix(STACKS_MESSAGE_PREFIX, encoded)
}

/// Recover the message from a frame with the given prefix
pub fn decode_message_with_prefix(
	prefix: &[u8],
	encoded: impl AsRef<[u8]>,
) -> StacksResult<Vec<u8>> {
	let body = encoded.as_ref().strip_prefix(prefix).ok_or_else(|| {
		StacksError::InvalidData("Message does not start with prefix".into())
	})?;

	let (length, consumed) =
		deserialize_partial::<VarInt>(body).map_err(|err| {
			StacksError::InvalidData(format!("Bad message length: {}", err))
		})?;

	let message = &body[consumed..];

	if message.len() as u64 != length.0 {
		return Err(StacksError::InvalidData(format!(
			"Message length {} does not match {} remaining bytes",
			length.0,
			message.len()
		)));
	}

	Ok(message.to_vec())
}

/// Digest that gets signed for a message
pub fn hash_message(message: impl AsRef<[u8]>) -> Sha256Hasher {
	Sha256Hasher::new(encode_message(message))
}

/// Sign a message
pub fn sign_message<C: Signing>(
	secp: &Secp256k1<C>,
	message: impl AsRef<[u8]>,
	private_key: &StacksPrivateKey,
) -> StacksResult<VrsSignature> {
	sign_message_hash(secp, hash_message(message), private_key)
}

/// Check that a message was signed by the given key
pub fn verify_message<C: Verification>(
	secp: &Secp256k1<C>,
	message: impl AsRef<[u8]>,
	signature: &VrsSignature,
	public_key: &StacksPublicKey,
) -> StacksResult<bool> {
	verify_message_hash(secp, hash_message(message), signature, public_key)
}

/// Recover the signer of a message
pub fn recover_message_signer<C: Verification>(
	secp: &Secp256k1<C>,
	message: impl AsRef<[u8]>,
	signature: &VrsSignature,
	compressed: bool,
) -> StacksResult<StacksPublicKey> {
	recover_public_key(secp, hash_message(message), signature, compressed)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_derive_prefix_length() {
		assert_eq!(
			STACKS_MESSAGE_PREFIX[0] as usize,
			STACKS_MESSAGE_PREFIX.len() - 1
		);
		assert_eq!(
			STACKS_WALLET_MESSAGE_PREFIX[0] as usize,
			STACKS_WALLET_MESSAGE_PREFIX.len() - 1
		);
	}

	#[test]
	fn should_roundtrip_messages() {
		for length in [0usize, 1, 128, 252, 253, 300, 70_000] {
			let message: Vec<u8> = (0..length).map(|i| i as u8).collect();
			let encoded = encode_message(&message);

			assert_eq!(decode_message(&encoded).unwrap(), message);
		}
	}

	#[test]
	fn should_use_compact_size_length() {
		let short = encode_message([0u8; 252]);
		let long = encode_message([0u8; 300]);
		let offset = STACKS_MESSAGE_PREFIX.len();

		assert_eq!(short[offset], 252);
		assert_eq!(&long[offset..offset + 3], &[0xfd, 0x2c, 0x01]);
	}

	#[test]
	fn should_reject_wrong_frames() {
		let encoded = encode_message("hello");

		assert!(decode_message(&encoded[..encoded.len() - 1]).is_err());
		assert!(decode_message_with_prefix(
			STACKS_WALLET_MESSAGE_PREFIX,
			&encoded
		)
		.is_err());
	}

	#[test]
	fn should_hash_framed_message() {
		let expected = Sha256Hasher::new(
			b"\x18Stacks Message Signing:\n\x05hello".as_slice(),
		);

		assert_eq!(hash_message("hello"), expected);
	}

	#[test]
	fn should_sign_and_verify_messages() {
		let secp = Secp256k1::new();
		let key = StacksPrivateKey::random(true);
		let public_key = key.public_key(&secp);

		let signature = sign_message(&secp, "hello world", &key).unwrap();

		assert!(verify_message(&secp, "hello world", &signature, &public_key)
			.unwrap());
		assert!(!verify_message(&secp, "hello", &signature, &public_key)
			.unwrap());
		assert_eq!(
			recover_message_signer(&secp, "hello world", &signature, true)
				.unwrap(),
			public_key
		);
	}
}

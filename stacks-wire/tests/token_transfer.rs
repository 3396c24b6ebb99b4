use stacks_wire::{
	codec::Codec,
	crypto::{
		secp256k1::Secp256k1,
		sha512_256::Sha512Trunc256Hasher,
		signature::{recover_public_key, sign_message_hash},
		Hashing,
	},
	transaction::TransactionPayload,
	Network, StacksPrivateKey,
};

const PRIVATE_KEY: &str =
	"edf9aee84d9b7abc145504dde6726c64f369d37ee34ded868fabd876c26570bc01";
const RECIPIENT: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";

#[test]
fn token_transfer_serializes_signs_and_recovers() -> anyhow::Result<()> {
	let secp = Secp256k1::new();
	let private_key = StacksPrivateKey::from_hex(PRIVATE_KEY)?;

	let payload = TransactionPayload::token_transfer(RECIPIENT, 1_000_000, "")?;
	let bytes = payload.serialize_to_vec();

	let expected = format!(
		"{}{}{}{}{}",
		"00",
		"0516",
		"a46ff88886c2ef9762d970b4d2c63678835bd39d",
		"00000000000f4240",
		"00".repeat(34)
	);
	assert_eq!(hex::encode(&bytes), expected);
	assert_eq!(TransactionPayload::deserialize(&bytes)?, payload);

	let digest = Sha512Trunc256Hasher::new(&bytes);
	let signature = sign_message_hash(&secp, digest, &private_key)?;

	// Signing is deterministic
	assert_eq!(signature, sign_message_hash(&secp, digest, &private_key)?);

	let recovered = recover_public_key(
		&secp,
		digest,
		&signature,
		private_key.is_compressed(),
	)?;

	assert_eq!(recovered, private_key.public_key(&secp));
	assert_eq!(
		recovered.address_for(Network::Mainnet),
		private_key.address(&secp, Network::Mainnet)
	);

	Ok(())
}

#[test]
fn signature_orders_convert_losslessly() -> anyhow::Result<()> {
	let secp = Secp256k1::new();
	let private_key = StacksPrivateKey::from_hex(PRIVATE_KEY)?;
	let payload = TransactionPayload::token_transfer(RECIPIENT, 1, "memo")?;
	let digest = Sha512Trunc256Hasher::new(payload.serialize_to_vec());

	let vrs = sign_message_hash(&secp, digest, &private_key)?;
	let rsv = vrs.to_rsv();

	assert_eq!(rsv.to_vrs(), vrs);
	assert_eq!(&rsv.as_bytes()[..64], &vrs.as_bytes()[1..]);
	assert_eq!(rsv.as_bytes()[64], vrs.as_bytes()[0]);

	Ok(())
}

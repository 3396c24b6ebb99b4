use std::{fmt, io, str::FromStr};

use ::bitcoin::blockdata::{opcodes::all::OP_CHECKMULTISIG, script::Builder};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, FromRepr};

use crate::{
	c32::{decode_address, encode_address},
	codec::{BytesReader, Codec, CodecError, CodecResult},
	crypto::{
		hash160::{Hash160Hasher, HASH160_LENGTH},
		sha256::Sha256Hasher,
		Hashing,
	},
	Network, StacksError, StacksPublicKey, StacksResult,
};

/// Module for bitcoin address decoding and encoding
pub mod bitcoin;
/// Module for PoX reward addresses
pub mod pox;

/// Largest address version, the last c32 digit
pub const MAX_ADDRESS_VERSION: u8 = 31;

/// Largest number of keys a multisig script can count with a small integer
/// opcode
pub const MAX_MULTISIG_KEYS: usize = 16;

/// Standard stacks address versions
#[repr(u8)]
#[derive(FromRepr, EnumIter, PartialEq, Eq, Copy, Clone, Debug)]
pub enum AddressVersion {
	/// Mainnet single sig address version
	MainnetSingleSig = 22,
	/// Mainnet multi sig address version
	MainnetMultiSig = 20,
	/// Testnet single sig address version
	TestnetSingleSig = 26,
	/// Testnet multi sig address version
	TestnetMultiSig = 21,
}

impl AddressVersion {
	/// Network the version belongs to
	pub fn network(&self) -> Network {
		match self {
			Self::MainnetSingleSig | Self::MainnetMultiSig => Network::Mainnet,
			Self::TestnetSingleSig | Self::TestnetMultiSig => Network::Testnet,
		}
	}
}

impl TryFrom<u8> for AddressVersion {
	type Error = StacksError;

	fn try_from(value: u8) -> StacksResult<Self> {
		AddressVersion::from_repr(value)
			.ok_or(StacksError::InvalidAddressVersion(value))
	}
}

/// How the hash of a Stacks address is derived from its public keys
#[repr(u8)]
#[derive(FromRepr, EnumIter, PartialEq, Eq, Copy, Clone, Debug)]
pub enum AddressHashMode {
	/// Hash160 of a single public key
	SerializeP2PKH = 0,
	/// Hash160 of a multisig redeem script
	SerializeP2SH = 1,
	/// Hash160 of a P2WPKH witness program
	SerializeP2WPKH = 2,
	/// Hash160 of a P2WSH witness program
	SerializeP2WSH = 3,
}

impl AddressHashMode {
	/// Address version used for this hash mode on the given network
	pub fn address_version(&self, network: Network) -> AddressVersion {
		match (self, network) {
			(Self::SerializeP2PKH, Network::Mainnet) => {
				AddressVersion::MainnetSingleSig
			}
			(Self::SerializeP2PKH, Network::Testnet) => {
				AddressVersion::TestnetSingleSig
			}
			(_, Network::Mainnet) => AddressVersion::MainnetMultiSig,
			(_, Network::Testnet) => AddressVersion::TestnetMultiSig,
		}
	}
}

impl TryFrom<u8> for AddressHashMode {
	type Error = StacksError;

	fn try_from(value: u8) -> StacksResult<Self> {
		AddressHashMode::from_repr(value).ok_or(StacksError::InvalidArguments(
			"Unknown address hash mode",
		))
	}
}

/// A Stacks address.
///
/// Any c32 version up to [MAX_ADDRESS_VERSION] can appear on chain, so the
/// version is kept as a byte. [AddressVersion] names the standard ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StacksAddress {
	version: u8,
	hash: Hash160Hasher,
}

impl StacksAddress {
	/// Create a new Stacks address from the given version and hash
	pub fn new(version: AddressVersion, hash: Hash160Hasher) -> Self {
		Self {
			version: version as u8,
			hash,
		}
	}

	/// Create a Stacks address from a raw version byte
	pub fn from_raw_version(
		version: u8,
		hash: Hash160Hasher,
	) -> StacksResult<Self> {
		if version > MAX_ADDRESS_VERSION {
			return Err(StacksError::InvalidAddressVersion(version));
		}

		Ok(Self { version, hash })
	}

	/// Get the raw address version
	pub fn version(&self) -> u8 {
		self.version
	}

	/// Get the address version if it is one of the standard ones
	pub fn address_version(&self) -> Option<AddressVersion> {
		AddressVersion::from_repr(self.version)
	}

	/// Get the address hash
	pub fn hash(&self) -> &Hash160Hasher {
		&self.hash
	}

	/// Create a new Stacks address with a pay-2-public-key-hash
	pub fn p2pkh(version: AddressVersion, key: &StacksPublicKey) -> Self {
		Self::new(version, hash_p2pkh(key))
	}

	/// Create a new Stacks address with a pay-2-script-hash
	fn p2sh<'a>(
		version: AddressVersion,
		keys: impl IntoIterator<Item = &'a StacksPublicKey>,
		signature_threshold: usize,
	) -> Self {
		Self::new(version, hash_p2sh(keys, signature_threshold))
	}

	/// Create a new Stacks address with a pay-2-witness-public-key-hash
	pub fn p2wpkh(version: AddressVersion, key: &StacksPublicKey) -> Self {
		Self::new(version, hash_p2wpkh(key))
	}

	/// Create a new Stacks address with a pay-2-witness-script-hash
	fn p2wsh<'a>(
		version: AddressVersion,
		keys: impl IntoIterator<Item = &'a StacksPublicKey>,
		signature_threshold: usize,
	) -> Self {
		Self::new(version, hash_p2wsh(keys, signature_threshold))
	}

	/// Derive an address from public keys with the given hash mode.
	///
	/// Single key modes require exactly one key and a threshold of one.
	pub fn from_public_keys(
		version: AddressVersion,
		hash_mode: AddressHashMode,
		keys: &[StacksPublicKey],
		signature_threshold: usize,
	) -> StacksResult<Self> {
		if keys.len() > MAX_MULTISIG_KEYS {
			return Err(StacksError::InvalidArguments(
				"Multisig scripts take at most 16 keys",
			));
		}

		if signature_threshold == 0 || signature_threshold > keys.len() {
			return Err(StacksError::InvalidArguments(
				"Signature threshold must be between 1 and the number of keys",
			));
		}

		match hash_mode {
			AddressHashMode::SerializeP2PKH
			| AddressHashMode::SerializeP2WPKH
				if keys.len() != 1 =>
			{
				Err(StacksError::InvalidArguments(
					"Single signature hash modes take exactly one key",
				))
			}
			AddressHashMode::SerializeP2WPKH if !keys[0].is_compressed() => {
				Err(StacksError::InvalidArguments(
					"Witness hash modes require compressed keys",
				))
			}
			AddressHashMode::SerializeP2WSH
				if keys.iter().any(|key| !key.is_compressed()) =>
			{
				Err(StacksError::InvalidArguments(
					"Witness hash modes require compressed keys",
				))
			}
			AddressHashMode::SerializeP2PKH => Ok(Self::p2pkh(version, &keys[0])),
			AddressHashMode::SerializeP2WPKH => {
				Ok(Self::p2wpkh(version, &keys[0]))
			}
			AddressHashMode::SerializeP2SH => {
				Ok(Self::p2sh(version, keys, signature_threshold))
			}
			AddressHashMode::SerializeP2WSH => {
				Ok(Self::p2wsh(version, keys, signature_threshold))
			}
		}
	}
}

impl Codec for StacksAddress {
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()> {
		dest.write_all(&[self.version])?;
		dest.write_all(self.hash.as_ref())
	}

	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized,
	{
		let version = data.read_u8()?;

		if version > MAX_ADDRESS_VERSION {
			return Err(CodecError::UnknownTag {
				kind: "address version",
				tag: version,
			});
		}

		let hash = Hash160Hasher::from_array(data.read_array()?);

		Ok(Self { version, hash })
	}
}

impl From<StacksAddress> for String {
	fn from(address: StacksAddress) -> Self {
		address.to_string()
	}
}

impl TryFrom<&str> for StacksAddress {
	type Error = StacksError;

	fn try_from(address: &str) -> Result<Self, Self::Error> {
		let (version, hash_bytes) = decode_address(address)?;

		if hash_bytes.len() != HASH160_LENGTH {
			return Err(StacksError::InvalidArguments(
				"Invalid hash length for address",
			));
		}

		Self::from_raw_version(version, Hash160Hasher::from_bytes(&hash_bytes)?)
	}
}

impl TryFrom<String> for StacksAddress {
	type Error = StacksError;

	fn try_from(address: String) -> Result<Self, Self::Error> {
		Self::try_from(address.as_str())
	}
}

impl FromStr for StacksAddress {
	type Err = StacksError;

	fn from_str(address: &str) -> Result<Self, Self::Err> {
		Self::try_from(address)
	}
}

impl fmt::Display for StacksAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// Versions are capped at 31, so encoding cannot fail
		let encoded = encode_address(self.version, self.hash.as_ref())
			.map_err(|_| fmt::Error)?;

		f.write_str(&encoded)
	}
}

fn hash_p2pkh(key: &StacksPublicKey) -> Hash160Hasher {
	Hash160Hasher::new(key.to_bytes())
}

fn hash_p2sh<'a>(
	pub_keys: impl IntoIterator<Item = &'a StacksPublicKey>,
	signature_threshold: usize,
) -> Hash160Hasher {
	let mut builder = Builder::new();
	let mut key_counter = 0;

	builder = builder.push_int(signature_threshold as i64);

	for key in pub_keys {
		builder = builder.push_slice(&key.to_bytes());
		key_counter += 1;
	}

	builder = builder.push_int(key_counter);
	builder = builder.push_opcode(OP_CHECKMULTISIG);

	let script = builder.into_script();

	Hash160Hasher::new(script.as_bytes())
}

fn hash_p2wpkh(key: &StacksPublicKey) -> Hash160Hasher {
	let key_hash_hasher = Hash160Hasher::new(key.to_bytes());
	let key_hash = key_hash_hasher.as_ref();
	let key_hash_len = key_hash.len();

	let mut buff = Vec::with_capacity(key_hash_len + 2);
	buff.push(0);
	buff.push(key_hash_len as u8);
	buff.extend_from_slice(key_hash);

	Hash160Hasher::new(&buff)
}

fn hash_p2wsh<'a>(
	pub_keys: impl IntoIterator<Item = &'a StacksPublicKey>,
	signature_threshold: usize,
) -> Hash160Hasher {
	let mut script = vec![];
	let mut key_count = 0;

	// OP_1 is 0x51, so small integers are pushed as 0x50 + n. Callers keep
	// both counts within 1..=16.
	script.push(signature_threshold as u8 + 80);

	for pub_key in pub_keys {
		let bytes = pub_key.to_bytes();

		script.push(bytes.len() as u8);
		script.extend_from_slice(&bytes);
		key_count += 1;
	}

	script.push(key_count + 80);
	script.push(174);

	let digest = Sha256Hasher::new(&script);
	let digest_bytes = digest.as_ref();

	let mut buff = vec![];
	buff.push(0);
	buff.push(digest_bytes.len() as u8);
	buff.extend_from_slice(digest_bytes);

	Hash160Hasher::new(&buff)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(public_key_hex: &str) -> StacksPublicKey {
		StacksPublicKey::from_hex(public_key_hex).unwrap()
	}

	fn hash(hash_hex: &str) -> Hash160Hasher {
		Hash160Hasher::from_hex(hash_hex).unwrap()
	}

	/// Sample data computed with these commands on MacOS:
	///
	/// ```text
	/// CREDENTIALS=$(stx make_keychain)
	/// PUBLIC_KEY=$(echo $CREDENTIALS | jq -r .key_info.publicKey)
	/// EXPECTED_HASH=$(echo $PUBLIC_KEY \
	/// | xxd -r -p \
	/// | openssl dgst -sha256 -binary \
	/// | openssl dgst -ripemd160 -binary \
	/// | xxd -p)
	/// ```
	#[test]
	fn should_correctly_hash_p2pkh() {
		let pk = key(
			"03556902f83defc6c63a7eb56a2d8ee4baee109f2126aac41e4f9e3a0835f34bc5",
		);

		assert_eq!(
			hash_p2pkh(&pk),
			hash("d24206d58967c61b6b302eb14cd254a8ae7e761a")
		);
	}

	#[test]
	fn should_correctly_hash_p2sh() {
		let pk = key(
			"028cac21ac93bf697dc31da79e11aad8d285b2e2e81bcfc8de982179c6d468d339",
		);

		assert_eq!(
			hash_p2sh(&[pk], 1),
			hash("fc1058076c56333d7d2d9fbb936aefa632c0e7a8")
		);
	}

	#[test]
	fn should_correctly_hash_p2sh_2_keys() {
		let pk1 = key(
			"0325a1b9799db9852ee1c99280b20695b1889eff7ec0352d634912818d02f91f84",
		);
		let pk2 = key(
			"0279d7abd36d41d51e225efbbc8376a257051cecdf8b47eaffeb49b77547bc3bff",
		);

		assert_eq!(
			hash_p2sh(&[pk1, pk2], 2),
			hash("073503b6e6ef916e4ab40f31abc83217c271d917")
		);
	}

	#[test]
	fn should_correctly_hash_p2wsh() {
		let pk = key(
			"027cf49417052b14d73c3da78ec3c0c859380b19a4971fd8c63ded9037455dd84c",
		);

		assert_eq!(
			hash_p2wsh(&[pk], 1),
			hash("599623097df78a0e962108bfb0f1f78ef1d15f57")
		);
	}

	#[test]
	fn should_correctly_hash_p2wsh_2_key() {
		let pk1 = key(
			"037c6e4c27b3d39ab73c2cd2fdd2ea34cec3d9b6881a2a4a17e42fcafb6b64c3aa",
		);
		let pk2 = key(
			"03a544a1d3fb4238d5841647100c53e371a1d72f027857899256f0c754cf266491",
		);

		assert_eq!(
			hash_p2wsh(&[pk1, pk2], 2),
			hash("d5f3ddac2358f61088d951aead20c270a045d46d")
		);
	}

	#[test]
	fn should_correctly_hash_p2wpkh() {
		let pk = key(
			"03528351fc1494c66b67e0857fd571e1de37985dd0cae987dbe71c47d2bc7a7712",
		);

		assert_eq!(
			hash_p2wpkh(&pk),
			hash("3bb7c80b72757b4bc94bd3cb09171500fb72b4ac")
		);
	}

	/// Data generated with `stx make_keychain`
	#[test]
	fn should_create_correct_address_from_public_key() {
		let pk = key(
			"02e2ce887c1f1654936fbb7d4036749da5e7b9b64af406e1f3535c8f4336de1c6e",
		);

		let addr = StacksAddress::p2pkh(AddressVersion::MainnetSingleSig, &pk);

		assert_eq!(addr.to_string(), "SPR4FMGJCD78NF4FRGPM621CW1KHNFEG0HSRDSPK");
	}

	#[test]
	fn should_create_correct_address_from_c32_encoded_string() {
		let pk = key(
			"02e2ce887c1f1654936fbb7d4036749da5e7b9b64af406e1f3535c8f4336de1c6e",
		);

		let addr =
			StacksAddress::try_from("SPR4FMGJCD78NF4FRGPM621CW1KHNFEG0HSRDSPK")
				.unwrap();

		assert_eq!(addr.hash(), &hash_p2pkh(&pk));
		assert_eq!(
			addr.address_version(),
			Some(AddressVersion::MainnetSingleSig)
		);
	}

	#[test]
	fn should_keep_non_standard_address_versions() {
		let encoded = encode_address(1, &[0; HASH160_LENGTH]).unwrap();
		let addr = StacksAddress::try_from(encoded.as_str()).unwrap();

		assert_eq!(addr.version(), 1);
		assert_eq!(addr.address_version(), None);
		assert_eq!(addr.to_string(), encoded);
	}

	#[test]
	fn should_reject_versions_outside_of_c32() {
		assert!(matches!(
			StacksAddress::from_raw_version(32, Hash160Hasher::zeroes()),
			Err(StacksError::InvalidAddressVersion(32))
		));

		let mut bytes = vec![32];
		bytes.extend_from_slice(&[0; HASH160_LENGTH]);

		assert!(matches!(
			<StacksAddress as Codec>::deserialize(&bytes),
			Err(StacksError::CodecError(CodecError::UnknownTag {
				tag: 32,
				..
			}))
		));
	}

	#[test]
	fn should_decode_every_c32_version() {
		for version in 0..=MAX_ADDRESS_VERSION {
			let mut bytes = vec![version];
			bytes.extend_from_slice(&[0xab; HASH160_LENGTH]);

			let addr = <StacksAddress as Codec>::deserialize(&bytes).unwrap();

			assert_eq!(addr.version(), version);
			assert_eq!(addr.serialize_to_vec(), bytes);
		}
	}

	#[test]
	fn should_encode_version_then_hash() {
		let addr =
			StacksAddress::from_str("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7")
				.unwrap();
		let bytes = addr.serialize_to_vec();

		assert_eq!(
			hex::encode(&bytes),
			"16a46ff88886c2ef9762d970b4d2c63678835bd39d"
		);
		assert_eq!(
			<StacksAddress as Codec>::deserialize(&bytes).unwrap(),
			addr
		);
		assert!(<StacksAddress as Codec>::deserialize(&bytes[..20]).is_err());
	}

	#[test]
	fn should_pick_version_from_hash_mode() {
		assert_eq!(
			AddressHashMode::SerializeP2PKH.address_version(Network::Testnet),
			AddressVersion::TestnetSingleSig
		);
		assert_eq!(
			AddressHashMode::SerializeP2WSH.address_version(Network::Mainnet),
			AddressVersion::MainnetMultiSig
		);
	}

	#[test]
	fn should_check_multisig_threshold() {
		let pk1 = key(
			"037c6e4c27b3d39ab73c2cd2fdd2ea34cec3d9b6881a2a4a17e42fcafb6b64c3aa",
		);
		let pk2 = key(
			"03a544a1d3fb4238d5841647100c53e371a1d72f027857899256f0c754cf266491",
		);
		let keys = [pk1, pk2];

		let addr = StacksAddress::from_public_keys(
			AddressVersion::MainnetMultiSig,
			AddressHashMode::SerializeP2WSH,
			&keys,
			2,
		)
		.unwrap();

		assert_eq!(addr.hash(), &hash("d5f3ddac2358f61088d951aead20c270a045d46d"));
		assert!(StacksAddress::from_public_keys(
			AddressVersion::MainnetMultiSig,
			AddressHashMode::SerializeP2SH,
			&keys,
			3,
		)
		.is_err());
		assert!(StacksAddress::from_public_keys(
			AddressVersion::MainnetSingleSig,
			AddressHashMode::SerializeP2PKH,
			&keys,
			1,
		)
		.is_err());
	}

	#[test]
	fn should_reject_more_than_sixteen_keys() {
		let pk = key(
			"037c6e4c27b3d39ab73c2cd2fdd2ea34cec3d9b6881a2a4a17e42fcafb6b64c3aa",
		);
		let sixteen = vec![pk.clone(); MAX_MULTISIG_KEYS];
		let seventeen = vec![pk; MAX_MULTISIG_KEYS + 1];

		assert!(StacksAddress::from_public_keys(
			AddressVersion::MainnetMultiSig,
			AddressHashMode::SerializeP2WSH,
			&sixteen,
			16,
		)
		.is_ok());
		assert!(matches!(
			StacksAddress::from_public_keys(
				AddressVersion::MainnetMultiSig,
				AddressHashMode::SerializeP2WSH,
				&seventeen,
				1,
			),
			Err(StacksError::InvalidArguments(_))
		));
	}
}

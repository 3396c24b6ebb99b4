/*!
PoX reward addresses.

Stacking contracts take the bitcoin address rewards are paid to as a tuple
`{ version: (buff 1), hashbytes: (buff 32) }`.
*/
use strum::{EnumIter, FromRepr};

use super::bitcoin::{
	decode_btc_address, encode_base58check, encode_segwit,
	BitcoinAddressError, BitcoinAddressResult, BitcoinNetwork,
	BTC_MAINNET_P2PKH_VERSION, BTC_MAINNET_P2SH_VERSION,
	BTC_TESTNET_P2PKH_VERSION, BTC_TESTNET_P2SH_VERSION,
};
use crate::{
	clarity::Value,
	crypto::hash160::HASH160_LENGTH,
	validated_strings::{clarity_name::ClarityName, Validate},
	StacksError, StacksResult,
};

/// Length of the `hashbytes` buffer in a reward tuple
pub const POX_HASHBYTES_LENGTH: usize = 32;

/// Reward address kinds understood by the stacking contracts
#[repr(u8)]
#[derive(FromRepr, EnumIter, PartialEq, Eq, Copy, Clone, Debug)]
pub enum PoxAddressVersion {
	/// Pay to public key hash
	P2pkh = 0x00,
	/// Pay to script hash
	P2sh = 0x01,
	/// P2WPKH nested in P2SH
	P2shP2wpkh = 0x02,
	/// P2WSH nested in P2SH
	P2shP2wsh = 0x03,
	/// Pay to witness public key hash
	P2wpkh = 0x04,
	/// Pay to witness script hash
	P2wsh = 0x05,
	/// Pay to taproot
	P2tr = 0x06,
}

impl PoxAddressVersion {
	/// Kind of a base58check version byte
	pub fn from_base58_version(version: u8) -> BitcoinAddressResult<Self> {
		match version {
			BTC_MAINNET_P2PKH_VERSION | BTC_TESTNET_P2PKH_VERSION => {
				Ok(Self::P2pkh)
			}
			BTC_MAINNET_P2SH_VERSION | BTC_TESTNET_P2SH_VERSION => Ok(Self::P2sh),
			_ => Err(BitcoinAddressError::UnsupportedAddressKind(format!(
				"base58 version {:#04x}",
				version
			))),
		}
	}

	/// Kind of a witness version and program length
	pub fn from_witness(
		witness_version: u8,
		program_length: usize,
	) -> BitcoinAddressResult<Self> {
		match (witness_version, program_length) {
			(0, 20) => Ok(Self::P2wpkh),
			(0, 32) => Ok(Self::P2wsh),
			(1, 32) => Ok(Self::P2tr),
			_ => Err(BitcoinAddressError::UnsupportedAddressKind(format!(
				"witness version {} with a {} byte program",
				witness_version, program_length
			))),
		}
	}

	/// Length of the hash for this kind
	pub fn hash_length(&self) -> usize {
		match self {
			Self::P2wsh | Self::P2tr => POX_HASHBYTES_LENGTH,
			_ => HASH160_LENGTH,
		}
	}
}

/// A bitcoin reward address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoxAddress {
	version: PoxAddressVersion,
	hash: Vec<u8>,
}

impl PoxAddress {
	/// Pair a kind with a hash of the length the kind requires
	pub fn new(
		version: PoxAddressVersion,
		hash: Vec<u8>,
	) -> BitcoinAddressResult<Self> {
		if hash.len() != version.hash_length() {
			return Err(BitcoinAddressError::UnsupportedAddressKind(format!(
				"{:?} with a {} byte hash",
				version,
				hash.len()
			)));
		}

		Ok(Self { version, hash })
	}

	/// Decode a base58check or segwit bitcoin address
	pub fn from_btc_address(address: &str) -> BitcoinAddressResult<Self> {
		decode_btc_address(address)
	}

	/// Address kind
	pub fn version(&self) -> PoxAddressVersion {
		self.version
	}

	/// Hash or witness program
	pub fn hash(&self) -> &[u8] {
		&self.hash
	}

	/// Reward tuple, with the hash right padded with zeroes to 32 bytes
	pub fn to_tuple(&self) -> Value {
		let mut hashbytes = self.hash.clone();
		hashbytes.resize(POX_HASHBYTES_LENGTH, 0);

		// Both field names are valid Clarity names
		Value::Tuple(
			[
				(ClarityName::create("hashbytes"), Value::Buffer(hashbytes)),
				(
					ClarityName::create("version"),
					Value::Buffer(vec![self.version as u8]),
				),
			]
			.into_iter()
			.collect(),
		)
	}

	/// Read a reward tuple back
	pub fn from_tuple(value: &Value) -> StacksResult<Self> {
		let field = |name: &'static str| {
			value
				.tuple_field(name)
				.and_then(Value::as_buffer)
				.ok_or(StacksError::InvalidArguments(
					"Reward tuple needs version and hashbytes buffers",
				))
		};

		let version = match field("version")? {
			[version] => PoxAddressVersion::from_repr(*version).ok_or_else(
				|| {
					StacksError::InvalidData(format!(
						"Unknown reward address version {}",
						version
					))
				},
			)?,
			_ => {
				return Err(StacksError::InvalidArguments(
					"Reward tuple version must be one byte",
				))
			}
		};

		let hashbytes = field("hashbytes")?;
		if hashbytes.len() < version.hash_length() {
			return Err(StacksError::InvalidArguments(
				"Reward tuple hashbytes is too short",
			));
		}

		let (hash, padding) = hashbytes.split_at(version.hash_length());

		if padding.iter().any(|byte| *byte != 0) {
			return Err(StacksError::InvalidArguments(
				"Reward tuple hashbytes has non zero padding",
			));
		}

		Ok(Self::new(version, hash.to_vec())?)
	}

	/// Bitcoin address string on the given network. Nested segwit kinds
	/// encode as pay to script hash.
	pub fn to_btc_address(
		&self,
		network: BitcoinNetwork,
	) -> BitcoinAddressResult<String> {
		let base58 = |version: u8| {
			let mut hash = [0u8; HASH160_LENGTH];
			hash.copy_from_slice(&self.hash);

			encode_base58check(version, &hash)
		};

		match self.version {
			PoxAddressVersion::P2pkh => Ok(base58(network.p2pkh_version())),
			PoxAddressVersion::P2sh
			| PoxAddressVersion::P2shP2wpkh
			| PoxAddressVersion::P2shP2wsh => Ok(base58(network.p2sh_version())),
			PoxAddressVersion::P2wpkh | PoxAddressVersion::P2wsh => {
				encode_segwit(network.hrp(), 0, &self.hash)
			}
			PoxAddressVersion::P2tr => {
				encode_segwit(network.hrp(), 1, &self.hash)
			}
		}
	}
}

/// Reward tuple of a bitcoin address string
pub fn pox_address_to_tuple(address: &str) -> StacksResult<Value> {
	Ok(PoxAddress::from_btc_address(address)?.to_tuple())
}

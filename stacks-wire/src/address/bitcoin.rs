/*!
Bitcoin address codecs: base58check for legacy addresses and bech32/bech32m
for segwit addresses, plus the unified decoder used for reward addresses.
*/
use bech32::{FromBase32, ToBase32, Variant};
use bitcoin::util::base58;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::debug;

use super::pox::{PoxAddress, PoxAddressVersion};
use crate::crypto::hash160::HASH160_LENGTH;

/// Mainnet pay-to-public-key-hash version byte
pub const BTC_MAINNET_P2PKH_VERSION: u8 = 0x00;
/// Mainnet pay-to-script-hash version byte
pub const BTC_MAINNET_P2SH_VERSION: u8 = 0x05;
/// Testnet pay-to-public-key-hash version byte
pub const BTC_TESTNET_P2PKH_VERSION: u8 = 0x6f;
/// Testnet pay-to-script-hash version byte
pub const BTC_TESTNET_P2SH_VERSION: u8 = 0xc4;

const MIN_WITNESS_PROGRAM_LENGTH: usize = 2;
const MAX_WITNESS_PROGRAM_LENGTH: usize = 40;
const MAX_WITNESS_VERSION: u8 = 16;

/// Errors from bitcoin address handling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitcoinAddressError {
	/// Not a base58 string
	#[error("Invalid base58 string: {0}")]
	InvalidBase58(String),
	/// The base58check checksum does not match the payload
	#[error("Checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
	ChecksumMismatch {
		/// Checksum computed from the payload
		expected: u32,
		/// Checksum found in the string
		actual: u32,
	},
	/// The leading version byte is not a known bitcoin version
	#[error("Unknown base58 version byte: {0:#04x}")]
	InvalidVersion(u8),
	/// The base58check payload is not a version byte and a 20 byte hash
	#[error("Invalid base58check payload length: {0}")]
	InvalidLength(usize),
	/// Not a bech32 or bech32m string
	#[error("Invalid bech32 string: {0}")]
	InvalidBech32(String),
	/// The checksum variant does not match the witness version
	#[error(
		"Witness version {witness_version} must use {expected} encoding"
	)]
	WrongSegwitEncoding {
		/// Decoded witness version
		witness_version: u8,
		/// Encoding required for the witness version
		expected: SegwitEncoding,
	},
	/// Witness version above 16
	#[error("Invalid witness version: {0}")]
	InvalidWitnessVersion(u8),
	/// Witness program length is invalid for its version
	#[error("Invalid witness program length {length} for version {version}")]
	InvalidWitnessProgramLength {
		/// Witness version
		version: u8,
		/// Program length in bytes
		length: usize,
	},
	/// Valid address of a kind that cannot be used as a reward address
	#[error("Unsupported address kind: {0}")]
	UnsupportedAddressKind(String),
	/// Neither base58check nor segwit decoding succeeded
	#[error("Invalid address {address}: {source}")]
	InvalidAddress {
		/// The rejected address
		address: String,
		/// Error from the last attempted scheme
		source: Box<BitcoinAddressError>,
	},
}

/// Result type for bitcoin address operations
pub type BitcoinAddressResult<T> = Result<T, BitcoinAddressError>;

/// Checksum scheme of a segwit address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SegwitEncoding {
	/// BIP-173 checksum, witness version 0
	#[strum(serialize = "bech32")]
	Bech32,
	/// BIP-350 checksum, witness versions 1 to 16
	#[strum(serialize = "bech32m")]
	Bech32m,
}

impl SegwitEncoding {
	/// Encoding required for the given witness version
	pub fn for_witness_version(witness_version: u8) -> Self {
		if witness_version == 0 {
			Self::Bech32
		} else {
			Self::Bech32m
		}
	}

	fn variant(&self) -> Variant {
		match self {
			Self::Bech32 => Variant::Bech32,
			Self::Bech32m => Variant::Bech32m,
		}
	}
}

/// Bitcoin network an address is encoded for
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
	EnumIter,
	EnumString,
	Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BitcoinNetwork {
	/// Mainnet
	Mainnet,
	/// Testnet
	Testnet,
	/// Regtest
	Regtest,
}

impl BitcoinNetwork {
	/// Base58 version byte for pay-to-public-key-hash
	pub fn p2pkh_version(&self) -> u8 {
		match self {
			Self::Mainnet => BTC_MAINNET_P2PKH_VERSION,
			Self::Testnet | Self::Regtest => BTC_TESTNET_P2PKH_VERSION,
		}
	}

	/// Base58 version byte for pay-to-script-hash
	pub fn p2sh_version(&self) -> u8 {
		match self {
			Self::Mainnet => BTC_MAINNET_P2SH_VERSION,
			Self::Testnet | Self::Regtest => BTC_TESTNET_P2SH_VERSION,
		}
	}

	/// Human readable part of segwit addresses
	pub fn hrp(&self) -> &'static str {
		match self {
			Self::Mainnet => "bc",
			Self::Testnet => "tb",
			Self::Regtest => "bcrt",
		}
	}
}

/// Encodes a version byte and a 20 byte hash as base58check
pub fn encode_base58check(version: u8, hash: &[u8; HASH160_LENGTH]) -> String {
	let mut payload = Vec::with_capacity(HASH160_LENGTH + 1);
	payload.push(version);
	payload.extend_from_slice(hash);

	base58::check_encode_slice(&payload)
}

/// Decodes a base58check address into its version byte and hash
pub fn decode_base58check(
	address: &str,
) -> BitcoinAddressResult<(u8, [u8; HASH160_LENGTH])> {
	let payload = base58::from_check(address).map_err(|err| match err {
		base58::Error::BadChecksum(expected, actual) => {
			BitcoinAddressError::ChecksumMismatch { expected, actual }
		}
		err => BitcoinAddressError::InvalidBase58(err.to_string()),
	})?;

	if payload.len() != HASH160_LENGTH + 1 {
		return Err(BitcoinAddressError::InvalidLength(payload.len()));
	}

	let version = payload[0];
	if !matches!(
		version,
		BTC_MAINNET_P2PKH_VERSION
			| BTC_MAINNET_P2SH_VERSION
			| BTC_TESTNET_P2PKH_VERSION
			| BTC_TESTNET_P2SH_VERSION
	) {
		return Err(BitcoinAddressError::InvalidVersion(version));
	}

	let mut hash = [0u8; HASH160_LENGTH];
	hash.copy_from_slice(&payload[1..]);

	Ok((version, hash))
}

/// A decoded segwit address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegwitAddress {
	/// Human readable part
	pub hrp: String,
	/// Witness version, 0 to 16
	pub witness_version: u8,
	/// Witness program
	pub program: Vec<u8>,
}

impl SegwitAddress {
	/// Encoding this address must use
	pub fn encoding(&self) -> SegwitEncoding {
		SegwitEncoding::for_witness_version(self.witness_version)
	}
}

fn check_witness_program(
	witness_version: u8,
	program: &[u8],
) -> BitcoinAddressResult<()> {
	if witness_version > MAX_WITNESS_VERSION {
		return Err(BitcoinAddressError::InvalidWitnessVersion(
			witness_version,
		));
	}

	let length = program.len();
	let valid_length = (MIN_WITNESS_PROGRAM_LENGTH..=MAX_WITNESS_PROGRAM_LENGTH)
		.contains(&length)
		&& (witness_version != 0 || length == 20 || length == 32);

	if !valid_length {
		return Err(BitcoinAddressError::InvalidWitnessProgramLength {
			version: witness_version,
			length,
		});
	}

	Ok(())
}

/// Decodes a bech32 or bech32m segwit address.
///
/// Witness version 0 must be bech32 and later versions must be bech32m, even
/// if the checksum of the other scheme is valid.
pub fn decode_segwit(address: &str) -> BitcoinAddressResult<SegwitAddress> {
	let (hrp, data, variant) = bech32::decode(address)
		.map_err(|err| BitcoinAddressError::InvalidBech32(err.to_string()))?;

	let (version, words) = data.split_first().ok_or_else(|| {
		BitcoinAddressError::InvalidBech32("Empty data part".to_string())
	})?;
	let witness_version = version.to_u8();

	let expected = SegwitEncoding::for_witness_version(witness_version);
	if expected.variant() != variant {
		return Err(BitcoinAddressError::WrongSegwitEncoding {
			witness_version,
			expected,
		});
	}

	let program = Vec::<u8>::from_base32(words)
		.map_err(|err| BitcoinAddressError::InvalidBech32(err.to_string()))?;

	check_witness_program(witness_version, &program)?;

	Ok(SegwitAddress {
		hrp,
		witness_version,
		program,
	})
}

/// Encodes a segwit address, picking bech32 or bech32m from the version
pub fn encode_segwit(
	hrp: &str,
	witness_version: u8,
	program: &[u8],
) -> BitcoinAddressResult<String> {
	check_witness_program(witness_version, program)?;

	let version = bech32::u5::try_from_u8(witness_version).map_err(|_| {
		BitcoinAddressError::InvalidWitnessVersion(witness_version)
	})?;

	let mut data = vec![version];
	data.extend(program.to_base32());

	bech32::encode(
		hrp,
		data,
		SegwitEncoding::for_witness_version(witness_version).variant(),
	)
	.map_err(|err| BitcoinAddressError::InvalidBech32(err.to_string()))
}

/// Decodes any supported bitcoin address into a reward address.
///
/// Base58check is attempted first and segwit second. If both fail, the
/// segwit error is reported as the source.
pub fn decode_btc_address(address: &str) -> BitcoinAddressResult<PoxAddress> {
	let base58_error = match decode_base58check(address) {
		Ok((version, hash)) => {
			let version = PoxAddressVersion::from_base58_version(version)?;

			return PoxAddress::new(version, hash.to_vec());
		}
		Err(err) => err,
	};

	debug!(
		"Base58check decoding of {} failed ({}), trying segwit",
		address, base58_error
	);

	match decode_segwit(address) {
		Ok(segwit) => {
			let version = PoxAddressVersion::from_witness(
				segwit.witness_version,
				segwit.program.len(),
			)?;

			PoxAddress::new(version, segwit.program)
		}
		Err(err) => Err(BitcoinAddressError::InvalidAddress {
			address: address.to_string(),
			source: Box::new(err),
		}),
	}
}

#[cfg(test)]
mod tests {
	use rand::{thread_rng, Rng};

	use super::*;

	#[test]
	fn should_roundtrip_base58check() {
		let mut rng = thread_rng();

		for version in [
			BTC_MAINNET_P2PKH_VERSION,
			BTC_MAINNET_P2SH_VERSION,
			BTC_TESTNET_P2PKH_VERSION,
			BTC_TESTNET_P2SH_VERSION,
		] {
			for _ in 0..100 {
				let hash: [u8; HASH160_LENGTH] = rng.gen();
				let encoded = encode_base58check(version, &hash);

				assert_eq!(decode_base58check(&encoded).unwrap(), (version, hash));
			}
		}
	}

	#[test]
	fn should_decode_known_base58check_address() {
		let (version, hash) =
			decode_base58check("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2").unwrap();

		assert_eq!(version, BTC_MAINNET_P2PKH_VERSION);
		assert_eq!(
			hex::encode(hash),
			"77bff20c60e522dfaa3350c39b030a5d004e839a"
		);
	}

	#[test]
	fn should_detect_base58_checksum_mismatch() {
		assert!(matches!(
			decode_base58check("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN3"),
			Err(BitcoinAddressError::ChecksumMismatch { .. })
		));
	}

	#[test]
	fn should_reject_unknown_base58_version() {
		let encoded = base58::check_encode_slice(&[0x30; HASH160_LENGTH + 1]);

		assert_eq!(
			decode_base58check(&encoded),
			Err(BitcoinAddressError::InvalidVersion(0x30))
		);
	}

	#[test]
	fn should_decode_segwit_addresses() {
		let p2wpkh =
			decode_segwit("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4").unwrap();
		assert_eq!(p2wpkh.hrp, "bc");
		assert_eq!(p2wpkh.witness_version, 0);
		assert_eq!(
			hex::encode(&p2wpkh.program),
			"751e76e8199196d454941c45d1b3a323f1433bd6"
		);

		let p2wsh = decode_segwit(
			"tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7",
		)
		.unwrap();
		assert_eq!(p2wsh.witness_version, 0);
		assert_eq!(p2wsh.program.len(), 32);

		let p2tr = decode_segwit(
			"bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0",
		)
		.unwrap();
		assert_eq!(p2tr.witness_version, 1);
		assert_eq!(p2tr.program.len(), 32);
	}

	#[test]
	fn should_reject_wrong_segwit_encoding() {
		// Witness version 1 with a bech32 checksum
		let address =
			"bc1pw508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7k7grplx";

		assert_eq!(
			decode_segwit(address),
			Err(BitcoinAddressError::WrongSegwitEncoding {
				witness_version: 1,
				expected: SegwitEncoding::Bech32m,
			})
		);
	}

	#[test]
	fn should_roundtrip_segwit() {
		let mut rng = thread_rng();

		for (witness_version, length) in [(0u8, 20usize), (0, 32), (1, 32)] {
			let program: Vec<u8> = (0..length).map(|_| rng.gen()).collect();
			let encoded = encode_segwit("bc", witness_version, &program).unwrap();
			let decoded = decode_segwit(&encoded).unwrap();

			assert_eq!(decoded.witness_version, witness_version);
			assert_eq!(decoded.program, program);
		}
	}

	#[test]
	fn should_wrap_innermost_error_for_invalid_address() {
		match decode_btc_address("not-an-address") {
			Err(BitcoinAddressError::InvalidAddress { address, source }) => {
				assert_eq!(address, "not-an-address");
				assert!(matches!(*source, BitcoinAddressError::InvalidBech32(_)));
			}
			other => panic!("Expected invalid address, got {:?}", other),
		}
	}
}

//! WIF parsing and construction of Stacks private keys.

use std::{fmt, str::FromStr};

use bitcoin::util::base58;
use strum::{Display, EnumIter, FromRepr};

use super::keys::{
	StacksPrivateKey, PRIVATE_KEY_COMPRESSED_LENGTH, PRIVATE_KEY_LENGTH,
};
use crate::{Network, StacksError, StacksResult};

/// WIF network prefix byte
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, EnumIter, FromRepr)]
#[repr(u8)]
pub enum WifPrefix {
	/// Mainnet
	Mainnet = 128,
	/// Testnet
	Testnet = 239,
}

impl From<Network> for WifPrefix {
	fn from(value: Network) -> Self {
		match value {
			Network::Mainnet => Self::Mainnet,
			Network::Testnet => Self::Testnet,
		}
	}
}

impl From<WifPrefix> for Network {
	fn from(value: WifPrefix) -> Self {
		match value {
			WifPrefix::Mainnet => Network::Mainnet,
			WifPrefix::Testnet => Network::Testnet,
		}
	}
}

/// A private key in wallet import format.
///
/// The payload is the [WifPrefix] byte followed by the private key bytes,
/// including the compression marker when the key has one. The string form
/// appends a four byte double sha256 checksum and encodes it as base58.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wif {
	network: Network,
	private_key: StacksPrivateKey,
}

impl Wif {
	/// Constructs a WIF from a network and private key
	pub fn new(network: Network, private_key: StacksPrivateKey) -> Self {
		Self {
			network,
			private_key,
		}
	}

	/// Attempts to parse a WIF from its payload bytes, checksum excluded
	pub fn from_bytes(bytes: impl AsRef<[u8]>) -> StacksResult<Self> {
		let bytes = bytes.as_ref();

		let (prefix, key_bytes) = bytes.split_first().ok_or_else(|| {
			StacksError::InvalidData("WIF payload is empty".into())
		})?;

		let prefix = WifPrefix::from_repr(*prefix).ok_or_else(|| {
			StacksError::InvalidData(format!("Unknown WIF prefix: {}", prefix))
		})?;

		if !matches!(
			key_bytes.len(),
			PRIVATE_KEY_LENGTH | PRIVATE_KEY_COMPRESSED_LENGTH
		) {
			return Err(StacksError::InvalidData(format!(
				"Invalid WIF payload length: {}",
				bytes.len()
			)));
		}

		Ok(Self::new(prefix.into(), StacksPrivateKey::from_bytes(key_bytes)?))
	}

	/// Payload bytes, checksum excluded
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut bytes = vec![WifPrefix::from(self.network) as u8];
		bytes.extend(self.private_key.to_bytes());

		bytes
	}

	/// Returns the network
	pub fn network(&self) -> Network {
		self.network
	}

	/// Returns the private key
	pub fn private_key(&self) -> StacksPrivateKey {
		self.private_key
	}
}

impl FromStr for Wif {
	type Err = StacksError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = base58::from_check(s).map_err(|err| {
			StacksError::InvalidData(format!("WIF is invalid: {}", err))
		})?;

		Self::from_bytes(bytes)
	}
}

impl fmt::Display for Wif {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&base58::check_encode_slice(&self.to_bytes()))
	}
}

#[cfg(test)]
mod tests {
	use strum::IntoEnumIterator;

	use super::*;

	#[test]
	fn wif() {
		for network in Network::iter() {
			for compressed in [true, false] {
				let key = StacksPrivateKey::random(compressed);
				let wif = Wif::new(network, key);

				let parsed = Wif::from_str(&wif.to_string()).unwrap();

				assert_eq!(parsed.network(), network);
				assert_eq!(parsed.private_key(), key);

				let bitcoin_key =
					bitcoin::PrivateKey::from_wif(&wif.to_string()).unwrap();

				assert_eq!(bitcoin_key.compressed, compressed);
				assert_eq!(
					bitcoin_key.inner.secret_bytes(),
					key.secret_key().secret_bytes()
				);
			}
		}
	}

	#[test]
	fn should_parse_known_wif() {
		let wif = Wif::from_str(
			"KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617",
		)
		.unwrap();

		assert_eq!(wif.network(), Network::Mainnet);
		assert!(wif.private_key().is_compressed());
		assert_eq!(
			hex::encode(wif.private_key().secret_key().secret_bytes()),
			"0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d"
		);
	}

	#[test]
	fn should_reject_bad_checksum() {
		assert!(Wif::from_str(
			"KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98618"
		)
		.is_err());
	}
}

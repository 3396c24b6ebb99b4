#![forbid(missing_docs)]
/*!
# stacks-wire: wire-format codec and signing primitives for Stacks transactions

Encodes and decodes every Stacks transaction payload kind, the principals and
Clarity values embedded in them, and the addresses, keys and recoverable
signatures that authorize them.
*/

use std::array::TryFromSliceError;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Module for stacks and bitcoin addresses
pub mod address;
/// Module for c32 encoding and decoding
pub mod c32;
/// Module for Clarity values and principals
pub mod clarity;
/// Module for the binary codec primitives
pub mod codec;
/// Module for crypto functions
pub mod crypto;
/// Module for signing arbitrary messages
pub mod message;
/// Module for normalizing loosely typed integer inputs
pub mod numeric;
/// Module for transaction payloads
pub mod transaction;
/// Module for validated string types
pub mod validated_strings;

pub use crypto::keys::{StacksPrivateKey, StacksPublicKey};

use crate::{
	address::bitcoin::BitcoinAddressError, codec::CodecError,
	crypto::CryptoError,
};

/// Error type for the stacks-wire library
#[derive(Error, Debug)]
pub enum StacksError {
	#[error("Invalid arguments: {0}")]
	/// Invalid arguments
	InvalidArguments(&'static str),
	#[error("Could not crockford32 encode or decode: {0}")]
	/// C32 encoding or decoding error
	C32Error(#[from] c32::C32Error),
	#[error("Address version is invalid: {0}")]
	/// Invalid address version
	InvalidAddressVersion(u8),
	#[error("Could not build array from slice: {0}")]
	/// Invalid slice length
	InvalidSliceLength(#[from] TryFromSliceError),
	#[error("Could not encode or decode hex: {0}")]
	/// Hex encoding or decoding error
	BadHex(#[from] hex::FromHexError),
	#[error("Could not serialize or deserialize: {0}")]
	/// Malformed or truncated bytes
	CodecError(#[from] CodecError),
	#[error("Bitcoin address error: {0}")]
	/// Bitcoin address could not be decoded or mapped
	BitcoinAddressError(#[from] BitcoinAddressError),
	#[error("Cryptographic error: {0}")]
	/// Key or signature error
	CryptoError(#[from] CryptoError),
	#[error("Value {value} is out of range for {target}")]
	/// Numeric input outside of the range of its target type
	OutOfRange {
		/// The rejected input
		value: String,
		/// Name of the target type
		target: &'static str,
	},
	#[error("Not an integer: {0}")]
	/// Textual integer input that is not a number at all
	InvalidInteger(String),
	#[error("Invalid data: {0}")]
	/// Data failed validation
	InvalidData(String),
}

/// Result type for the stacks-wire library
pub type StacksResult<T> = Result<T, StacksError>;

/// Stacks network
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
pub enum Network {
	/// Mainnet
	Mainnet,
	/// Testnet
	Testnet,
}

/*!
Stacks transaction payloads and their wire format.
*/

use strum::{Display, EnumIter, FromRepr};

use crate::{codec::CodecError, StacksError, StacksResult};

/// Module for coinbase payload fields
pub mod coinbase;
/// Module for contract call and deploy payloads
pub mod contract;
/// Module for the transaction payload enum
pub mod payload;
/// Module for tenure change payloads
pub mod tenure_change;
/// Module for token transfer memos
pub mod token_transfer_memo;

pub use payload::{TokenTransferPayload, TransactionPayload};

/// Generates a newtype over a fixed size byte array that is written to the
/// wire as is
macro_rules! fixed_bytes {
	($(#[$meta:meta])* $name:ident, $length:expr) => {
		$(#[$meta])*
		#[derive(Clone, Copy, PartialEq, Eq, Hash)]
		pub struct $name([u8; $length]);

		impl $name {
			/// Length in bytes
			pub const LENGTH: usize = $length;

			/// Wrap an array
			pub fn new(bytes: [u8; $length]) -> Self {
				Self(bytes)
			}

			/// Wrap a slice of exactly [Self::LENGTH] bytes
			pub fn from_bytes(
				bytes: impl AsRef<[u8]>,
			) -> $crate::StacksResult<Self> {
				Ok(Self(bytes.as_ref().try_into()?))
			}

			/// Parse hex, with or without a `0x` prefix
			pub fn from_hex(data: impl AsRef<str>) -> $crate::StacksResult<Self> {
				let data = data.as_ref();

				Self::from_bytes(hex::decode(
					data.strip_prefix("0x").unwrap_or(data),
				)?)
			}

			/// Hex encoding
			pub fn to_hex(&self) -> String {
				hex::encode(self.0)
			}

			/// Raw bytes
			pub fn as_bytes(&self) -> &[u8; $length] {
				&self.0
			}
		}

		impl std::fmt::Debug for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, "{}({})", stringify!($name), self.to_hex())
			}
		}

		impl $crate::codec::Codec for $name {
			fn codec_serialize<W: std::io::Write>(
				&self,
				dest: &mut W,
			) -> std::io::Result<()> {
				dest.write_all(&self.0)
			}

			fn codec_deserialize(
				data: &mut $crate::codec::BytesReader<'_>,
			) -> $crate::codec::CodecResult<Self>
			where
				Self: Sized,
			{
				Ok(Self(data.read_array()?))
			}
		}
	};
}

pub(crate) use fixed_bytes;

/// Type byte that leads every payload
#[repr(u8)]
#[derive(FromRepr, EnumIter, Display, PartialEq, Eq, Copy, Clone, Debug)]
pub enum TransactionPayloadId {
	/// STX transfer
	TokenTransfer = 0,
	/// Contract deploy
	SmartContract = 1,
	/// Contract call
	ContractCall = 2,
	/// Microblock fork evidence
	PoisonMicroblock = 3,
	/// Coinbase
	Coinbase = 4,
	/// Coinbase paid to another principal
	CoinbaseToAltRecipient = 5,
	/// Contract deploy with an explicit Clarity version
	VersionedSmartContract = 6,
	/// Tenure change
	TenureChange = 7,
	/// Nakamoto coinbase with a VRF proof
	NakamotoCoinbase = 8,
}

impl TryFrom<u8> for TransactionPayloadId {
	type Error = StacksError;

	fn try_from(value: u8) -> StacksResult<Self> {
		TransactionPayloadId::from_repr(value)
			.ok_or(CodecError::UnrecognizedPayloadType(value).into())
	}
}

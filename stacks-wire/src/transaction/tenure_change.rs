use std::io;

use strum::{EnumIter, FromRepr};

use super::fixed_bytes;
use crate::{
	codec::{BytesReader, Codec, CodecError, CodecResult},
	crypto::{hash160::Hash160Hasher, Hashing},
	StacksError, StacksResult,
};

fixed_bytes!(
	/// Consensus hash of a burnchain block
	ConsensusHash,
	20
);

fixed_bytes!(
	/// Identifier of a Stacks block
	StacksBlockId,
	32
);

/// Why a tenure changed
#[repr(u8)]
#[derive(FromRepr, EnumIter, PartialEq, Eq, Copy, Clone, Debug)]
pub enum TenureChangeCause {
	/// A new sortition selected a winning block commit
	BlockFound = 0,
	/// The current tenure was extended
	Extended = 1,
}

impl TryFrom<u8> for TenureChangeCause {
	type Error = StacksError;

	fn try_from(value: u8) -> StacksResult<Self> {
		TenureChangeCause::from_repr(value).ok_or(StacksError::InvalidArguments(
			"Unknown tenure change cause",
		))
	}
}

/// Body of a tenure change payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenureChangePayload {
	/// Consensus hash of the new tenure
	pub tenure_consensus_hash: ConsensusHash,
	/// Consensus hash of the previous tenure
	pub prev_tenure_consensus_hash: ConsensusHash,
	/// Consensus hash of the current burnchain view
	pub burn_view_consensus_hash: ConsensusHash,
	/// Last block of the previous tenure
	pub previous_tenure_end: StacksBlockId,
	/// Number of blocks in the previous tenure
	pub previous_tenure_blocks: u32,
	/// Why the tenure changed
	pub cause: TenureChangeCause,
	/// Hash160 of the miner's public key
	pub pubkey_hash: Hash160Hasher,
}

impl Codec for TenureChangePayload {
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()> {
		self.tenure_consensus_hash.codec_serialize(dest)?;
		self.prev_tenure_consensus_hash.codec_serialize(dest)?;
		self.burn_view_consensus_hash.codec_serialize(dest)?;
		self.previous_tenure_end.codec_serialize(dest)?;
		dest.write_all(&self.previous_tenure_blocks.to_be_bytes())?;
		dest.write_all(&[self.cause as u8])?;
		dest.write_all(self.pubkey_hash.as_bytes())
	}

	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized,
	{
		Ok(Self {
			tenure_consensus_hash: ConsensusHash::codec_deserialize(data)?,
			prev_tenure_consensus_hash: ConsensusHash::codec_deserialize(data)?,
			burn_view_consensus_hash: ConsensusHash::codec_deserialize(data)?,
			previous_tenure_end: StacksBlockId::codec_deserialize(data)?,
			previous_tenure_blocks: data.read_u32_be()?,
			cause: data.read_u8_enum(|tag| CodecError::UnknownTag {
				kind: "tenure change cause",
				tag,
			})?,
			pubkey_hash: Hash160Hasher::from_array(data.read_array()?),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn payload() -> TenureChangePayload {
		TenureChangePayload {
			tenure_consensus_hash: ConsensusHash::new([1; 20]),
			prev_tenure_consensus_hash: ConsensusHash::new([2; 20]),
			burn_view_consensus_hash: ConsensusHash::new([3; 20]),
			previous_tenure_end: StacksBlockId::new([4; 32]),
			previous_tenure_blocks: 0x0102_0304,
			cause: TenureChangeCause::Extended,
			pubkey_hash: Hash160Hasher::from_array([5; 20]),
		}
	}

	#[test]
	fn should_lay_out_fields_in_order() {
		let bytes = payload().serialize_to_vec();

		assert_eq!(bytes.len(), 20 + 20 + 20 + 32 + 4 + 1 + 20);
		assert_eq!(&bytes[92..96], &[1, 2, 3, 4]);
		assert_eq!(bytes[96], 1);
		assert_eq!(TenureChangePayload::deserialize(&bytes).unwrap(), payload());
	}

	#[test]
	fn should_reject_unknown_cause() {
		let mut bytes = payload().serialize_to_vec();
		bytes[96] = 2;

		assert!(matches!(
			TenureChangePayload::deserialize(&bytes),
			Err(StacksError::CodecError(CodecError::UnknownTag {
				kind: "tenure change cause",
				tag: 2
			}))
		));
	}

	#[test]
	fn should_fail_on_truncation() {
		let bytes = payload().serialize_to_vec();

		assert!(TenureChangePayload::deserialize(&bytes[..bytes.len() - 1])
			.is_err());
	}
}

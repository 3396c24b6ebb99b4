use std::{fmt, io};

use crate::{
	codec::{BytesReader, Codec, CodecResult},
	StacksError, StacksResult,
};

/// Length of a token transfer memo
pub const TOKEN_TRANSFER_MEMO_LENGTH: usize = 34;

/// Fixed size memo attached to a token transfer. Shorter contents are right
/// padded with zeroes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenTransferMemo([u8; TOKEN_TRANSFER_MEMO_LENGTH]);

impl TokenTransferMemo {
	/// Pad up to [TOKEN_TRANSFER_MEMO_LENGTH] bytes into a memo
	pub fn from_bytes(memo: impl AsRef<[u8]>) -> StacksResult<Self> {
		let memo = memo.as_ref();

		if memo.len() > TOKEN_TRANSFER_MEMO_LENGTH {
			return Err(StacksError::InvalidArguments(
				"Memo must be at most 34 bytes",
			));
		}

		let mut bytes = [0u8; TOKEN_TRANSFER_MEMO_LENGTH];
		bytes[..memo.len()].copy_from_slice(memo);

		Ok(Self(bytes))
	}

	/// Memo holding the UTF-8 bytes of the text
	pub fn from_text(text: &str) -> StacksResult<Self> {
		Self::from_bytes(text.as_bytes())
	}

	/// All 34 bytes
	pub fn as_bytes(&self) -> &[u8] {
		self.as_ref()
	}

	/// Memo contents without trailing zero padding
	pub fn content(&self) -> &[u8] {
		let end = self
			.0
			.iter()
			.rposition(|byte| *byte != 0)
			.map_or(0, |position| position + 1);

		&self.0[..end]
	}
}

impl Default for TokenTransferMemo {
	fn default() -> Self {
		Self([0; TOKEN_TRANSFER_MEMO_LENGTH])
	}
}

impl From<[u8; TOKEN_TRANSFER_MEMO_LENGTH]> for TokenTransferMemo {
	fn from(value: [u8; TOKEN_TRANSFER_MEMO_LENGTH]) -> Self {
		Self(value)
	}
}

impl AsRef<[u8]> for TokenTransferMemo {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Debug for TokenTransferMemo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TokenTransferMemo({})", hex::encode(self.0))
	}
}

impl fmt::Display for TokenTransferMemo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&String::from_utf8_lossy(self.content()))
	}
}

impl Codec for TokenTransferMemo {
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

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_pad_memo_text() {
		let memo = TokenTransferMemo::from_text("hello").unwrap();

		assert_eq!(&memo.as_bytes()[..5], b"hello");
		assert_eq!(&memo.as_bytes()[5..], &[0u8; 29]);
		assert_eq!(memo.to_string(), "hello");
		assert_eq!(TokenTransferMemo::from_text("").unwrap(), Default::default());
	}

	#[test]
	fn should_accept_full_length_memo() {
		let memo = TokenTransferMemo::from_text(&"m".repeat(34)).unwrap();

		assert_eq!(memo.content().len(), 34);
		assert!(TokenTransferMemo::from_text(&"m".repeat(35)).is_err());
	}

	#[test]
	fn should_fail_on_short_buffer() {
		assert!(TokenTransferMemo::deserialize([0u8; 33]).is_err());
		assert_eq!(
			TokenTransferMemo::deserialize([0u8; 34]).unwrap(),
			TokenTransferMemo::default()
		);
	}
}

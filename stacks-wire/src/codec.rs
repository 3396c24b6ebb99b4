//! Binary codec primitives shared by every wire type.
//!
//! Encoding writes into any [io::Write]. Decoding always goes through a
//! [BytesReader], a bounds-checked cursor over an immutable buffer that is
//! owned by a single decode call.

use std::{io, ops::RangeInclusive};

use thiserror::Error;

use crate::StacksResult;

/// Errors produced while encoding or decoding wire data
#[derive(Error, Debug)]
pub enum CodecError {
	/// Failed to write into the destination buffer
	#[error("Could not write: {0}")]
	IoError(#[from] io::Error),
	/// The buffer ended before a field was complete
	#[error("Not enough bytes: requested {requested}, {remaining} remaining")]
	Underflow {
		/// Bytes requested by the read
		requested: usize,
		/// Bytes left in the buffer
		remaining: usize,
	},
	/// The leading payload type byte matched no known payload
	#[error("Unrecognized payload type: {0:#04x}")]
	UnrecognizedPayloadType(u8),
	/// An enum byte matched no known variant
	#[error("Unknown {kind} tag: {tag:#04x}")]
	UnknownTag {
		/// What the tag identifies
		kind: &'static str,
		/// The offending byte
		tag: u8,
	},
	/// A length prefix is outside of the allowed bounds
	#[error("{kind} length {length} is outside of {min}..={max}")]
	LengthOutOfBounds {
		/// What the length prefixes
		kind: &'static str,
		/// The decoded length
		length: usize,
		/// Minimum allowed length
		min: usize,
		/// Maximum allowed length
		max: usize,
	},
	/// Nested values exceeded the maximum depth
	#[error("Maximum nesting depth of {0} exceeded")]
	DepthExceeded(usize),
	/// Bytes were read but are semantically invalid
	#[error("Invalid data: {0}")]
	InvalidData(String),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Types with a canonical wire encoding
pub trait Codec {
	/// Writes the wire encoding of the value into the destination
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()>;

	/// Reads a value from the cursor, advancing it past the value
	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized;

	/// Serializes the value into the destination
	fn serialize<W: io::Write>(&self, dest: &mut W) -> StacksResult<()> {
		self.codec_serialize(dest)
			.map_err(|err| CodecError::IoError(err).into())
	}

	/// Deserializes a value from the start of the given bytes
	fn deserialize(bytes: impl AsRef<[u8]>) -> StacksResult<Self>
	where
		Self: Sized,
	{
		let mut reader = BytesReader::new(bytes.as_ref());

		Ok(Self::codec_deserialize(&mut reader)?)
	}

	/// Serializes the value into a new vector
	fn serialize_to_vec(&self) -> Vec<u8> {
		let mut buffer = vec![];

		// Every wire type is validated on construction, so the only
		// possible failure is the writer itself, and vectors do not fail.
		self.codec_serialize(&mut buffer)
			.expect("Writing to a vector should never fail");

		buffer
	}
}

/// Sequential, bounds-checked reader over a byte buffer
#[derive(Debug, Clone)]
pub struct BytesReader<'a> {
	bytes: &'a [u8],
	position: usize,
}

impl<'a> BytesReader<'a> {
	/// Creates a reader positioned at the start of the buffer
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, position: 0 }
	}

	/// Current read offset
	pub fn position(&self) -> usize {
		self.position
	}

	/// Number of unread bytes
	pub fn remaining(&self) -> usize {
		self.bytes.len() - self.position
	}

	/// Whether every byte has been consumed
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Reads the next `length` bytes. The cursor does not move on failure.
	pub fn read_bytes(&mut self, length: usize) -> CodecResult<&'a [u8]> {
		let remaining = self.remaining();

		if length > remaining {
			return Err(CodecError::Underflow {
				requested: length,
				remaining,
			});
		}

		let bytes = &self.bytes[self.position..self.position + length];
		self.position += length;

		Ok(bytes)
	}

	/// Reads a fixed size array
	pub fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
		let mut buffer = [0u8; N];
		buffer.copy_from_slice(self.read_bytes(N)?);

		Ok(buffer)
	}

	/// Reads a single byte
	pub fn read_u8(&mut self) -> CodecResult<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Reads a big-endian u32
	pub fn read_u32_be(&mut self) -> CodecResult<u32> {
		Ok(u32::from_be_bytes(self.read_array()?))
	}

	/// Reads a big-endian u64
	pub fn read_u64_be(&mut self) -> CodecResult<u64> {
		Ok(u64::from_be_bytes(self.read_array()?))
	}

	/// Reads a big-endian u128
	pub fn read_u128_be(&mut self) -> CodecResult<u128> {
		Ok(u128::from_be_bytes(self.read_array()?))
	}

	/// Reads a big-endian i128
	pub fn read_i128_be(&mut self) -> CodecResult<i128> {
		Ok(i128::from_be_bytes(self.read_array()?))
	}

	/// Reads one byte and maps it to an enum variant. Bytes matching no
	/// variant are turned into an error by `on_unknown`.
	pub fn read_u8_enum<T, F>(&mut self, on_unknown: F) -> CodecResult<T>
	where
		T: TryFrom<u8>,
		F: FnOnce(u8) -> CodecError,
	{
		let tag = self.read_u8()?;

		T::try_from(tag).map_err(|_| on_unknown(tag))
	}
}

/// Width of a length prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPrefix {
	/// Single byte length
	U8,
	/// Big-endian u32 length
	U32,
}

impl LengthPrefix {
	/// Largest length the prefix can express
	pub fn max_length(&self) -> usize {
		match self {
			Self::U8 => u8::MAX as usize,
			Self::U32 => u32::MAX as usize,
		}
	}
}

/// Writes a length prefix followed by the bytes
pub fn write_length_prefixed<W: io::Write>(
	dest: &mut W,
	prefix: LengthPrefix,
	bytes: &[u8],
) -> io::Result<()> {
	if bytes.len() > prefix.max_length() {
		return Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			format!(
				"{} bytes do not fit in a {:?} length prefix",
				bytes.len(),
				prefix
			),
		));
	}

	match prefix {
		LengthPrefix::U8 => dest.write_all(&[bytes.len() as u8])?,
		LengthPrefix::U32 => {
			dest.write_all(&(bytes.len() as u32).to_be_bytes())?
		}
	}

	dest.write_all(bytes)
}

/// Writes an element count as a big-endian u32, failing when it does not fit
pub fn write_count<W: io::Write>(
	dest: &mut W,
	count: usize,
	kind: &'static str,
) -> io::Result<()> {
	let count = u32::try_from(count).map_err(|_| {
		io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("{} count {} does not fit in a u32", kind, count),
		)
	})?;

	dest.write_all(&count.to_be_bytes())
}

/// Reads a length prefix and then that many bytes, rejecting lengths outside
/// of `bounds` before touching the body
pub fn read_length_prefixed<'a>(
	data: &mut BytesReader<'a>,
	prefix: LengthPrefix,
	bounds: RangeInclusive<usize>,
	kind: &'static str,
) -> CodecResult<&'a [u8]> {
	let length = match prefix {
		LengthPrefix::U8 => data.read_u8()? as usize,
		LengthPrefix::U32 => data.read_u32_be()? as usize,
	};

	if !bounds.contains(&length) {
		return Err(CodecError::LengthOutOfBounds {
			kind,
			length,
			min: *bounds.start(),
			max: *bounds.end(),
		});
	}

	data.read_bytes(length)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_read_sequentially() {
		let bytes = hex::decode("01000000020000000000000003ff").unwrap();
		let mut reader = BytesReader::new(&bytes);

		assert_eq!(reader.read_u8().unwrap(), 1);
		assert_eq!(reader.read_u32_be().unwrap(), 2);
		assert_eq!(reader.read_u64_be().unwrap(), 3);
		assert_eq!(reader.remaining(), 1);
		assert_eq!(reader.read_bytes(1).unwrap(), &[0xff]);
		assert!(reader.is_empty());
	}

	#[test]
	fn should_underflow_without_advancing() {
		let bytes = [0u8; 3];
		let mut reader = BytesReader::new(&bytes);

		match reader.read_u32_be() {
			Err(CodecError::Underflow {
				requested: 4,
				remaining: 3,
			}) => {}
			other => panic!("Expected underflow, got {:?}", other),
		}

		assert_eq!(reader.position(), 0);
		assert_eq!(reader.read_bytes(3).unwrap().len(), 3);
	}

	#[test]
	fn should_invoke_unknown_tag_handler() {
		#[derive(Debug, PartialEq)]
		struct Small(u8);

		impl TryFrom<u8> for Small {
			type Error = ();

			fn try_from(value: u8) -> Result<Self, Self::Error> {
				(value < 2).then_some(Small(value)).ok_or(())
			}
		}

		let bytes = [1u8, 7];
		let mut reader = BytesReader::new(&bytes);

		let first: Small = reader
			.read_u8_enum(|tag| CodecError::UnknownTag { kind: "small", tag })
			.unwrap();
		assert_eq!(first, Small(1));

		let second = reader.read_u8_enum::<Small, _>(|tag| {
			CodecError::UnknownTag { kind: "small", tag }
		});
		assert!(matches!(
			second,
			Err(CodecError::UnknownTag { kind: "small", tag: 7 })
		));
	}

	#[test]
	fn should_enforce_length_bounds() {
		let mut buffer = vec![];
		write_length_prefixed(&mut buffer, LengthPrefix::U32, b"hello")
			.unwrap();
		assert_eq!(hex::encode(&buffer), "0000000568656c6c6f");

		let mut reader = BytesReader::new(&buffer);
		assert_eq!(
			read_length_prefixed(&mut reader, LengthPrefix::U32, 0..=5, "test")
				.unwrap(),
			b"hello"
		);

		let mut reader = BytesReader::new(&buffer);
		assert!(matches!(
			read_length_prefixed(&mut reader, LengthPrefix::U32, 0..=4, "test"),
			Err(CodecError::LengthOutOfBounds { length: 5, .. })
		));
	}

	#[test]
	fn should_write_counts_that_fit_in_u32() {
		let mut buffer = vec![];

		write_count(&mut buffer, 3, "test").unwrap();
		assert_eq!(buffer, vec![0, 0, 0, 3]);

		write_count(&mut buffer, u32::MAX as usize, "test").unwrap();
		assert_eq!(&buffer[4..], &[0xff; 4]);
	}

	#[cfg(target_pointer_width = "64")]
	#[test]
	fn should_refuse_counts_beyond_u32() {
		let mut buffer = vec![];

		let err = write_count(&mut buffer, u32::MAX as usize + 1, "list")
			.unwrap_err();

		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
		assert!(buffer.is_empty());
	}

	#[test]
	fn should_refuse_oversized_u8_prefix() {
		let mut buffer = vec![];

		assert!(write_length_prefixed(&mut buffer, LengthPrefix::U8, &[0; 256])
			.is_err());
	}
}

use std::{borrow::Borrow, fmt, hash::Hash, io, ops::Deref};

use crate::{
	codec::{
		read_length_prefixed, write_length_prefixed, BytesReader, Codec,
		CodecError, CodecResult, LengthPrefix,
	},
	StacksError, StacksResult,
};

/// Module for Clarity names
pub mod clarity_name;
/// Module for smart contract source code bodies
pub mod code_body;
/// Module for contract names
pub mod contract_name;

/// Specifies how to validate a string for a type
pub trait Validate:
	fmt::Debug + Clone + PartialEq + Eq + PartialOrd + Ord + Hash
{
	/// Error message for invalid strings
	const ERR_MSG: &'static str;
	/// Name used in codec errors
	const KIND: &'static str;
	/// Width of the length prefix on the wire
	const LENGTH_PREFIX: LengthPrefix;
	/// Minimum length in bytes
	const MIN_LENGTH: usize;
	/// Maximum length in bytes of newly created strings
	const MAX_LENGTH: usize;
	/// Maximum length in bytes accepted from the wire. Older rules allowed
	/// longer strings than [Validate::MAX_LENGTH] for some types.
	const MAX_WIRE_LENGTH: usize = Self::MAX_LENGTH;

	/// Validate the string format
	fn validate(text: impl AsRef<str>) -> bool;

	/// Create type from valid string
	fn create(text: impl AsRef<str>) -> Self
	where
		Self: Sized;

	/// Return a reference to the valid string
	fn as_str(&self) -> &str;

	/// Validate length and format, then create the type
	fn new(text: impl AsRef<str>) -> StacksResult<Self>
	where
		Self: Sized,
	{
		Self::with_max_length(text, Self::MAX_LENGTH)
	}

	/// Validate against the wire length limit, for strings that refer to
	/// something already on chain
	fn from_wire(text: impl AsRef<str>) -> StacksResult<Self>
	where
		Self: Sized,
	{
		Self::with_max_length(text, Self::MAX_WIRE_LENGTH)
	}

	/// Validate length up to `max_length` and format, then create the type
	fn with_max_length(
		text: impl AsRef<str>,
		max_length: usize,
	) -> StacksResult<Self>
	where
		Self: Sized,
	{
		let text = text.as_ref();
		let valid_length =
			(Self::MIN_LENGTH..=max_length).contains(&text.len());

		if valid_length && Self::validate(text) {
			Ok(Self::create(text))
		} else {
			Err(StacksError::InvalidArguments(Self::ERR_MSG))
		}
	}
}

/// Validated string of some type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidatedString<T>(T);

impl<T> Validate for ValidatedString<T>
where
	T: Validate,
{
	const ERR_MSG: &'static str = T::ERR_MSG;
	const KIND: &'static str = T::KIND;
	const LENGTH_PREFIX: LengthPrefix = T::LENGTH_PREFIX;
	const MIN_LENGTH: usize = T::MIN_LENGTH;
	const MAX_LENGTH: usize = T::MAX_LENGTH;
	const MAX_WIRE_LENGTH: usize = T::MAX_WIRE_LENGTH;

	fn validate(text: impl AsRef<str>) -> bool {
		T::validate(text)
	}

	fn create(text: impl AsRef<str>) -> Self
	where
		Self: Sized,
	{
		Self(T::create(text))
	}

	fn as_str(&self) -> &str {
		self.0.as_str()
	}
}

impl<T> Codec for ValidatedString<T>
where
	T: Validate,
{
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()> {
		write_length_prefixed(dest, T::LENGTH_PREFIX, self.as_str().as_bytes())
	}

	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized,
	{
		let bytes = read_length_prefixed(
			data,
			T::LENGTH_PREFIX,
			T::MIN_LENGTH..=T::MAX_WIRE_LENGTH,
			T::KIND,
		)?;

		let text = std::str::from_utf8(bytes).map_err(|err| {
			CodecError::InvalidData(format!("{} is not utf8: {}", T::KIND, err))
		})?;

		Self::from_wire(text).map_err(|err| {
			CodecError::InvalidData(format!("{}: {}", T::KIND, err))
		})
	}
}

impl<T> TryFrom<&str> for ValidatedString<T>
where
	T: Validate,
{
	type Error = StacksError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl<T> AsRef<str> for ValidatedString<T>
where
	T: Validate,
{
	fn as_ref(&self) -> &str {
		self.0.as_str()
	}
}

impl<T> Deref for ValidatedString<T>
where
	T: Validate,
{
	type Target = str;

	fn deref(&self) -> &Self::Target {
		self.0.as_str()
	}
}

impl<T> Borrow<str> for ValidatedString<T>
where
	T: Validate,
{
	fn borrow(&self) -> &str {
		self.0.as_str()
	}
}

impl<T> fmt::Display for ValidatedString<T>
where
	T: Validate,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0.as_str())
	}
}

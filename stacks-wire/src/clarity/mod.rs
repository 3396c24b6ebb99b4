/*!
Clarity values as they appear in transaction payloads.

Every value starts with a one byte [ClarityType] id followed by its body.
Variable length bodies carry a big-endian u32 length or element count.
*/
use std::{collections::BTreeMap, fmt, io};

use strum::{EnumIter, FromRepr};

use crate::{
	codec::{
		read_length_prefixed, write_count, write_length_prefixed, BytesReader,
		Codec, CodecError, CodecResult, LengthPrefix,
	},
	numeric::IntegerInput,
	validated_strings::{clarity_name::ClarityName, Validate},
	StacksError, StacksResult,
};

/// Module for principals
pub mod principal;

pub use principal::PrincipalData;

/// Maximum nesting of optionals, responses, lists and tuples
pub const MAX_VALUE_DEPTH: usize = 32;
/// Maximum size of a buffer or string value in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024;

/// Type id byte of a serialized value
#[repr(u8)]
#[derive(FromRepr, EnumIter, PartialEq, Eq, Copy, Clone, Debug)]
pub enum ClarityType {
	/// Signed 128 bit integer
	Int = 0x00,
	/// Unsigned 128 bit integer
	UInt = 0x01,
	/// Byte buffer
	Buffer = 0x02,
	/// Boolean true
	BoolTrue = 0x03,
	/// Boolean false
	BoolFalse = 0x04,
	/// Standard principal
	PrincipalStandard = 0x05,
	/// Contract principal
	PrincipalContract = 0x06,
	/// Ok response
	ResponseOk = 0x07,
	/// Err response
	ResponseErr = 0x08,
	/// Empty optional
	OptionalNone = 0x09,
	/// Present optional
	OptionalSome = 0x0a,
	/// List
	List = 0x0b,
	/// Tuple
	Tuple = 0x0c,
	/// ASCII string
	StringAscii = 0x0d,
	/// UTF-8 string
	StringUtf8 = 0x0e,
}

impl TryFrom<u8> for ClarityType {
	type Error = StacksError;

	fn try_from(value: u8) -> StacksResult<Self> {
		ClarityType::from_repr(value).ok_or(StacksError::InvalidArguments(
			"Unknown Clarity type id",
		))
	}
}

/// A Clarity value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	/// Signed integer
	Int(i128),
	/// Unsigned integer
	UInt(u128),
	/// Byte buffer
	Buffer(Vec<u8>),
	/// Boolean
	Bool(bool),
	/// Principal
	Principal(PrincipalData),
	/// Ok response
	ResponseOk(Box<Value>),
	/// Err response
	ResponseErr(Box<Value>),
	/// Empty optional
	OptionalNone,
	/// Present optional
	OptionalSome(Box<Value>),
	/// List of values
	List(Vec<Value>),
	/// Tuple, sorted by field name
	Tuple(BTreeMap<ClarityName, Value>),
	/// ASCII string
	StringAscii(String),
	/// UTF-8 string
	StringUtf8(String),
}

impl Value {
	/// Signed integer from a native or decimal input
	pub fn int(value: impl Into<IntegerInput>) -> StacksResult<Self> {
		Ok(Self::Int(value.into().to_i128()?))
	}

	/// Unsigned integer from a native or decimal input
	pub fn uint(value: impl Into<IntegerInput>) -> StacksResult<Self> {
		Ok(Self::UInt(value.into().to_u128()?))
	}

	/// Boolean
	pub fn bool(value: bool) -> Self {
		Self::Bool(value)
	}

	/// Byte buffer
	pub fn buffer(bytes: impl Into<Vec<u8>>) -> StacksResult<Self> {
		let bytes = bytes.into();

		if bytes.len() > MAX_VALUE_SIZE {
			return Err(StacksError::InvalidArguments("Buffer is too large"));
		}

		Ok(Self::Buffer(bytes))
	}

	/// Byte buffer from hex, with or without a `0x` prefix
	pub fn buffer_from_hex(data: impl AsRef<str>) -> StacksResult<Self> {
		let data = data.as_ref();

		Self::buffer(hex::decode(data.strip_prefix("0x").unwrap_or(data))?)
	}

	/// ASCII string
	pub fn string_ascii(text: impl Into<String>) -> StacksResult<Self> {
		let text = text.into();

		if !text.is_ascii() {
			return Err(StacksError::InvalidArguments("String is not ASCII"));
		}
		if text.len() > MAX_VALUE_SIZE {
			return Err(StacksError::InvalidArguments("String is too large"));
		}

		Ok(Self::StringAscii(text))
	}

	/// UTF-8 string
	pub fn string_utf8(text: impl Into<String>) -> StacksResult<Self> {
		let text = text.into();

		if text.len() > MAX_VALUE_SIZE {
			return Err(StacksError::InvalidArguments("String is too large"));
		}

		Ok(Self::StringUtf8(text))
	}

	/// Principal parsed from `SP…` or `SP….contract-name`
	pub fn principal(principal: &str) -> StacksResult<Self> {
		Ok(Self::Principal(principal.parse()?))
	}

	/// Present optional
	pub fn some(value: Value) -> Self {
		Self::OptionalSome(Box::new(value))
	}

	/// Empty optional
	pub fn none() -> Self {
		Self::OptionalNone
	}

	/// Ok response
	pub fn ok(value: Value) -> Self {
		Self::ResponseOk(Box::new(value))
	}

	/// Err response
	pub fn err(value: Value) -> Self {
		Self::ResponseErr(Box::new(value))
	}

	/// List of values
	pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
		Self::List(values.into_iter().collect())
	}

	/// Tuple from name and value pairs. Names must be unique.
	pub fn tuple<'a>(
		fields: impl IntoIterator<Item = (&'a str, Value)>,
	) -> StacksResult<Self> {
		let mut tuple = BTreeMap::new();

		for (name, value) in fields {
			if tuple.insert(ClarityName::new(name)?, value).is_some() {
				return Err(StacksError::InvalidArguments(
					"Duplicate tuple field",
				));
			}
		}

		Ok(Self::Tuple(tuple))
	}

	/// Type id of the value
	pub fn clarity_type(&self) -> ClarityType {
		match self {
			Self::Int(_) => ClarityType::Int,
			Self::UInt(_) => ClarityType::UInt,
			Self::Buffer(_) => ClarityType::Buffer,
			Self::Bool(true) => ClarityType::BoolTrue,
			Self::Bool(false) => ClarityType::BoolFalse,
			Self::Principal(principal) => principal.clarity_type(),
			Self::ResponseOk(_) => ClarityType::ResponseOk,
			Self::ResponseErr(_) => ClarityType::ResponseErr,
			Self::OptionalNone => ClarityType::OptionalNone,
			Self::OptionalSome(_) => ClarityType::OptionalSome,
			Self::List(_) => ClarityType::List,
			Self::Tuple(_) => ClarityType::Tuple,
			Self::StringAscii(_) => ClarityType::StringAscii,
			Self::StringUtf8(_) => ClarityType::StringUtf8,
		}
	}

	/// Field of a tuple value
	pub fn tuple_field(&self, name: &str) -> Option<&Value> {
		match self {
			Self::Tuple(fields) => fields.get(name),
			_ => None,
		}
	}

	/// Bytes of a buffer value
	pub fn as_buffer(&self) -> Option<&[u8]> {
		match self {
			Self::Buffer(bytes) => Some(bytes),
			_ => None,
		}
	}

	fn deserialize_with_depth(
		data: &mut BytesReader<'_>,
		depth: usize,
	) -> CodecResult<Self> {
		if depth > MAX_VALUE_DEPTH {
			return Err(CodecError::DepthExceeded(MAX_VALUE_DEPTH));
		}

		let clarity_type: ClarityType =
			data.read_u8_enum(|tag| CodecError::UnknownTag {
				kind: "clarity value",
				tag,
			})?;

		let value = match clarity_type {
			ClarityType::Int => Self::Int(data.read_i128_be()?),
			ClarityType::UInt => Self::UInt(data.read_u128_be()?),
			ClarityType::Buffer => Self::Buffer(
				read_length_prefixed(
					data,
					LengthPrefix::U32,
					0..=MAX_VALUE_SIZE,
					"buffer",
				)?
				.to_vec(),
			),
			ClarityType::BoolTrue => Self::Bool(true),
			ClarityType::BoolFalse => Self::Bool(false),
			ClarityType::PrincipalStandard
			| ClarityType::PrincipalContract => Self::Principal(
				PrincipalData::deserialize_body(clarity_type, data)?,
			),
			ClarityType::ResponseOk => Self::ok(Self::deserialize_with_depth(
				data,
				depth + 1,
			)?),
			ClarityType::ResponseErr => Self::err(
				Self::deserialize_with_depth(data, depth + 1)?,
			),
			ClarityType::OptionalNone => Self::OptionalNone,
			ClarityType::OptionalSome => Self::some(
				Self::deserialize_with_depth(data, depth + 1)?,
			),
			ClarityType::List => {
				let length = data.read_u32_be()? as usize;

				// Every element takes at least one byte
				if length > data.remaining() {
					return Err(CodecError::LengthOutOfBounds {
						kind: "list",
						length,
						min: 0,
						max: data.remaining(),
					});
				}

				let values = (0..length)
					.map(|_| Self::deserialize_with_depth(data, depth + 1))
					.collect::<CodecResult<Vec<_>>>()?;

				Self::List(values)
			}
			ClarityType::Tuple => {
				let length = data.read_u32_be()? as usize;

				// Every field takes at least a name and a type id
				if length > data.remaining() / 3 {
					return Err(CodecError::LengthOutOfBounds {
						kind: "tuple",
						length,
						min: 0,
						max: data.remaining() / 3,
					});
				}

				let mut fields = BTreeMap::new();

				for _ in 0..length {
					let name = ClarityName::codec_deserialize(data)?;
					let value = Self::deserialize_with_depth(data, depth + 1)?;

					if fields.insert(name.clone(), value).is_some() {
						return Err(CodecError::InvalidData(format!(
							"Duplicate tuple field {}",
							name
						)));
					}
				}

				Self::Tuple(fields)
			}
			ClarityType::StringAscii => {
				let bytes = read_length_prefixed(
					data,
					LengthPrefix::U32,
					0..=MAX_VALUE_SIZE,
					"string-ascii",
				)?;

				if !bytes.is_ascii() {
					return Err(CodecError::InvalidData(
						"string-ascii contains non ASCII bytes".into(),
					));
				}

				Self::StringAscii(String::from_utf8_lossy(bytes).into_owned())
			}
			ClarityType::StringUtf8 => {
				let bytes = read_length_prefixed(
					data,
					LengthPrefix::U32,
					0..=MAX_VALUE_SIZE,
					"string-utf8",
				)?;

				let text = std::str::from_utf8(bytes).map_err(|err| {
					CodecError::InvalidData(format!("string-utf8: {}", err))
				})?;

				Self::StringUtf8(text.to_string())
			}
		};

		Ok(value)
	}
}

impl Codec for Value {
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()> {
		match self {
			Self::Principal(principal) => return principal.codec_serialize(dest),
			_ => dest.write_all(&[self.clarity_type() as u8])?,
		}

		match self {
			Self::Int(value) => dest.write_all(&value.to_be_bytes()),
			Self::UInt(value) => dest.write_all(&value.to_be_bytes()),
			Self::Buffer(bytes) => {
				write_length_prefixed(dest, LengthPrefix::U32, bytes)
			}
			Self::StringAscii(text) | Self::StringUtf8(text) => {
				write_length_prefixed(dest, LengthPrefix::U32, text.as_bytes())
			}
			Self::ResponseOk(value)
			| Self::ResponseErr(value)
			| Self::OptionalSome(value) => value.codec_serialize(dest),
			Self::List(values) => {
				write_count(dest, values.len(), "list")?;

				values
					.iter()
					.try_for_each(|value| value.codec_serialize(dest))
			}
			Self::Tuple(fields) => {
				write_count(dest, fields.len(), "tuple")?;

				for (name, value) in fields {
					name.codec_serialize(dest)?;
					value.codec_serialize(dest)?;
				}

				Ok(())
			}
			Self::Bool(_) | Self::OptionalNone | Self::Principal(_) => Ok(()),
		}
	}

	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized,
	{
		Self::deserialize_with_depth(data, 0)
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(value) => write!(f, "{}", value),
			Self::UInt(value) => write!(f, "u{}", value),
			Self::Buffer(bytes) => write!(f, "0x{}", hex::encode(bytes)),
			Self::Bool(value) => write!(f, "{}", value),
			Self::Principal(principal) => write!(f, "'{}", principal),
			Self::ResponseOk(value) => write!(f, "(ok {})", value),
			Self::ResponseErr(value) => write!(f, "(err {})", value),
			Self::OptionalNone => write!(f, "none"),
			Self::OptionalSome(value) => write!(f, "(some {})", value),
			Self::List(values) => {
				write!(f, "(list")?;
				for value in values {
					write!(f, " {}", value)?;
				}
				write!(f, ")")
			}
			Self::Tuple(fields) => {
				write!(f, "(tuple")?;
				for (name, value) in fields {
					write!(f, " ({} {})", name, value)?;
				}
				write!(f, ")")
			}
			Self::StringAscii(text) => write!(f, "{:?}", text),
			Self::StringUtf8(text) => write!(f, "u{:?}", text),
		}
	}
}

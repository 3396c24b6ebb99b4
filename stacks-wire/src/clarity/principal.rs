use std::{fmt, io, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ClarityType;
use crate::{
	address::StacksAddress,
	codec::{BytesReader, Codec, CodecError, CodecResult},
	validated_strings::{contract_name::ContractName, Validate},
	StacksError, StacksResult,
};

/// A standard or contract principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PrincipalData {
	/// An account address
	Standard(StacksAddress),
	/// A smart contract, identified by its deployer and name
	Contract(StacksAddress, ContractName),
}

impl PrincipalData {
	/// The address of the account or contract deployer
	pub fn address(&self) -> &StacksAddress {
		match self {
			Self::Standard(address) | Self::Contract(address, _) => address,
		}
	}

	/// Value type id of this principal
	pub fn clarity_type(&self) -> ClarityType {
		match self {
			Self::Standard(_) => ClarityType::PrincipalStandard,
			Self::Contract(..) => ClarityType::PrincipalContract,
		}
	}

	/// Reads the principal body once its type id has been consumed
	pub(crate) fn deserialize_body(
		clarity_type: ClarityType,
		data: &mut BytesReader<'_>,
	) -> CodecResult<Self> {
		match clarity_type {
			ClarityType::PrincipalStandard => {
				Ok(Self::Standard(StacksAddress::codec_deserialize(data)?))
			}
			ClarityType::PrincipalContract => Ok(Self::Contract(
				StacksAddress::codec_deserialize(data)?,
				ContractName::codec_deserialize(data)?,
			)),
			other => Err(CodecError::InvalidData(format!(
				"Expected a principal, got {:?}",
				other
			))),
		}
	}
}

impl Codec for PrincipalData {
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()> {
		dest.write_all(&[self.clarity_type() as u8])?;

		match self {
			Self::Standard(address) => address.codec_serialize(dest),
			Self::Contract(address, name) => {
				address.codec_serialize(dest)?;
				name.codec_serialize(dest)
			}
		}
	}

	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized,
	{
		let clarity_type = data.read_u8_enum(|tag| CodecError::UnknownTag {
			kind: "principal",
			tag,
		})?;

		Self::deserialize_body(clarity_type, data)
	}
}

impl FromStr for PrincipalData {
	type Err = StacksError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.split_once('.') {
			Some((address, name)) => Ok(Self::Contract(
				address.parse()?,
				ContractName::from_wire(name)?,
			)),
			None => Ok(Self::Standard(s.parse()?)),
		}
	}
}

impl TryFrom<String> for PrincipalData {
	type Error = StacksError;

	fn try_from(value: String) -> StacksResult<Self> {
		value.parse()
	}
}

impl From<PrincipalData> for String {
	fn from(value: PrincipalData) -> Self {
		value.to_string()
	}
}

impl From<StacksAddress> for PrincipalData {
	fn from(value: StacksAddress) -> Self {
		Self::Standard(value)
	}
}

impl fmt::Display for PrincipalData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Standard(address) => write!(f, "{}", address),
			Self::Contract(address, name) => write!(f, "{}.{}", address, name),
		}
	}
}

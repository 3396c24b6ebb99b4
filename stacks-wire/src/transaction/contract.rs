use std::io;

use strum::{EnumIter, FromRepr};

use crate::{
	address::StacksAddress,
	clarity::Value,
	codec::{write_count, BytesReader, Codec, CodecError, CodecResult},
	validated_strings::{
		clarity_name::ClarityName, code_body::CodeBody,
		contract_name::ContractName,
	},
	StacksError, StacksResult,
};

/// Clarity language version of a versioned contract deploy
#[repr(u8)]
#[derive(FromRepr, EnumIter, PartialEq, Eq, Copy, Clone, Debug)]
pub enum ClarityVersion {
	/// Clarity 1
	Clarity1 = 1,
	/// Clarity 2
	Clarity2 = 2,
	/// Clarity 3
	Clarity3 = 3,
}

impl TryFrom<u8> for ClarityVersion {
	type Error = StacksError;

	fn try_from(value: u8) -> StacksResult<Self> {
		ClarityVersion::from_repr(value).ok_or(StacksError::InvalidArguments(
			"Unknown Clarity version",
		))
	}
}

/// Body of a contract call payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCallPayload {
	/// Deployer of the contract
	pub address: StacksAddress,
	/// Name of the contract
	pub contract_name: ContractName,
	/// Public function to call
	pub function_name: ClarityName,
	/// Arguments, in order
	pub function_args: Vec<Value>,
}

impl Codec for ContractCallPayload {
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()> {
		self.address.codec_serialize(dest)?;
		self.contract_name.codec_serialize(dest)?;
		self.function_name.codec_serialize(dest)?;

		write_count(dest, self.function_args.len(), "argument")?;

		self.function_args
			.iter()
			.try_for_each(|arg| arg.codec_serialize(dest))
	}

	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized,
	{
		let address = StacksAddress::codec_deserialize(data)?;
		let contract_name = ContractName::codec_deserialize(data)?;
		let function_name = ClarityName::codec_deserialize(data)?;

		let count = data.read_u32_be()? as usize;

		// Every argument takes at least its type id
		if count > data.remaining() {
			return Err(CodecError::LengthOutOfBounds {
				kind: "function arguments",
				length: count,
				min: 0,
				max: data.remaining(),
			});
		}

		let function_args = (0..count)
			.map(|_| Value::codec_deserialize(data))
			.collect::<CodecResult<Vec<_>>>()?;

		Ok(Self {
			address,
			contract_name,
			function_name,
			function_args,
		})
	}
}

/// Body of a contract deploy payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartContractPayload {
	/// Name of the new contract
	pub name: ContractName,
	/// Clarity source
	pub code_body: CodeBody,
}

impl Codec for SmartContractPayload {
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()> {
		self.name.codec_serialize(dest)?;
		self.code_body.codec_serialize(dest)
	}

	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized,
	{
		Ok(Self {
			name: ContractName::codec_deserialize(data)?,
			code_body: CodeBody::codec_deserialize(data)?,
		})
	}
}

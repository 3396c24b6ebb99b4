/*!
Types for the payload of a Stacks transaction
*/
use std::io;

use tracing::{trace, warn};

use super::{
	coinbase::{CoinbaseBytes, VrfProof},
	contract::{ClarityVersion, ContractCallPayload, SmartContractPayload},
	tenure_change::{
		ConsensusHash, StacksBlockId, TenureChangeCause, TenureChangePayload,
	},
	token_transfer_memo::TokenTransferMemo,
	TransactionPayloadId,
};
use crate::{
	clarity::{PrincipalData, Value},
	codec::{BytesReader, Codec, CodecError, CodecResult},
	crypto::{hash160::Hash160Hasher, Hashing},
	numeric::IntegerInput,
	validated_strings::{
		clarity_name::ClarityName, code_body::CodeBody,
		contract_name::ContractName, Validate,
	},
	StacksResult,
};

/// Body of a token transfer payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransferPayload {
	/// Receiver of the tokens
	pub recipient: PrincipalData,
	/// Amount in micro-STX
	pub amount: u64,
	/// Memo
	pub memo: TokenTransferMemo,
}

/// A transaction payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
	/// STX transfer
	TokenTransfer(TokenTransferPayload),
	/// Contract call
	ContractCall(ContractCallPayload),
	/// Contract deploy
	SmartContract(SmartContractPayload),
	/// Contract deploy with an explicit Clarity version
	VersionedSmartContract(ClarityVersion, SmartContractPayload),
	/// Microblock fork evidence. Only the type byte is encoded, the two
	/// conflicting headers are not supported.
	PoisonMicroblock,
	/// Coinbase
	Coinbase(CoinbaseBytes),
	/// Coinbase paid to another principal
	CoinbaseToAltRecipient(CoinbaseBytes, PrincipalData),
	/// Nakamoto coinbase
	NakamotoCoinbase(CoinbaseBytes, Option<PrincipalData>, VrfProof),
	/// Tenure change
	TenureChange(TenureChangePayload),
}

impl TransactionPayload {
	/// Token transfer from a recipient principal string, an amount and a
	/// memo text
	pub fn token_transfer(
		recipient: &str,
		amount: impl Into<IntegerInput>,
		memo: &str,
	) -> StacksResult<Self> {
		Ok(Self::TokenTransfer(TokenTransferPayload {
			recipient: recipient.parse()?,
			amount: amount.into().to_u64()?,
			memo: TokenTransferMemo::from_text(memo)?,
		}))
	}

	/// Contract call from address, contract and function name strings
	pub fn contract_call(
		contract_address: &str,
		contract_name: &str,
		function_name: &str,
		function_args: Vec<Value>,
	) -> StacksResult<Self> {
		Ok(Self::ContractCall(ContractCallPayload {
			address: contract_address.parse()?,
			contract_name: ContractName::from_wire(contract_name)?,
			function_name: ClarityName::new(function_name)?,
			function_args,
		}))
	}

	/// Contract deploy
	pub fn smart_contract(
		contract_name: &str,
		code_body: &str,
	) -> StacksResult<Self> {
		Ok(Self::SmartContract(SmartContractPayload {
			name: ContractName::new(contract_name)?,
			code_body: CodeBody::new(code_body)?,
		}))
	}

	/// Contract deploy for a given Clarity version
	pub fn versioned_smart_contract(
		clarity_version: ClarityVersion,
		contract_name: &str,
		code_body: &str,
	) -> StacksResult<Self> {
		Ok(Self::VersionedSmartContract(
			clarity_version,
			SmartContractPayload {
				name: ContractName::new(contract_name)?,
				code_body: CodeBody::new(code_body)?,
			},
		))
	}

	/// Coinbase from hex bytes
	pub fn coinbase(coinbase_hex: &str) -> StacksResult<Self> {
		Ok(Self::Coinbase(CoinbaseBytes::from_hex(coinbase_hex)?))
	}

	/// Coinbase paid to the given principal
	pub fn coinbase_to_alt_recipient(
		coinbase_hex: &str,
		recipient: &str,
	) -> StacksResult<Self> {
		Ok(Self::CoinbaseToAltRecipient(
			CoinbaseBytes::from_hex(coinbase_hex)?,
			recipient.parse()?,
		))
	}

	/// Nakamoto coinbase with an optional recipient and a VRF proof
	pub fn nakamoto_coinbase(
		coinbase_hex: &str,
		recipient: Option<&str>,
		vrf_proof_hex: &str,
	) -> StacksResult<Self> {
		Ok(Self::NakamotoCoinbase(
			CoinbaseBytes::from_hex(coinbase_hex)?,
			recipient.map(str::parse).transpose()?,
			VrfProof::from_hex(vrf_proof_hex)?,
		))
	}

	/// Tenure change from hex hashes
	#[allow(clippy::too_many_arguments)]
	pub fn tenure_change(
		tenure_consensus_hash: &str,
		prev_tenure_consensus_hash: &str,
		burn_view_consensus_hash: &str,
		previous_tenure_end: &str,
		previous_tenure_blocks: impl Into<IntegerInput>,
		cause: TenureChangeCause,
		pubkey_hash: &str,
	) -> StacksResult<Self> {
		Ok(Self::TenureChange(TenureChangePayload {
			tenure_consensus_hash: ConsensusHash::from_hex(
				tenure_consensus_hash,
			)?,
			prev_tenure_consensus_hash: ConsensusHash::from_hex(
				prev_tenure_consensus_hash,
			)?,
			burn_view_consensus_hash: ConsensusHash::from_hex(
				burn_view_consensus_hash,
			)?,
			previous_tenure_end: StacksBlockId::from_hex(previous_tenure_end)?,
			previous_tenure_blocks: previous_tenure_blocks.into().to_u32()?,
			cause,
			pubkey_hash: Hash160Hasher::from_hex(pubkey_hash)?,
		}))
	}

	/// Type byte of the payload
	pub fn payload_id(&self) -> TransactionPayloadId {
		match self {
			Self::TokenTransfer(_) => TransactionPayloadId::TokenTransfer,
			Self::ContractCall(_) => TransactionPayloadId::ContractCall,
			Self::SmartContract(_) => TransactionPayloadId::SmartContract,
			Self::VersionedSmartContract(..) => {
				TransactionPayloadId::VersionedSmartContract
			}
			Self::PoisonMicroblock => TransactionPayloadId::PoisonMicroblock,
			Self::Coinbase(_) => TransactionPayloadId::Coinbase,
			Self::CoinbaseToAltRecipient(..) => {
				TransactionPayloadId::CoinbaseToAltRecipient
			}
			Self::NakamotoCoinbase(..) => TransactionPayloadId::NakamotoCoinbase,
			Self::TenureChange(_) => TransactionPayloadId::TenureChange,
		}
	}
}

fn serialize_optional_principal<W: io::Write>(
	principal: &Option<PrincipalData>,
	dest: &mut W,
) -> io::Result<()> {
	match principal {
		Some(principal) => {
			Value::some(Value::Principal(principal.clone())).codec_serialize(dest)
		}
		None => Value::none().codec_serialize(dest),
	}
}

fn deserialize_optional_principal(
	data: &mut BytesReader<'_>,
) -> CodecResult<Option<PrincipalData>> {
	match Value::codec_deserialize(data)? {
		Value::OptionalNone => Ok(None),
		Value::OptionalSome(value) => match *value {
			Value::Principal(principal) => Ok(Some(principal)),
			other => Err(CodecError::InvalidData(format!(
				"Expected an optional principal, got (some {})",
				other
			))),
		},
		other => Err(CodecError::InvalidData(format!(
			"Expected an optional principal, got {}",
			other
		))),
	}
}

impl Codec for TransactionPayload {
	fn codec_serialize<W: io::Write>(&self, dest: &mut W) -> io::Result<()> {
		dest.write_all(&[self.payload_id() as u8])?;

		match self {
			Self::TokenTransfer(TokenTransferPayload {
				recipient,
				amount,
				memo,
			}) => {
				recipient.codec_serialize(dest)?;
				dest.write_all(&amount.to_be_bytes())?;
				memo.codec_serialize(dest)
			}
			Self::ContractCall(payload) => payload.codec_serialize(dest),
			Self::SmartContract(payload) => payload.codec_serialize(dest),
			Self::VersionedSmartContract(version, payload) => {
				dest.write_all(&[*version as u8])?;
				payload.codec_serialize(dest)
			}
			Self::PoisonMicroblock => {
				warn!("Poison microblock payload body is not supported, writing the type byte only");
				Ok(())
			}
			Self::Coinbase(coinbase) => coinbase.codec_serialize(dest),
			Self::CoinbaseToAltRecipient(coinbase, recipient) => {
				coinbase.codec_serialize(dest)?;
				recipient.codec_serialize(dest)
			}
			Self::NakamotoCoinbase(coinbase, recipient, vrf_proof) => {
				coinbase.codec_serialize(dest)?;
				serialize_optional_principal(recipient, dest)?;
				vrf_proof.codec_serialize(dest)
			}
			Self::TenureChange(payload) => payload.codec_serialize(dest),
		}
	}

	fn codec_deserialize(data: &mut BytesReader<'_>) -> CodecResult<Self>
	where
		Self: Sized,
	{
		let payload_id: TransactionPayloadId =
			data.read_u8_enum(CodecError::UnrecognizedPayloadType)?;

		trace!("Decoding {} payload at offset {}", payload_id, data.position());

		let payload = match payload_id {
			TransactionPayloadId::TokenTransfer => {
				Self::TokenTransfer(TokenTransferPayload {
					recipient: PrincipalData::codec_deserialize(data)?,
					amount: data.read_u64_be()?,
					memo: TokenTransferMemo::codec_deserialize(data)?,
				})
			}
			TransactionPayloadId::ContractCall => {
				Self::ContractCall(ContractCallPayload::codec_deserialize(data)?)
			}
			TransactionPayloadId::SmartContract => Self::SmartContract(
				SmartContractPayload::codec_deserialize(data)?,
			),
			TransactionPayloadId::VersionedSmartContract => {
				let version = data.read_u8_enum(|tag| CodecError::UnknownTag {
					kind: "clarity version",
					tag,
				})?;

				Self::VersionedSmartContract(
					version,
					SmartContractPayload::codec_deserialize(data)?,
				)
			}
			TransactionPayloadId::PoisonMicroblock => {
				warn!("Poison microblock payload body is not supported, reading the type byte only");
				Self::PoisonMicroblock
			}
			TransactionPayloadId::Coinbase => {
				Self::Coinbase(CoinbaseBytes::codec_deserialize(data)?)
			}
			TransactionPayloadId::CoinbaseToAltRecipient => {
				Self::CoinbaseToAltRecipient(
					CoinbaseBytes::codec_deserialize(data)?,
					PrincipalData::codec_deserialize(data)?,
				)
			}
			TransactionPayloadId::NakamotoCoinbase => Self::NakamotoCoinbase(
				CoinbaseBytes::codec_deserialize(data)?,
				deserialize_optional_principal(data)?,
				VrfProof::codec_deserialize(data)?,
			),
			TransactionPayloadId::TenureChange => Self::TenureChange(
				TenureChangePayload::codec_deserialize(data)?,
			),
		};

		Ok(payload)
	}
}

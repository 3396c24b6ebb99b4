use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value as Json};
use stacks_wire::{
	clarity::Value,
	codec::Codec,
	crypto::Hashing,
	transaction::{TokenTransferPayload, TransactionPayload},
};
use tracing::info;

use super::print_json;

#[derive(Parser, Debug, Clone)]
pub struct PayloadArgs {
	#[command(subcommand)]
	subcommand: PayloadSubcommand,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum PayloadSubcommand {
	/// Decode a hex encoded payload
	Decode { hex: String },
	/// Encode a token transfer
	TokenTransfer {
		/// Standard or contract principal receiving the tokens
		#[clap(short, long)]
		recipient: String,
		/// Amount in micro-STX
		#[clap(short, long)]
		amount: String,
		/// Memo text, at most 34 bytes
		#[clap(short, long, default_value = "")]
		memo: String,
	},
	/// Encode a contract call
	ContractCall {
		/// Address of the contract deployer
		#[clap(short, long)]
		address: String,
		/// Name of the contract
		#[clap(short, long)]
		contract_name: String,
		/// Function to call
		#[clap(short, long)]
		function_name: String,
		/// Hex encoded Clarity values, in order
		#[clap(long = "arg")]
		args: Vec<String>,
	},
}

#[derive(Debug, Clone, Serialize)]
struct EncodedPayload {
	hex: String,
}

pub fn payload(payload_args: &PayloadArgs) -> anyhow::Result<()> {
	match &payload_args.subcommand {
		PayloadSubcommand::Decode { hex } => {
			let bytes = hex::decode(hex.trim_start_matches("0x"))?;
			let payload = TransactionPayload::deserialize(&bytes)?;

			info!("Decoded {} payload", payload.payload_id());

			print_json(&describe_payload(&payload))
		}
		PayloadSubcommand::TokenTransfer {
			recipient,
			amount,
			memo,
		} => {
			let payload = TransactionPayload::token_transfer(
				recipient,
				amount.as_str(),
				memo,
			)?;

			print_json(&EncodedPayload {
				hex: hex::encode(payload.serialize_to_vec()),
			})
		}
		PayloadSubcommand::ContractCall {
			address,
			contract_name,
			function_name,
			args,
		} => {
			let function_args = args
				.iter()
				.map(|arg| {
					Value::deserialize(hex::decode(arg.trim_start_matches("0x"))?)
						.map_err(anyhow::Error::from)
				})
				.collect::<anyhow::Result<Vec<_>>>()?;

			let payload = TransactionPayload::contract_call(
				address,
				contract_name,
				function_name,
				function_args,
			)?;

			print_json(&EncodedPayload {
				hex: hex::encode(payload.serialize_to_vec()),
			})
		}
	}
}

fn describe_payload(payload: &TransactionPayload) -> Json {
	let body = match payload {
		TransactionPayload::TokenTransfer(TokenTransferPayload {
			recipient,
			amount,
			memo,
		}) => json!({
			"recipient": recipient.to_string(),
			"amount": amount.to_string(),
			"memo": memo.to_string(),
		}),
		TransactionPayload::ContractCall(call) => json!({
			"address": call.address.to_string(),
			"contract_name": call.contract_name.to_string(),
			"function_name": call.function_name.to_string(),
			"function_args": call
				.function_args
				.iter()
				.map(ToString::to_string)
				.collect::<Vec<_>>(),
		}),
		TransactionPayload::SmartContract(contract) => json!({
			"name": contract.name.to_string(),
			"code_body": contract.code_body.to_string(),
		}),
		TransactionPayload::VersionedSmartContract(version, contract) => json!({
			"clarity_version": *version as u8,
			"name": contract.name.to_string(),
			"code_body": contract.code_body.to_string(),
		}),
		TransactionPayload::PoisonMicroblock => json!({}),
		TransactionPayload::Coinbase(coinbase) => json!({
			"coinbase": coinbase.to_hex(),
		}),
		TransactionPayload::CoinbaseToAltRecipient(coinbase, recipient) => {
			json!({
				"coinbase": coinbase.to_hex(),
				"recipient": recipient.to_string(),
			})
		}
		TransactionPayload::NakamotoCoinbase(coinbase, recipient, vrf_proof) => {
			json!({
				"coinbase": coinbase.to_hex(),
				"recipient": recipient.as_ref().map(ToString::to_string),
				"vrf_proof": vrf_proof.to_hex(),
			})
		}
		TransactionPayload::TenureChange(tenure_change) => json!({
			"tenure_consensus_hash": tenure_change.tenure_consensus_hash.to_hex(),
			"prev_tenure_consensus_hash":
				tenure_change.prev_tenure_consensus_hash.to_hex(),
			"burn_view_consensus_hash":
				tenure_change.burn_view_consensus_hash.to_hex(),
			"previous_tenure_end": tenure_change.previous_tenure_end.to_hex(),
			"previous_tenure_blocks": tenure_change.previous_tenure_blocks,
			"cause": format!("{:?}", tenure_change.cause),
			"pubkey_hash": tenure_change.pubkey_hash.to_hex(),
		}),
	};

	json!({
		"type": payload.payload_id().to_string(),
		"payload": body,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn describes_token_transfers() {
		let payload = TransactionPayload::token_transfer(
			"SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7",
			1_000_000,
			"hi",
		)
		.unwrap();

		let description = describe_payload(&payload);

		assert_eq!(description["type"], "TokenTransfer");
		assert_eq!(description["payload"]["amount"], "1000000");
		assert_eq!(description["payload"]["memo"], "hi");
	}
}

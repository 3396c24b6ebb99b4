use clap::Parser;
use serde::Serialize;
use stacks_wire::{
	crypto::{secp256k1::Secp256k1, signature::VrsSignature, Hashing},
	message::{hash_message, sign_message, verify_message},
	StacksPrivateKey, StacksPublicKey,
};

use super::print_json;

#[derive(Parser, Debug, Clone)]
pub struct MessageArgs {
	#[command(subcommand)]
	subcommand: MessageSubcommand,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum MessageSubcommand {
	/// Sign a message with a hex private key
	Sign {
		#[clap(short, long)]
		private_key: String,
		message: String,
	},
	/// Verify a VRS signature over a message
	Verify {
		#[clap(short, long)]
		public_key: String,
		#[clap(short, long)]
		signature: String,
		message: String,
	},
}

#[derive(Debug, Clone, Serialize)]
struct SignedMessage {
	hash: String,
	signature_vrs: String,
	signature_rsv: String,
}

#[derive(Debug, Clone, Serialize)]
struct Verification {
	valid: bool,
}

pub fn message(message_args: &MessageArgs) -> anyhow::Result<()> {
	let secp = Secp256k1::new();

	match &message_args.subcommand {
		MessageSubcommand::Sign {
			private_key,
			message,
		} => {
			let private_key = StacksPrivateKey::from_hex(private_key)?;
			let signature = sign_message(&secp, message, &private_key)?;

			print_json(&SignedMessage {
				hash: hash_message(message).to_hex(),
				signature_vrs: signature.to_hex(),
				signature_rsv: signature.to_rsv().to_hex(),
			})
		}
		MessageSubcommand::Verify {
			public_key,
			signature,
			message,
		} => {
			let public_key = StacksPublicKey::from_hex(public_key)?;
			let signature = VrsSignature::from_hex(signature)?;

			print_json(&Verification {
				valid: verify_message(&secp, message, &signature, &public_key)?,
			})
		}
	}
}

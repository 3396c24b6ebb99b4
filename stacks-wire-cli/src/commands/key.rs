use clap::Parser;
use serde::Serialize;
use stacks_wire::{
	crypto::{secp256k1::Secp256k1, wif::Wif},
	Network, StacksPrivateKey,
};

use super::print_json;

#[derive(Parser, Debug, Clone)]
pub struct KeyArgs {
	#[command(subcommand)]
	subcommand: KeySubcommand,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum KeySubcommand {
	/// Generate a random private key
	Generate {
		/// Use the uncompressed public key form
		#[clap(long)]
		uncompressed: bool,
	},
}

#[derive(Debug, Clone, Serialize)]
struct KeyDescription {
	private_key: String,
	public_key: String,
	address: String,
	wif: String,
}

pub fn key(key_args: &KeyArgs, network: Network) -> anyhow::Result<()> {
	match &key_args.subcommand {
		KeySubcommand::Generate { uncompressed } => {
			let secp = Secp256k1::new();
			let private_key = StacksPrivateKey::random(!uncompressed);
			let public_key = private_key.public_key(&secp);

			print_json(&KeyDescription {
				private_key: private_key.to_hex(),
				public_key: public_key.to_hex(),
				address: public_key.address_for(network).to_string(),
				wif: Wif::new(network, private_key).to_string(),
			})
		}
	}
}

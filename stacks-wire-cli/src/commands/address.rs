use clap::Parser;
use serde::Serialize;
use stacks_wire::{
	address::{bitcoin::BitcoinNetwork, pox::PoxAddress},
	codec::Codec,
	crypto::Hashing,
	Network, StacksPublicKey,
};

use super::print_json;

#[derive(Parser, Debug, Clone)]
pub struct AddressArgs {
	#[command(subcommand)]
	subcommand: AddressSubcommand,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum AddressSubcommand {
	/// Derive the single signature address of a hex public key
	FromKey { public_key: String },
	/// Build the PoX reward tuple of a bitcoin address
	Pox { address: String },
}

#[derive(Debug, Clone, Serialize)]
struct KeyAddress {
	address: String,
	hash160: String,
}

#[derive(Debug, Clone, Serialize)]
struct RewardAddress {
	btc_address: String,
	version: u8,
	hash: String,
	tuple: String,
	tuple_hex: String,
}

pub fn address(
	address_args: &AddressArgs,
	network: Network,
	bitcoin_network: BitcoinNetwork,
) -> anyhow::Result<()> {
	match &address_args.subcommand {
		AddressSubcommand::FromKey { public_key } => {
			let public_key = StacksPublicKey::from_hex(public_key)?;

			print_json(&KeyAddress {
				address: public_key.address_for(network).to_string(),
				hash160: public_key.hash160().to_hex(),
			})
		}
		AddressSubcommand::Pox { address } => {
			let pox = PoxAddress::from_btc_address(address)?;
			let tuple = pox.to_tuple();

			print_json(&RewardAddress {
				btc_address: pox.to_btc_address(bitcoin_network)?,
				version: pox.version() as u8,
				hash: hex::encode(pox.hash()),
				tuple: tuple.to_string(),
				tuple_hex: hex::encode(tuple.serialize_to_vec()),
			})
		}
	}
}

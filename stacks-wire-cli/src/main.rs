//! Command line front end for stacks-wire.
//!
//! Encodes and decodes transaction payloads, derives addresses, generates
//! keys and signs messages. Results are printed as JSON.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stacks_wire::{address::bitcoin::BitcoinNetwork, Network};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
	commands::{
		address::{address, AddressArgs},
		init::init,
		key::{key, KeyArgs},
		message::{message, MessageArgs},
		payload::{payload, PayloadArgs},
	},
	config::read_config,
};

mod commands;
mod config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Config file path
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Stacks network, overrides the config file
	#[arg(long, global = true)]
	network: Option<Network>,

	/// Bitcoin network, overrides the config file
	#[arg(long, global = true)]
	bitcoin_network: Option<BitcoinNetwork>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
	/// Write a default config file
	Init,
	/// Encode and decode transaction payloads
	Payload(PayloadArgs),
	/// Derive addresses
	Address(AddressArgs),
	/// Generate keys
	Key(KeyArgs),
	/// Sign and verify messages
	Message(MessageArgs),
}

fn main() -> Result<(), anyhow::Error> {
	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.with(tracing_subscriber::EnvFilter::from_default_env())
		.init();

	let args = Cli::parse();

	if let Command::Init = args.command {
		return init(args.config.as_deref());
	}

	let config = read_config(args.config.as_deref())?;
	let network = args.network.unwrap_or(config.network);
	let bitcoin_network = args.bitcoin_network.unwrap_or(config.bitcoin_network);

	tracing::debug!(%network, %bitcoin_network, "Resolved networks");

	match args.command {
		Command::Init => unreachable!("Handled before reading the config"),
		Command::Payload(payload_args) => payload(&payload_args),
		Command::Address(address_args) => {
			address(&address_args, network, bitcoin_network)
		}
		Command::Key(key_args) => key(&key_args, network),
		Command::Message(message_args) => message(&message_args),
	}
}

use std::{
	fs::{create_dir_all, read_to_string},
	io::Write,
	path::{Path, PathBuf},
};

use anyhow::anyhow;
use serde::Deserialize;
use stacks_wire::{address::bitcoin::BitcoinNetwork, Network};
use tracing::debug;

pub const GENERATED_CONFIG: &str = include_str!("../generated_config.toml");

pub fn default_config_path() -> anyhow::Result<PathBuf> {
	let home_path =
		dirs::home_dir().ok_or_else(|| anyhow!("Could not find home dir"))?;

	Ok(home_path.join(".config/stacks-wire/config.toml"))
}

pub fn generate_config(config_path: &Path) -> anyhow::Result<()> {
	if let Some(parent) = config_path.parent() {
		create_dir_all(parent)?;
	}

	if config_path.exists() {
		println!("Config file already exists at {}", config_path.display());
		return Ok(());
	}

	let mut config_file = std::fs::OpenOptions::new()
		.create_new(true)
		.write(true)
		.open(config_path)?;

	config_file.write_all(GENERATED_CONFIG.as_bytes())?;
	config_file.flush()?;

	println!("Config file created at {}", config_path.display());

	Ok(())
}

/// Reads the config file. A missing file at the default location falls back
/// to the defaults, a missing file given explicitly is an error.
pub fn read_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
	let (config_path, explicit) = match config_path {
		Some(path) => (path.to_path_buf(), true),
		None => (default_config_path()?, false),
	};

	if !explicit && !config_path.exists() {
		debug!(
			"No config at {}, using defaults",
			config_path.display()
		);
		return Ok(Config::default());
	}

	let config_file = read_to_string(&config_path)?;

	Ok(toml::from_str(&config_file)?)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
	pub network: Network,
	pub bitcoin_network: BitcoinNetwork,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			network: Network::Testnet,
			bitcoin_network: BitcoinNetwork::Testnet,
		}
	}
}

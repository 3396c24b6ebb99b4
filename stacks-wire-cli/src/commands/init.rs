use std::path::Path;

use crate::config::{default_config_path, generate_config};

pub fn init(config_path: Option<&Path>) -> anyhow::Result<()> {
	match config_path {
		Some(path) => generate_config(path),
		None => generate_config(&default_config_path()?),
	}
}

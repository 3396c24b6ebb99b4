use std::io::stdout;

use serde::Serialize;

pub mod address;
pub mod init;
pub mod key;
pub mod message;
pub mod payload;

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
	serde_json::to_writer_pretty(stdout(), value)?;
	println!();

	Ok(())
}

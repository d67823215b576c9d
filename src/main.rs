//! Secure-link gate binary.

// crates.io
use clap::Parser;
use color_eyre::Result;
// self
use secure_link_gate::{cli::Cli, obs, server};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let cli = Cli::parse();

	obs::init_tracing(&cli.log_level, cli.log_format.as_deref())?;

	let config = cli.into_config()?;

	server::serve(config).await?;

	Ok(())
}

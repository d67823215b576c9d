//! Command-line interface. Flags and environment variables override the optional JSON file.

// crates.io
use clap::Parser;
// self
use crate::{_prelude::*, config::GateConfig, error::ConfigError};

/// Forward-auth gate that mints secure-link tokens and delivers them through ntfy.
#[derive(Debug, Parser)]
#[command(name = "secure-link-gate", version, about, long_about = None)]
pub struct Cli {
	/// Path to a JSON configuration file
	#[arg(short, long, env = "SECURE_LINK_GATE_CONFIG")]
	pub config: Option<PathBuf>,

	/// Host to bind to [default: 127.0.0.1]
	#[arg(long, env = "SECURE_LINK_GATE_HOST")]
	pub host: Option<String>,

	/// Port to listen on [default: 8000]
	#[arg(short, long, env = "SECURE_LINK_GATE_PORT")]
	pub port: Option<u16>,

	/// Public domain used to build authorized URLs (e.g. tv.example.com)
	#[arg(short, long, env = "SECURE_LINK_GATE_DOMAIN")]
	pub domain: Option<String>,

	/// Full ntfy URL including the topic
	#[arg(long, env = "SECURE_LINK_GATE_NTFY")]
	pub ntfy: Option<String>,

	/// File holding the current token [default: .last_token]
	#[arg(long, env = "SECURE_LINK_GATE_TOKEN_FILE")]
	pub token_file: Option<PathBuf>,

	/// Seconds to wait for ntfy before giving up on an alert [default: 5]
	#[arg(long, env = "SECURE_LINK_GATE_NOTIFY_TIMEOUT")]
	pub notify_timeout: Option<u64>,

	/// Title attached to every alert [default: Security Alert]
	#[arg(long, env = "SECURE_LINK_GATE_ALERT_TITLE")]
	pub alert_title: Option<String>,

	/// Path extension admitted without a token (repeatable, e.g. --allow-extension .js)
	#[arg(long = "allow-extension", value_name = "EXT")]
	pub allow_extensions: Vec<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info", env = "SECURE_LINK_GATE_LOG_LEVEL")]
	pub log_level: String,

	/// Log format (text, json)
	#[arg(long, env = "SECURE_LINK_GATE_LOG_FORMAT")]
	pub log_format: Option<String>,
}
impl Cli {
	/// Resolves the effective configuration and validates it.
	pub fn into_config(self) -> Result<GateConfig, ConfigError> {
		let mut config = match &self.config {
			Some(path) => GateConfig::from_json_file(path)?,
			None => GateConfig::default(),
		};

		if let Some(host) = self.host {
			config.host = host;
		}
		if let Some(port) = self.port {
			config.port = port;
		}
		if let Some(domain) = self.domain {
			config.public_domain = domain;
		}
		if let Some(ntfy) = self.ntfy {
			config.ntfy_url = ntfy;
		}
		if let Some(path) = self.token_file {
			config.token_path = path;
		}
		if let Some(secs) = self.notify_timeout {
			config.notify_timeout_secs = secs;
		}
		if let Some(title) = self.alert_title {
			config.alert_title = title;
		}
		if !self.allow_extensions.is_empty() {
			config.exempt_extensions = self.allow_extensions;
		}

		config.validate()?;

		Ok(config)
	}
}

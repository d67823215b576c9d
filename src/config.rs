//! Startup configuration, constructed once and handed to the gate by value.

// std
use std::fs;
// self
use crate::{_prelude::*, error::ConfigError};

/// Everything the gate needs to run, fixed for the process lifetime.
///
/// Deserializes from JSON with every field optional; missing fields take the defaults below.
/// Call [`GateConfig::validate`] before use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
	/// Listen host. Defaults to loopback.
	pub host: String,
	/// Listen port. Defaults to `8000`.
	pub port: u16,
	/// Public domain (optionally with port) used to build authorized URLs. Required.
	pub public_domain: String,
	/// Full ntfy topic URL alerts are posted to. Required.
	pub ntfy_url: String,
	/// Token file location. Defaults to `.last_token` in the working directory.
	pub token_path: PathBuf,
	/// Upper bound for a single alert delivery, in seconds.
	pub notify_timeout_secs: u64,
	/// Title attached to every alert.
	pub alert_title: String,
	/// Path extensions (e.g. `.js`) admitted without a credential. Empty by default.
	pub exempt_extensions: Vec<String>,
}
impl GateConfig {
	/// Default listen host.
	pub const DEFAULT_HOST: &str = "127.0.0.1";
	/// Default listen port.
	pub const DEFAULT_PORT: u16 = 8000;
	/// Default token file.
	pub const DEFAULT_TOKEN_PATH: &str = ".last_token";
	/// Default alert delivery bound, in seconds.
	pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 5;
	/// Default alert title.
	pub const DEFAULT_ALERT_TITLE: &str = "Security Alert";

	/// Loads a JSON configuration file.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let bytes = fs::read(path)
			.map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

		serde_json::from_slice(&bytes)
			.map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
	}

	/// Checks the required fields and their shapes.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.authorized_base()?;
		self.notify_url()?;

		if self.notify_timeout_secs == 0 {
			return Err(ConfigError::InvalidTimeout);
		}

		Ok(())
	}

	/// `https://<public_domain>/`, the base every authorized URL is built on.
	pub fn authorized_base(&self) -> Result<Url, ConfigError> {
		let domain = self.public_domain.as_str();

		if domain.is_empty() {
			return Err(ConfigError::MissingDomain);
		}

		let invalid = || ConfigError::InvalidDomain { domain: domain.to_owned() };

		if domain.contains(['/', '?', '#', '@', '\\']) || domain.chars().any(char::is_whitespace)
		{
			return Err(invalid());
		}

		let base = Url::parse(&format!("https://{domain}/")).map_err(|_| invalid())?;

		if base.host_str().is_none_or(str::is_empty) {
			return Err(invalid());
		}

		Ok(base)
	}

	/// Parsed ntfy topic URL.
	pub fn notify_url(&self) -> Result<Url, ConfigError> {
		if self.ntfy_url.is_empty() {
			return Err(ConfigError::MissingNotifyUrl);
		}

		let url = Url::parse(&self.ntfy_url)
			.map_err(|source| ConfigError::InvalidNotifyUrl { source })?;

		match url.scheme() {
			"http" | "https" => Ok(url),
			scheme => Err(ConfigError::UnsupportedNotifyScheme { scheme: scheme.to_owned() }),
		}
	}

	/// Alert delivery bound.
	pub fn notify_timeout(&self) -> Duration {
		Duration::from_secs(self.notify_timeout_secs)
	}
}
impl Default for GateConfig {
	fn default() -> Self {
		Self {
			host: Self::DEFAULT_HOST.into(),
			port: Self::DEFAULT_PORT,
			public_domain: String::new(),
			ntfy_url: String::new(),
			token_path: PathBuf::from(Self::DEFAULT_TOKEN_PATH),
			notify_timeout_secs: Self::DEFAULT_NOTIFY_TIMEOUT_SECS,
			alert_title: Self::DEFAULT_ALERT_TITLE.into(),
			exempt_extensions: Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;

	fn valid() -> GateConfig {
		GateConfig {
			public_domain: "tv.example.com".into(),
			ntfy_url: "https://ntfy.sh/gate-topic".into(),
			..GateConfig::default()
		}
	}

	#[test]
	fn defaults_match_documented_values() {
		let config = GateConfig::default();

		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.port, 8000);
		assert_eq!(config.token_path, PathBuf::from(".last_token"));
		assert_eq!(config.notify_timeout(), Duration::from_secs(5));
		assert!(config.exempt_extensions.is_empty());
	}

	#[test]
	fn domain_is_required_and_must_be_bare() {
		assert!(valid().validate().is_ok());
		assert!(matches!(
			GateConfig { public_domain: String::new(), ..valid() }.validate(),
			Err(ConfigError::MissingDomain)
		));

		for domain in ["https://tv.example.com", "tv.example.com/live", "tv example", "u@tv"] {
			let config = GateConfig { public_domain: domain.into(), ..valid() };

			assert!(
				matches!(config.validate(), Err(ConfigError::InvalidDomain { .. })),
				"`{domain}` should be rejected."
			);
		}
	}

	#[test]
	fn domain_may_carry_a_port() {
		let config = GateConfig { public_domain: "tv.example.com:8443".into(), ..valid() };
		let base = config.authorized_base().expect("Domain with port should be accepted.");

		assert_eq!(base.as_str(), "https://tv.example.com:8443/");
	}

	#[test]
	fn ntfy_url_must_be_http() {
		assert!(matches!(
			GateConfig { ntfy_url: String::new(), ..valid() }.validate(),
			Err(ConfigError::MissingNotifyUrl)
		));
		assert!(matches!(
			GateConfig { ntfy_url: "not a url".into(), ..valid() }.validate(),
			Err(ConfigError::InvalidNotifyUrl { .. })
		));
		assert!(matches!(
			GateConfig { ntfy_url: "ftp://ntfy.sh/topic".into(), ..valid() }.validate(),
			Err(ConfigError::UnsupportedNotifyScheme { .. })
		));
	}

	#[test]
	fn zero_timeout_is_rejected() {
		assert!(matches!(
			GateConfig { notify_timeout_secs: 0, ..valid() }.validate(),
			Err(ConfigError::InvalidTimeout)
		));
	}

	#[test]
	fn json_file_fills_missing_fields_with_defaults() {
		let path = env::temp_dir().join(format!("secure_link_gate_config_{}.json", process::id()));

		fs::write(
			&path,
			r#"{"public_domain":"tv.example.com","ntfy_url":"https://ntfy.sh/t","port":9000}"#,
		)
		.expect("Failed to write config fixture.");

		let config = GateConfig::from_json_file(&path).expect("Config fixture should parse.");

		fs::remove_file(&path).ok();

		assert_eq!(config.port, 9000);
		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.public_domain, "tv.example.com");
		assert!(config.validate().is_ok());
	}

	#[test]
	fn missing_file_reports_path() {
		let err = GateConfig::from_json_file("/nonexistent/secure-link-gate.json")
			.expect_err("Missing file should fail.");

		assert!(matches!(err, ConfigError::ReadFile { .. }));
		assert!(err.to_string().contains("/nonexistent/secure-link-gate.json"));
	}
}

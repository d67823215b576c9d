//! Gate-level error types shared across the store, configuration, and server layers.

// self
use crate::_prelude::*;

/// Gate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical gate error exposed by public APIs.
///
/// Authorization denials are never errors; they are reported through
/// [`Decision`](crate::gate::Decision). Alert delivery failures are logged by the dispatch task
/// and surface as [`NotifyError`](crate::notify::NotifyError) only to callers awaiting it.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token store failure; the gate cannot decide without its state.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Listener or runtime I/O failure.
	#[error("I/O error occurred while running the gate server.")]
	Io(#[from] std::io::Error),
}

/// Configuration and validation failures raised at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: ReqwestError,
	},
	/// No public domain was supplied.
	#[error("A public domain is required to build authorized URLs.")]
	MissingDomain,
	/// The public domain cannot be used as the authority of an HTTPS URL.
	#[error("Public domain `{domain}` is not a bare host.")]
	InvalidDomain {
		/// Rejected domain string.
		domain: String,
	},
	/// No ntfy topic URL was supplied.
	#[error("An ntfy topic URL is required to deliver tokens.")]
	MissingNotifyUrl,
	/// The ntfy topic URL cannot be parsed.
	#[error("Ntfy topic URL is invalid.")]
	InvalidNotifyUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The ntfy topic URL uses a scheme other than HTTP(S).
	#[error("Ntfy topic URL must use http or https, not `{scheme}`.")]
	UnsupportedNotifyScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// Notification timeout must be positive.
	#[error("The notification timeout must be at least one second.")]
	InvalidTimeout,
	/// Configuration file could not be read.
	#[error("Failed to read configuration file {}.", .path.display())]
	ReadFile {
		/// Configuration file path.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration file is not valid JSON for [`GateConfig`](crate::config::GateConfig).
	#[error("Failed to parse configuration file {}.", .path.display())]
	ParseFile {
		/// Configuration file path.
		path: PathBuf,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a reqwest builder failure inside [`ConfigError`].
	pub fn http_client_build(source: ReqwestError) -> Self {
		Self::HttpClientBuild { source }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn config_error_lifts_into_gate_error() {
		let error: Error = ConfigError::MissingDomain.into();

		assert!(matches!(error, Error::Config(ConfigError::MissingDomain)));
		assert_eq!(error.to_string(), "A public domain is required to build authorized URLs.");
	}

	#[test]
	fn io_error_keeps_source() {
		let error: Error =
			std::io::Error::new(std::io::ErrorKind::AddrInUse, "port 8000 taken").into();
		let source = StdError::source(&error).expect("I/O error should be exposed as the source.");

		assert_eq!(source.to_string(), "port 8000 taken");
	}
}

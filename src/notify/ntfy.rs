//! [ntfy](https://ntfy.sh) topic publisher built on reqwest.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	notify::{Alert, NotifyError, NotifyFuture, Notifier},
};

/// Priority header value attached to every alert.
pub const PRIORITY: &str = "high";
/// Tags header value attached to every alert.
pub const TAGS: &str = "warning,lock";

/// Publishes alerts as plain-text POSTs to a fixed ntfy topic URL.
///
/// Each message carries `Title`, `Priority: high`, `Tags: warning,lock`, and a `view` action
/// button pointing at the authorized URL.
#[derive(Clone, Debug)]
pub struct NtfyNotifier {
	client: ReqwestClient,
	topic: Url,
}
impl NtfyNotifier {
	/// Builds a notifier with its own client bounded by `timeout`.
	pub fn new(topic: Url, timeout: Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self::with_client(client, topic))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, topic: Url) -> Self {
		Self { client, topic }
	}
}
impl Notifier for NtfyNotifier {
	fn send(&self, alert: Alert) -> NotifyFuture<'_> {
		Box::pin(async move {
			let action = format!("view, Open, {}", alert.authorized_url);
			let response = self
				.client
				.post(self.topic.clone())
				.header("Title", alert.title)
				.header("Priority", PRIORITY)
				.header("Tags", TAGS)
				.header("Actions", action)
				.body(alert.message)
				.send()
				.await?;
			let status = response.status();

			if !status.is_success() {
				return Err(NotifyError::Rejected { status: status.as_u16() });
			}

			Ok(())
		})
	}
}

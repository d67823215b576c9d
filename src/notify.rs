//! Out-of-band delivery of freshly issued authorized URLs.
//!
//! The gate never awaits delivery on its decision path: it spawns the [`Notifier::send`] future
//! under a bounded timeout and only logs the outcome. The channel's own guarantees (best-effort,
//! at-most-once) are inherited, not strengthened.

pub mod ntfy;

pub use ntfy::NtfyNotifier;

// self
use crate::_prelude::*;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Boxed future returned by [`Notifier::send`].
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + 'a + Send>>;

/// Delivery channel that hands a new token to its legitimate owner.
pub trait Notifier
where
	Self: Send + Sync,
{
	/// Delivers `alert` once; retries are the caller's concern.
	fn send(&self, alert: Alert) -> NotifyFuture<'_>;
}

/// Alert announcing that a new token was issued.
#[derive(Clone)]
pub struct Alert {
	/// Short headline shown by the notification client.
	pub title: String,
	/// Plain-text body, which embeds the authorized URL.
	pub message: String,
	/// Ready-to-use URL carrying the new token.
	pub authorized_url: Url,
}
impl Alert {
	/// Builds the alert sent after a credential-less request triggered an issuance.
	pub fn token_issued(title: impl Into<String>, authorized_url: Url) -> Self {
		let message = format!("New access attempt. Authorized URL: {authorized_url}");

		Self { title: title.into(), message, authorized_url }
	}
}
impl Debug for Alert {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Alert")
			.field("title", &self.title)
			.field("authorized_url", &"<redacted>")
			.finish()
	}
}

/// Delivery failures. They never change the HTTP outcome, only what gets logged.
#[derive(Debug, ThisError)]
pub enum NotifyError {
	/// The channel answered with a non-success status.
	#[error("Notification endpoint rejected the alert with status {status}.")]
	Rejected {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// Transport failure (DNS, TCP, TLS, client-side timeout).
	#[error("Network error occurred while delivering the alert.")]
	Transport {
		/// Transport-specific error.
		#[source]
		source: BoxError,
	},
	/// Delivery did not finish within the configured bound.
	#[error("Alert delivery timed out after {timeout:?}.")]
	TimedOut {
		/// Bound that elapsed.
		timeout: Duration,
	},
}
impl NotifyError {
	/// Wraps a transport-specific error.
	pub fn transport(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}
impl From<ReqwestError> for NotifyError {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}

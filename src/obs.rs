//! Observability helpers: subscriber setup, validation spans, and optional metrics.
//!
//! # Feature Flags
//!
//! - Spans named `secure_link_gate.validate` carry a `stage` field and are always emitted.
//! - Enable `metrics` to increment `secure_link_gate_decision_total` (labeled by `decision`) and
//!   `secure_link_gate_notify_total` (labeled by `outcome`).

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// crates.io
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
// self
use crate::_prelude::*;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `level`; `format` selects `json` or the default text output.
pub fn init_tracing(
	level: &str,
	format: Option<&str>,
) -> Result<(), tracing_subscriber::util::TryInitError> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	let subscriber = tracing_subscriber::registry().with(filter);

	match format {
		Some("json") => subscriber.with(fmt::layer().json()).try_init(),
		_ => subscriber.with(fmt::layer()).try_init(),
	}
}

/// Outcome labels recorded for each alert delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotifyOutcome {
	/// The channel accepted the alert.
	Delivered,
	/// The channel rejected the alert or could not be reached.
	Failed,
	/// Delivery exceeded its bound.
	TimedOut,
}
impl NotifyOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			NotifyOutcome::Delivered => "delivered",
			NotifyOutcome::Failed => "failed",
			NotifyOutcome::TimedOut => "timed_out",
		}
	}
}
impl Display for NotifyOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

// crates.io
use tracing::instrument::Instrumented;
// self
use crate::_prelude::*;

/// Span wrapper used around each validation.
#[derive(Clone, Debug)]
pub struct GateSpan {
	span: tracing::Span,
}
impl GateSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: &'static str) -> Self {
		Self { span: tracing::info_span!("secure_link_gate.validate", stage) }
	}

	/// Returns the underlying span, e.g. to attach spawned work to it.
	pub fn span(&self) -> &tracing::Span {
		&self.span
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = GateSpan::new("instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}

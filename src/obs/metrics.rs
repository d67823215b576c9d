// self
use crate::{gate::Decision, obs::NotifyOutcome};

/// Records a gate decision via the global metrics recorder (when enabled).
pub fn record_decision(decision: Decision) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("secure_link_gate_decision_total", "decision" => decision.label())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = decision;
	}
}

/// Records an alert delivery outcome via the global metrics recorder (when enabled).
pub fn record_notify(outcome: NotifyOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("secure_link_gate_notify_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counter incremented once per flow outcome.
pub const FLOW_COUNTER: &str = "goal_tracker_flow_total";

/// Bumps [`FLOW_COUNTER`] for `kind`/`outcome`; a no-op without the `metrics` feature.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

// self
use crate::obs::{Stage, StageOutcome};

/// Records a stage outcome via the global metrics recorder (when enabled).
pub fn record_stage_outcome(stage: Stage, outcome: StageOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth1_probe_stage_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}

/// Records the outcome of `result` for `stage` and hands the result back.
pub fn record_stage_result<T, E>(stage: Stage, result: Result<T, E>) -> Result<T, E> {
	match &result {
		Ok(_) => record_stage_outcome(stage, StageOutcome::Success),
		Err(_) => record_stage_outcome(stage, StageOutcome::Failure),
	}

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_stage_result_passes_values_through() {
		record_stage_outcome(Stage::Dispatch, StageOutcome::Attempt);

		assert_eq!(record_stage_result::<_, ()>(Stage::Sign, Ok(3)), Ok(3));
		assert_eq!(record_stage_result::<(), _>(Stage::FetchSecret, Err("down")), Err("down"));
	}
}

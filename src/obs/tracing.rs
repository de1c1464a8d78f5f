// self
use crate::{
	_prelude::*,
	obs::{self, Stage, StageOutcome},
};

/// Observation scope for one probe stage: a `oauth1_probe.stage` span plus the stage counters.
///
/// [`StageSpan::observe`] and [`StageSpan::observe_sync`] record the attempt before the body
/// runs and the success or failure after it, so callers never pair the calls by hand.
#[derive(Clone, Debug)]
pub struct StageSpan {
	stage: Stage,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a span tagged with the stage and the consumer key it runs for.
	pub fn new(stage: Stage, consumer_key: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth1_probe.stage", stage = stage.as_str(), consumer_key);

			Self { stage, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = consumer_key;

			Self { stage }
		}
	}

	/// Stage this span observes.
	pub fn stage(&self) -> Stage {
		self.stage
	}

	/// Runs `fut` inside the span and records its outcome.
	pub async fn observe<Fut, T, E>(self, fut: Fut) -> Result<T, E>
	where
		Fut: Future<Output = Result<T, E>>,
	{
		obs::record_stage_outcome(self.stage, StageOutcome::Attempt);

		#[cfg(feature = "tracing")]
		let result = {
			use tracing::Instrument;

			fut.instrument(self.span.clone()).await
		};
		#[cfg(not(feature = "tracing"))]
		let result = fut.await;

		obs::record_stage_result(self.stage, result)
	}

	/// Runs `f` with the span entered and records its outcome.
	pub fn observe_sync<T, E>(self, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
		obs::record_stage_outcome(self.stage, StageOutcome::Attempt);

		#[cfg(feature = "tracing")]
		let result = self.span.in_scope(f);
		#[cfg(not(feature = "tracing"))]
		let result = f();

		obs::record_stage_result(self.stage, result)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn observe_sync_hands_back_the_result() {
		let span = StageSpan::new(Stage::Sign, "java-test-key");

		assert_eq!(span.stage(), Stage::Sign);
		assert_eq!(span.observe_sync(|| Ok::<_, ()>(7)), Ok(7));
		assert_eq!(
			StageSpan::new(Stage::Sign, "java-test-key").observe_sync(|| Err::<(), _>("bad")),
			Err("bad")
		);
	}

	#[tokio::test]
	async fn observe_awaits_the_stage_body() {
		let value = StageSpan::new(Stage::Dispatch, "java-test-key")
			.observe(async { Ok::<_, ()>(42) })
			.await;

		assert_eq!(value, Ok(42));
	}
}

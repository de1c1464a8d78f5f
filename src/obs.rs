//! Optional observability helpers for probe stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth1_probe.stage` with the `stage`
//!   field.
//! - Enable `metrics` to increment the `oauth1_probe_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Stages of a probe run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Resolving the consumer secret.
	FetchSecret,
	/// Computing the signature and header.
	Sign,
	/// Sending the signed request.
	Dispatch,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::FetchSecret => "fetch_secret",
			Stage::Sign => "sign",
			Stage::Dispatch => "dispatch",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

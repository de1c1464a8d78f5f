//! OAuth 1.0a request probe: fetch a consumer secret from a key proxy, sign a form POST with
//! HMAC-SHA1, and report the status line the endpoint answers with.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod keys;
pub mod oauth;
pub mod obs;
pub mod request;
pub mod runner;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ConsumerKey,
		http::ReqwestHttpClient,
		keys::{MemorySecretSource, SecretSource},
		oauth::{FixedClock, FixedNonce, Signer},
		runner::ReqwestProbe,
	};

	/// Nonce pinned by [`pinned_signer`].
	pub const TEST_NONCE: &str = "fixednonce";
	/// UNIX timestamp pinned by [`pinned_signer`].
	pub const TEST_TIMESTAMP: i64 = 1_700_000_000;

	/// Builds a reqwest HTTP client with redirects disabled, matching the probe defaults.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		ReqwestHttpClient::with_timeout(std::time::Duration::from_secs(10))
			.expect("Failed to build Reqwest client for tests.")
	}

	/// HMAC-SHA1 signer with a fixed nonce and timestamp so signatures are reproducible.
	pub fn pinned_signer() -> Signer {
		Signer::default()
			.with_nonce_source(Arc::new(FixedNonce::new(TEST_NONCE)))
			.with_clock(Arc::new(FixedClock::new(TEST_TIMESTAMP)))
	}

	/// Constructs a [`ReqwestProbe`] whose secret comes from an in-memory source seeded with
	/// `consumer_key` -> `consumer_secret`.
	pub fn build_reqwest_test_probe(
		consumer_key: &str,
		consumer_secret: &str,
	) -> (ReqwestProbe, Arc<MemorySecretSource>) {
		let key = ConsumerKey::new(consumer_key).expect("Test consumer key should be valid.");
		let source_backend = Arc::new(MemorySecretSource::default());

		source_backend
			.insert(key.clone(), consumer_secret)
			.expect("Test consumer secret should be non-empty.");

		let secrets: Arc<dyn SecretSource> = source_backend.clone();
		let probe = ReqwestProbe::with_http_client(test_reqwest_http_client(), secrets, key)
			.with_signer(pinned_signer());

		(probe, source_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "cli")]
use {clap as _, color_eyre as _, tokio as _, tracing_subscriber as _};
#[cfg(test)] use {color_eyre as _, httpmock as _};

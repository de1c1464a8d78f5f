//! Consumer secret sources: the HTTP key proxy, a key directory on disk, and an in-memory map.

pub mod file;
pub mod memory;
pub mod proxy;

pub use file::FileSecretSource;
pub use memory::MemorySecretSource;
pub use proxy::ProxySecretSource;

// self
use crate::{_prelude::*, auth::ConsumerKey, error::TransportError, http::StatusLine};

/// Future returned by [`SecretSource::fetch_secret`].
pub type SecretFuture<'a> =
	Pin<Box<dyn Future<Output = Result<crate::auth::ConsumerSecret, SecretError>> + 'a + Send>>;

/// Lookup contract implemented by every consumer secret backend.
///
/// Implementations must never hand back an empty secret; the
/// [`ConsumerSecret`](crate::auth::ConsumerSecret) type enforces this, and a backend holding
/// an empty value reports [`SecretError::Empty`].
pub trait SecretSource
where
	Self: Send + Sync,
{
	/// Resolves the secret paired with `key`.
	fn fetch_secret<'a>(&'a self, key: &'a ConsumerKey) -> SecretFuture<'a>;
}

/// Error type produced by [`SecretSource`] implementations.
#[derive(Debug, ThisError)]
pub enum SecretError {
	/// Key proxy answered with something other than `200`.
	#[error("Key proxy answered `{status}` for consumer key `{key}`.")]
	UnexpectedStatus {
		/// Consumer key that was requested.
		key: String,
		/// Status line returned by the proxy.
		status: StatusLine,
	},
	/// Backend returned an empty secret.
	#[error("Consumer secret for `{key}` is empty.")]
	Empty {
		/// Consumer key that was requested.
		key: String,
	},
	/// Backend has no secret for the key.
	#[error("No consumer secret is registered for `{key}`.")]
	NotFound {
		/// Consumer key that was requested.
		key: String,
	},
	/// Backend returned bytes that are not UTF-8.
	#[error("Consumer secret for `{key}` is not valid UTF-8.")]
	InvalidEncoding {
		/// Consumer key that was requested.
		key: String,
	},
	/// Proxy base URL cannot carry path segments.
	#[error("Key proxy URL {url} cannot be used as a base URL.")]
	InvalidProxyUrl {
		/// Configured base URL.
		url: String,
	},
	/// Key file exists but could not be read.
	#[error("Failed to read consumer secret from {path}.")]
	Read {
		/// Path of the key file.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Proxy could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn secret_error_converts_into_probe_error_with_source() {
		let secret_error = SecretError::NotFound { key: "java-test-key".into() };
		let message = secret_error.to_string();
		let probe_error: Error = secret_error.into();

		assert!(matches!(probe_error, Error::Secret(_)));
		assert!(probe_error.to_string().contains("java-test-key"));

		let source = StdError::source(&probe_error)
			.expect("Probe error should expose the original secret error as its source.");

		assert_eq!(source.to_string(), message);
	}

	#[test]
	fn unexpected_status_renders_the_status_line() {
		let err = SecretError::UnexpectedStatus {
			key: "java-test-key".into(),
			status: StatusLine {
				version: "HTTP/1.1".into(),
				code: 404,
				reason: Some("Not Found".into()),
			},
		};

		assert_eq!(
			err.to_string(),
			"Key proxy answered `HTTP/1.1 404 Not Found` for consumer key `java-test-key`."
		);
	}
}

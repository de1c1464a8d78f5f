//! Probe-level error types shared across secret sources, the signer, and the transport.

// self
use crate::_prelude::*;

/// Probe-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical probe error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Consumer secret could not be obtained.
	#[error("{0}")]
	Secret(
		#[from]
		#[source]
		crate::keys::SecretError,
	),
	/// Request could not be signed.
	#[error(transparent)]
	Signing(#[from] crate::oauth::SigningError),
	/// Received request failed signature verification.
	#[error(transparent)]
	Verification(#[from] crate::oauth::VerificationError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Configuration field holding the URL.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A form parameter was not written as `name=value`.
	#[error("Form parameter `{raw}` must use the name=value form.")]
	InvalidParameter {
		/// Raw parameter text as supplied.
		raw: String,
	},
	/// The configured consumer key is not a valid identifier.
	#[error("Consumer key is invalid.")]
	InvalidConsumerKey(#[from] crate::auth::IdentifierError),
	/// The per-request timeout is zero.
	#[error("Timeout must be at least one second.")]
	ZeroTimeout,
	/// Configuration file could not be read.
	#[error("Failed to read configuration file {path}.")]
	ReadFile {
		/// Path that failed to load.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration file contents do not match the expected layout.
	#[error("Configuration is malformed at `{}`.", .source.path())]
	Malformed {
		/// Structured parsing failure carrying the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Signature method label is not recognized.
	#[error("Signature method `{0}` is not supported.")]
	UnknownSignatureMethod(String),
	/// HTTP method label is not recognized.
	#[error("HTTP method `{0}` is not supported.")]
	UnknownHttpMethod(String),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Request URL, without query.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error raised while calling `url`.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		let mut url = url.clone();

		url.set_query(None);

		Self::Network { url: url.to_string(), source: Box::new(src) }
	}
}

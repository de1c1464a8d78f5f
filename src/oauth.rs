//! OAuth 1.0a request signing and verification (RFC 5849 section 3).
//!
//! [`Signer`] turns a [`FormRequest`](crate::request::FormRequest) plus consumer (and optional
//! token) credentials into a [`SignedRequest`] carrying the `Authorization` header. The
//! building blocks stay public so callers can inspect each stage:
//!
//! - [`percent_encode`] applies the RFC 3986 unreserved set.
//! - [`signature_base_string`] collects query, form body, and protocol parameters.
//! - [`compute_signature`] keys HMAC-SHA1, HMAC-SHA256, or PLAINTEXT with
//!   `enc(consumer_secret)&enc(token_secret)`.
//! - [`AuthorizationHeader`] renders and parses the `OAuth` header, and [`verify`] recomputes
//!   a received signature the way a validating reverse proxy does.

mod base_string;
mod encode;
mod header;
mod signer;
mod verify;

pub use base_string::*;
pub use encode::*;
pub use header::*;
pub use signer::*;
pub use verify::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ConsumerKey, IdentifierError},
	error::ConfigError,
};

/// Protocol version advertised in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

/// Signature methods understood by the signer and verifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
	#[default]
	/// HMAC over SHA-1, base64 encoded.
	#[serde(rename = "HMAC-SHA1")]
	HmacSha1,
	/// HMAC over SHA-256, base64 encoded.
	#[serde(rename = "HMAC-SHA256")]
	HmacSha256,
	/// The signing key itself, for use over TLS only.
	#[serde(rename = "PLAINTEXT")]
	Plaintext,
}
impl SignatureMethod {
	/// Returns the `oauth_signature_method` value.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
			SignatureMethod::HmacSha256 => "HMAC-SHA256",
			SignatureMethod::Plaintext => "PLAINTEXT",
		}
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SignatureMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"HMAC-SHA1" => Ok(SignatureMethod::HmacSha1),
			"HMAC-SHA256" => Ok(SignatureMethod::HmacSha256),
			"PLAINTEXT" => Ok(SignatureMethod::Plaintext),
			_ => Err(ConfigError::UnknownSignatureMethod(s.to_owned())),
		}
	}
}

/// The `oauth_*` protocol parameters of one signature, minus the signature itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthParameters {
	/// `oauth_consumer_key`.
	pub consumer_key: ConsumerKey,
	/// `oauth_token`, absent for two-legged requests.
	pub token: Option<AccessToken>,
	/// `oauth_signature_method`.
	pub signature_method: SignatureMethod,
	/// `oauth_timestamp`, seconds since the UNIX epoch.
	pub timestamp: i64,
	/// `oauth_nonce`.
	pub nonce: String,
	/// `oauth_version`; optional on the wire.
	pub version: Option<String>,
	/// `realm`; rendered in the header but never signed.
	pub realm: Option<String>,
}
impl OAuthParameters {
	/// Protocol pairs that enter the signature base string, sorted by name.
	pub fn signed_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![
			("oauth_consumer_key", self.consumer_key.to_string()),
			("oauth_nonce", self.nonce.clone()),
			("oauth_signature_method", self.signature_method.as_str().to_owned()),
			("oauth_timestamp", self.timestamp.to_string()),
		];

		if let Some(token) = &self.token {
			pairs.push(("oauth_token", token.to_string()));
		}
		if let Some(version) = &self.version {
			pairs.push(("oauth_version", version.clone()));
		}

		pairs
	}
}

/// Failures raised while building a signature.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SigningError {
	/// Only `http` and `https` URLs have a defined base string URI.
	#[error("Cannot sign a request for the `{scheme}` scheme.")]
	UnsupportedScheme {
		/// Scheme of the rejected URL.
		scheme: String,
	},
	/// The request URL has no host component.
	#[error("Cannot sign a request whose URL has no host.")]
	MissingHost,
	/// The MAC implementation rejected the signing key.
	#[error("Signing key was rejected by the {method} implementation.")]
	InvalidKey {
		/// Signature method that rejected the key.
		method: SignatureMethod,
	},
}

/// Failures raised while checking a received `Authorization` header.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum VerificationError {
	/// Header does not use the `OAuth` scheme.
	#[error("Authorization header does not use the OAuth scheme.")]
	MissingScheme,
	/// A header entry is not of the form `name="value"`.
	#[error("Authorization header entry `{raw}` is malformed.")]
	MalformedParameter {
		/// Offending entry.
		raw: String,
	},
	/// A required protocol parameter is absent.
	#[error("Authorization header is missing `{name}`.")]
	MissingParameter {
		/// Parameter name.
		name: &'static str,
	},
	/// A protocol parameter appears more than once.
	#[error("Authorization header repeats `{name}`.")]
	DuplicateParameter {
		/// Parameter name.
		name: String,
	},
	/// `oauth_timestamp` is not an integer.
	#[error("Timestamp `{raw}` is not a valid integer.")]
	InvalidTimestamp {
		/// Raw timestamp text.
		raw: String,
	},
	/// `oauth_version` is present but is not `1.0`.
	#[error("OAuth version `{version}` is not supported.")]
	UnsupportedVersion {
		/// Raw version text.
		version: String,
	},
	/// `oauth_signature_method` names an unknown method.
	#[error("Signature method `{method}` is not supported.")]
	UnsupportedSignatureMethod {
		/// Raw method text.
		method: String,
	},
	/// Consumer key or token value is not a valid identifier.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// Header was signed for a different consumer.
	#[error("Request was signed for consumer `{received}`, expected `{expected}`.")]
	ConsumerKeyMismatch {
		/// Key the verifier holds a secret for.
		expected: String,
		/// Key named by the header.
		received: String,
	},
	/// Recomputed signature does not match the received one.
	#[error("Signature does not match the request.")]
	SignatureMismatch,
	/// The received request cannot be turned into a base string.
	#[error(transparent)]
	Signing(#[from] SigningError),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signature_methods_parse_and_serialize() {
		assert_eq!(
			"hmac-sha1".parse::<SignatureMethod>().expect("Known method."),
			SignatureMethod::HmacSha1
		);
		assert!(matches!(
			"RSA-SHA1".parse::<SignatureMethod>(),
			Err(ConfigError::UnknownSignatureMethod(_))
		));
		assert_eq!(
			serde_json::to_string(&SignatureMethod::HmacSha256).expect("Method should serialize."),
			"\"HMAC-SHA256\""
		);
	}

	#[test]
	fn signed_pairs_skip_absent_fields() {
		let params = OAuthParameters {
			consumer_key: ConsumerKey::new("java-test-key").expect("Fixture key is valid."),
			token: None,
			signature_method: SignatureMethod::HmacSha1,
			timestamp: 42,
			nonce: "n".into(),
			version: None,
			realm: Some("ignored".into()),
		};
		let names: Vec<_> = params.signed_pairs().into_iter().map(|(name, _)| name).collect();

		assert_eq!(
			names,
			["oauth_consumer_key", "oauth_nonce", "oauth_signature_method", "oauth_timestamp"]
		);
	}
}

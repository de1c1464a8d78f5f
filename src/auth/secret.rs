//! Redacted secret wrappers keeping signing keys out of logs.

// self
use crate::_prelude::*;

/// Error returned when a consumer secret is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Consumer secret cannot be empty.")]
pub struct EmptySecretError;

/// Consumer secret shared between the client and the key proxy.
///
/// Construction rejects the empty string, so a signer holding a `ConsumerSecret` can never
/// produce a signature keyed only by the `&` separator.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ConsumerSecret(String);
impl ConsumerSecret {
	/// Wraps a new, non-empty secret string.
	pub fn new(value: impl Into<String>) -> Result<Self, EmptySecretError> {
		let value = value.into();

		if value.is_empty() {
			return Err(EmptySecretError);
		}

		Ok(Self(value))
	}

	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl TryFrom<String> for ConsumerSecret {
	type Error = EmptySecretError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl AsRef<str> for ConsumerSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for ConsumerSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ConsumerSecret").field(&"<redacted>").finish()
	}
}
impl Display for ConsumerSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Token secret paired with an [`AccessToken`](crate::auth::AccessToken).
///
/// Unlike [`ConsumerSecret`] it may be empty; some providers issue temporary credentials
/// without a secret.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

//! Credential pairs consumed by the signer.

// self
use crate::auth::{AccessToken, ConsumerKey, ConsumerSecret, TokenSecret};

/// Consumer key + secret identifying the calling application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumerCredentials {
	/// Public consumer key sent as `oauth_consumer_key`.
	pub key: ConsumerKey,
	/// Shared secret used to key the signature.
	pub secret: ConsumerSecret,
}
impl ConsumerCredentials {
	/// Pairs a consumer key with its secret.
	pub fn new(key: ConsumerKey, secret: ConsumerSecret) -> Self {
		Self { key, secret }
	}
}

/// Token + token secret for requests made on behalf of a resource owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenCredentials {
	/// Token identifier sent as `oauth_token`.
	pub token: AccessToken,
	/// Token secret appended to the signing key.
	pub secret: TokenSecret,
}
impl TokenCredentials {
	/// Pairs a token with its secret.
	pub fn new(token: AccessToken, secret: impl Into<String>) -> Self {
		Self { token, secret: TokenSecret::new(secret) }
	}
}

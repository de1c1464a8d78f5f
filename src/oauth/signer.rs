//! Request signer plus the nonce and clock sources it draws from.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ConsumerCredentials, ConsumerKey, ConsumerSecret, TokenCredentials},
	oauth::{
		AuthorizationHeader, OAUTH_VERSION, OAuthParameters, SignatureMethod, SigningError,
		encode::percent_encode, signature_base_string,
	},
	request::FormRequest,
};

const NONCE_LEN: usize = 32;

/// Produces the `oauth_nonce` for each signature.
pub trait NonceSource
where
	Self: Send + Sync,
{
	/// Returns a nonce; implementations should never repeat one for the same timestamp.
	fn nonce(&self) -> String;
}

/// Produces the `oauth_timestamp` for each signature.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current time in whole seconds since the UNIX epoch.
	fn timestamp(&self) -> i64;
}

/// 32 random alphanumeric characters per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomNonce;
impl NonceSource for RandomNonce {
	fn nonce(&self) -> String {
		rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
	}
}

/// Wall-clock UTC time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn timestamp(&self) -> i64 {
		OffsetDateTime::now_utc().unix_timestamp()
	}
}

/// Always returns the same nonce; for reproducible signatures in tests and diagnostics.
#[derive(Clone, Debug)]
pub struct FixedNonce(String);
impl FixedNonce {
	/// Pins the nonce to `value`.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}
}
impl NonceSource for FixedNonce {
	fn nonce(&self) -> String {
		self.0.clone()
	}
}

/// Always returns the same timestamp.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(i64);
impl FixedClock {
	/// Pins the clock to `timestamp`.
	pub fn new(timestamp: i64) -> Self {
		Self(timestamp)
	}
}
impl Clock for FixedClock {
	fn timestamp(&self) -> i64 {
		self.0
	}
}

/// A request paired with the `Authorization` header that signs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// The request exactly as it was signed.
	pub request: FormRequest,
	/// Header carrying the protocol parameters and signature.
	pub authorization: AuthorizationHeader,
	/// Signature base string the signature was computed over.
	pub base_string: String,
}

/// Signs form requests with a configured method, realm, nonce source, and clock.
#[derive(Clone)]
pub struct Signer {
	/// Signature method applied to every request.
	pub method: SignatureMethod,
	/// Optional `realm` rendered in the header.
	pub realm: Option<String>,
	nonce_source: Arc<dyn NonceSource>,
	clock: Arc<dyn Clock>,
}
impl Signer {
	/// Creates an HMAC-SHA1 signer backed by [`RandomNonce`] and [`SystemClock`].
	pub fn new(method: SignatureMethod) -> Self {
		Self { method, realm: None, nonce_source: Arc::new(RandomNonce), clock: Arc::new(SystemClock) }
	}

	/// Overrides the signature method.
	pub fn with_method(mut self, method: SignatureMethod) -> Self {
		self.method = method;

		self
	}

	/// Sets or clears the header realm.
	pub fn with_realm(mut self, realm: Option<String>) -> Self {
		self.realm = realm;

		self
	}

	/// Replaces the nonce source.
	pub fn with_nonce_source(mut self, source: Arc<dyn NonceSource>) -> Self {
		self.nonce_source = source;

		self
	}

	/// Replaces the clock.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Draws a fresh nonce and timestamp for the given identities.
	pub fn protocol_parameters(
		&self,
		consumer_key: &ConsumerKey,
		token: Option<&AccessToken>,
	) -> OAuthParameters {
		OAuthParameters {
			consumer_key: consumer_key.clone(),
			token: token.cloned(),
			signature_method: self.method,
			timestamp: self.clock.timestamp(),
			nonce: self.nonce_source.nonce(),
			version: Some(OAUTH_VERSION.to_owned()),
			realm: self.realm.clone(),
		}
	}

	/// Signs `request` for `consumer`, optionally on behalf of `token`.
	pub fn sign(
		&self,
		request: &FormRequest,
		consumer: &ConsumerCredentials,
		token: Option<&TokenCredentials>,
	) -> Result<SignedRequest, SigningError> {
		let params = self.protocol_parameters(&consumer.key, token.map(|t| &t.token));
		let base_string = signature_base_string(request, &params)?;
		let signature = compute_signature(
			self.method,
			&base_string,
			&consumer.secret,
			token.map(|t| t.secret.expose()),
		)?;

		Ok(SignedRequest {
			request: request.clone(),
			authorization: AuthorizationHeader { params, signature },
			base_string,
		})
	}
}
impl Default for Signer {
	fn default() -> Self {
		Self::new(SignatureMethod::HmacSha1)
	}
}
impl Debug for Signer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Signer")
			.field("method", &self.method)
			.field("realm", &self.realm)
			.finish_non_exhaustive()
	}
}

/// Builds `enc(consumer_secret)&enc(token_secret)`; the separator is present even without a
/// token.
pub fn signing_key(consumer_secret: &ConsumerSecret, token_secret: Option<&str>) -> String {
	format!(
		"{}&{}",
		percent_encode(consumer_secret.expose()),
		percent_encode(token_secret.unwrap_or_default())
	)
}

/// Computes the `oauth_signature` value for `base_string`.
pub fn compute_signature(
	method: SignatureMethod,
	base_string: &str,
	consumer_secret: &ConsumerSecret,
	token_secret: Option<&str>,
) -> Result<String, SigningError> {
	let key = signing_key(consumer_secret, token_secret);

	match method {
		SignatureMethod::HmacSha1 | SignatureMethod::HmacSha256 =>
			Ok(STANDARD.encode(signature_bytes(method, key.as_bytes(), base_string.as_bytes())?)),
		SignatureMethod::Plaintext => Ok(key),
	}
}

/// Raw signature bytes: the HMAC digest, or the key itself for PLAINTEXT.
///
/// Shared by signing and verification so both sides derive the value the same way.
pub(crate) fn signature_bytes(
	method: SignatureMethod,
	key: &[u8],
	message: &[u8],
) -> Result<Vec<u8>, SigningError> {
	match method {
		SignatureMethod::HmacSha1 => {
			let mut mac = <Hmac<Sha1>>::new_from_slice(key)
				.map_err(|_| SigningError::InvalidKey { method })?;

			mac.update(message);

			Ok(mac.finalize().into_bytes().to_vec())
		},
		SignatureMethod::HmacSha256 => {
			let mut mac = <Hmac<Sha256>>::new_from_slice(key)
				.map_err(|_| SigningError::InvalidKey { method })?;

			mac.update(message);

			Ok(mac.finalize().into_bytes().to_vec())
		},
		SignatureMethod::Plaintext => Ok(key.to_vec()),
	}
}

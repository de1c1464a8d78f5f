//! [`SecretSource`] backed by the key-distribution proxy.
//!
//! The proxy publishes each consumer secret as a plain-text body at
//! `{base}/proxy/{from_port}/{to_port}/key/{consumer_key}/`. The leg is unauthenticated, so it
//! is only meant for a proxy listening on the local host.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerKey, ConsumerSecret},
	http::{HttpTransport, OutboundRequest},
	keys::{SecretError, SecretFuture, SecretSource},
};

/// Fetches consumer secrets from the proxy over HTTP.
pub struct ProxySecretSource<T>
where
	T: ?Sized + HttpTransport,
{
	http_client: Arc<T>,
	base_url: Url,
	from_port: u16,
	to_port: u16,
}
impl<T> ProxySecretSource<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a source for the `from_port` -> `to_port` route served at `base_url`.
	pub fn new(
		http_client: impl Into<Arc<T>>,
		base_url: Url,
		from_port: u16,
		to_port: u16,
	) -> Self {
		Self { http_client: http_client.into(), base_url, from_port, to_port }
	}

	/// URL serving the secret for `key`; always ends with a slash.
	pub fn secret_url(&self, key: &ConsumerKey) -> Result<Url, SecretError> {
		let mut url = self.base_url.clone();
		let from_port = self.from_port.to_string();
		let to_port = self.to_port.to_string();

		url.set_query(None);
		url.set_fragment(None);

		{
			let mut segments = url
				.path_segments_mut()
				.map_err(|_| SecretError::InvalidProxyUrl { url: self.base_url.to_string() })?;

			segments.pop_if_empty().extend([
				"proxy",
				from_port.as_str(),
				to_port.as_str(),
				"key",
				key.as_ref(),
				"",
			]);
		}

		Ok(url)
	}
}
impl<T> SecretSource for ProxySecretSource<T>
where
	T: ?Sized + HttpTransport,
{
	fn fetch_secret<'a>(&'a self, key: &'a ConsumerKey) -> SecretFuture<'a> {
		Box::pin(async move {
			let url = self.secret_url(key)?;
			let response = self.http_client.execute(OutboundRequest::get(url)).await?;

			if response.status.code != 200 {
				return Err(SecretError::UnexpectedStatus {
					key: key.to_string(),
					status: response.status,
				});
			}

			let text = String::from_utf8(response.body)
				.map_err(|_| SecretError::InvalidEncoding { key: key.to_string() })?;

			ConsumerSecret::new(text).map_err(|_| SecretError::Empty { key: key.to_string() })
		})
	}
}
impl<T> Debug for ProxySecretSource<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProxySecretSource")
			.field("base_url", &self.base_url.as_str())
			.field("from_port", &self.from_port)
			.field("to_port", &self.to_port)
			.finish()
	}
}

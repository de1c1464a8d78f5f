//! Transport primitives for the key proxy and the signed request.
//!
//! The module exposes [`HttpTransport`] alongside [`OutboundRequest`] and
//! [`TransportResponse`] so downstream crates can plug in custom HTTP clients; the probe
//! only ever needs the status line, headers, and body of a single exchange.

// std
#[cfg(feature = "reqwest")] use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
#[cfg(feature = "reqwest")] use reqwest::{Method, redirect::Policy};
// self
use crate::{
	_prelude::*,
	error::TransportError,
	request::{FORM_CONTENT_TYPE, FormRequest, HttpMethod},
};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports that can execute a single request.
///
/// Implementations must be `Send + Sync + 'static` so a probe can share them behind `Arc`,
/// and must report every HTTP response as `Ok` regardless of its status; status handling
/// belongs to the caller.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the full response.
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// Fully materialized request handed to a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Target URL including query.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Request body, if any.
	pub body: Option<Vec<u8>>,
}
impl OutboundRequest {
	/// Bodyless `GET`.
	pub fn get(url: Url) -> Self {
		Self { method: HttpMethod::Get, url, headers: Vec::new(), body: None }
	}

	/// Materializes a form request, adding the form content type when it carries a body.
	pub fn from_form(request: &FormRequest) -> Self {
		let mut outbound = Self {
			method: request.method(),
			url: request.url().clone(),
			headers: Vec::new(),
			body: None,
		};

		if let Some(body) = request.encoded_body() {
			outbound.headers.push(("content-type".into(), FORM_CONTENT_TYPE.into()));
			outbound.body = Some(body.into_bytes());
		}

		outbound
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}
}

/// First line of an HTTP response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
	/// Protocol version, e.g. `HTTP/1.1`.
	pub version: String,
	/// Numeric status code.
	pub code: u16,
	/// Reason phrase; the canonical phrase for the code when the transport hides it.
	pub reason: Option<String>,
}
impl StatusLine {
	/// Whether the code is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.code)
	}
}
impl Display for StatusLine {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} {}", self.version, self.code)?;

		if let Some(reason) = &self.reason {
			write!(f, " {reason}")?;
		}

		Ok(())
	}
}

/// Buffered response returned by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
	/// Status line.
	pub status: StatusLine,
	/// Header name/value pairs; names are lower-case.
	pub headers: Vec<(String, String)>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Clients built through [`ReqwestHttpClient::with_timeout`] do not follow redirects, so
/// the reported status line is the one the signed endpoint itself produced. A redirect would
/// also change the base string URI and invalidate the signature.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with redirects disabled and the given per-request timeout.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().redirect(Policy::none()).timeout(timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let url = request.url.clone();
			let network = |e: ReqwestError| TransportError::network(&url, e);
			let mut builder = self.0.request(reqwest_method(request.method), request.url.clone());

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(network)?;
			let status = response.status();
			let version = format!("{:?}", response.version());
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
				})
				.collect();
			let body = response.bytes().await.map_err(network)?.to_vec();

			Ok(TransportResponse {
				status: StatusLine {
					version,
					code: status.as_u16(),
					reason: status.canonical_reason().map(str::to_owned),
				},
				headers,
				body,
			})
		})
	}
}

#[cfg(feature = "reqwest")]
fn reqwest_method(method: HttpMethod) -> Method {
	match method {
		HttpMethod::Get => Method::GET,
		HttpMethod::Post => Method::POST,
		HttpMethod::Put => Method::PUT,
		HttpMethod::Patch => Method::PATCH,
		HttpMethod::Delete => Method::DELETE,
		HttpMethod::Head => Method::HEAD,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_line_renders_like_the_wire() {
		let ok = StatusLine { version: "HTTP/1.1".into(), code: 200, reason: Some("OK".into()) };
		let custom = StatusLine { version: "HTTP/2.0".into(), code: 599, reason: None };

		assert_eq!(ok.to_string(), "HTTP/1.1 200 OK");
		assert!(ok.is_success());
		assert_eq!(custom.to_string(), "HTTP/2.0 599");
		assert!(!custom.is_success());
	}

	#[test]
	fn form_requests_get_a_content_type() {
		let form = FormRequest::post(
			Url::parse("http://localhost:8000/job").expect("Fixture URL should parse."),
		)
		.with_param("post", "happy");
		let outbound = OutboundRequest::from_form(&form).with_header("authorization", "OAuth x");

		assert_eq!(outbound.body.as_deref(), Some(b"post=happy".as_slice()));
		assert_eq!(
			outbound.headers,
			vec![
				("content-type".to_owned(), FORM_CONTENT_TYPE.to_owned()),
				("authorization".to_owned(), "OAuth x".to_owned()),
			]
		);
	}
}

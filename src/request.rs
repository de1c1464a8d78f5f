//! Outbound form requests: method, target URL, and the ordered body pairs that get signed.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::ConfigError};

/// Media type of the only body encoding that participates in OAuth 1.0a signatures.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP methods the probe can sign and send.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET`.
	Get,
	#[default]
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
	/// `HEAD`.
	Head,
}
impl HttpMethod {
	/// Returns the upper-case method token used on the wire and in signature base strings.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
			HttpMethod::Head => "HEAD",
		}
	}

	/// Whether requests with this method carry a form body.
	pub const fn carries_body(self) -> bool {
		matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for HttpMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"GET" => Ok(HttpMethod::Get),
			"POST" => Ok(HttpMethod::Post),
			"PUT" => Ok(HttpMethod::Put),
			"PATCH" => Ok(HttpMethod::Patch),
			"DELETE" => Ok(HttpMethod::Delete),
			"HEAD" => Ok(HttpMethod::Head),
			_ => Err(ConfigError::UnknownHttpMethod(s.to_owned())),
		}
	}
}

/// A request whose parameters are kept as an ordered list of `(name, value)` pairs.
///
/// Repeated names are preserved exactly as supplied. For body-carrying methods the pairs
/// become the `application/x-www-form-urlencoded` body; for the others they are appended to
/// the URL query so they still take part in the signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormRequest {
	method: HttpMethod,
	url: Url,
	params: Vec<(String, String)>,
}
impl FormRequest {
	/// Creates a request without form parameters.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, params: Vec::new() }
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(HttpMethod::Post, url)
	}

	/// Appends a single parameter.
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.push_param(name.into(), value.into());

		self
	}

	/// Appends parameters in iteration order.
	pub fn with_params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (name, value) in params {
			self.push_param(name.into(), value.into());
		}

		self
	}

	/// Request method.
	pub fn method(&self) -> HttpMethod {
		self.method
	}

	/// Target URL including its query string.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Form body pairs in transmission order.
	pub fn params(&self) -> &[(String, String)] {
		&self.params
	}

	/// Decoded query pairs in the order they appear in the URL.
	pub fn query_pairs(&self) -> Vec<(String, String)> {
		self.url.query_pairs().map(|(name, value)| (name.into_owned(), value.into_owned())).collect()
	}

	/// Encodes the body, or returns `None` when the method carries no body.
	pub fn encoded_body(&self) -> Option<String> {
		if !self.method.carries_body() {
			return None;
		}

		let mut serializer = form_urlencoded::Serializer::new(String::new());

		serializer.extend_pairs(self.params.iter());

		Some(serializer.finish())
	}

	fn push_param(&mut self, name: String, value: String) {
		if self.method.carries_body() {
			self.params.push((name, value));
		} else {
			self.url.query_pairs_mut().append_pair(&name, &value);
		}
	}
}

//! Signature base string construction (RFC 5849 section 3.4.1).

// self
use crate::{
	_prelude::*,
	oauth::{OAuthParameters, SigningError, encode::percent_encode},
	request::FormRequest,
};

/// Builds the base string URI: lower-case scheme and host, default port dropped, path kept,
/// query and fragment removed.
pub fn base_string_uri(url: &Url) -> Result<String, SigningError> {
	let scheme = url.scheme();

	if scheme != "http" && scheme != "https" {
		return Err(SigningError::UnsupportedScheme { scheme: scheme.to_owned() });
	}

	let host = url.host_str().ok_or(SigningError::MissingHost)?;
	let mut uri = format!("{scheme}://{}", host.to_ascii_lowercase());

	// `Url::port` is `None` for the scheme's default port.
	if let Some(port) = url.port() {
		uri.push(':');
		uri.push_str(&port.to_string());
	}

	uri.push_str(url.path());

	Ok(uri)
}

/// Encodes, sorts, and joins request parameters. Repeated names are all kept and ordered by
/// their encoded values.
pub fn normalize_parameters<'a, I>(params: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut encoded: Vec<(String, String)> = params
		.into_iter()
		.map(|(name, value)| (percent_encode(name), percent_encode(value)))
		.collect();

	encoded.sort();

	let mut buf = String::new();

	for (idx, (name, value)) in encoded.iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(name);
		buf.push('=');
		buf.push_str(value);
	}

	buf
}

/// Builds `METHOD&enc(base_uri)&enc(normalized_parameters)` for `request`.
///
/// Query pairs and form body pairs are both collected, so a name that appears in the query
/// and in the body contributes both values.
pub fn signature_base_string(
	request: &FormRequest,
	oauth: &OAuthParameters,
) -> Result<String, SigningError> {
	let uri = base_string_uri(request.url())?;
	let query = request.query_pairs();
	let protocol = oauth.signed_pairs();
	let params = query
		.iter()
		.chain(request.params().iter())
		.map(|(name, value)| (name.as_str(), value.as_str()))
		.chain(protocol.iter().map(|(name, value)| (*name, value.as_str())));
	let normalized = normalize_parameters(params);

	Ok(format!(
		"{}&{}&{}",
		request.method().as_str(),
		percent_encode(&uri),
		percent_encode(&normalized)
	))
}

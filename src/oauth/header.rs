//! `Authorization: OAuth ...` header rendering and parsing (RFC 5849 section 3.5.1).

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ConsumerKey},
	oauth::{
		OAuthParameters, SignatureMethod, VerificationError,
		encode::{percent_decode, percent_encode},
	},
};

const SCHEME: &str = "OAuth";

/// Protocol parameters plus the signature, as carried by the `Authorization` header.
///
/// `Debug` redacts PLAINTEXT signatures, which are the signing key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
	/// Signed protocol parameters.
	pub params: OAuthParameters,
	/// `oauth_signature`, before header encoding.
	pub signature: String,
}
impl AuthorizationHeader {
	/// Renders the header value with `realm` first and the remaining entries sorted by name.
	pub fn to_header_value(&self) -> String {
		let mut entries = Vec::new();

		if let Some(realm) = &self.params.realm {
			entries.push(format!("realm=\"{}\"", percent_encode(realm)));
		}

		let mut pairs = self.params.signed_pairs();

		pairs.push(("oauth_signature", self.signature.clone()));
		pairs.sort();

		for (name, value) in pairs {
			entries.push(format!("{name}=\"{}\"", percent_encode(&value)));
		}

		format!("{SCHEME} {}", entries.join(", "))
	}

	/// Parses a header value produced by any RFC 5849 client.
	///
	/// Unknown non-`oauth_` entries are ignored. `oauth_consumer_key`, `oauth_signature`,
	/// `oauth_signature_method`, `oauth_timestamp`, and `oauth_nonce` are required.
	pub fn parse(value: &str) -> Result<Self, VerificationError> {
		let rest = value.trim_start();
		let rest = match rest.split_once(char::is_whitespace) {
			Some((scheme, rest)) if scheme.eq_ignore_ascii_case(SCHEME) => rest,
			_ => return Err(VerificationError::MissingScheme),
		};
		let mut fields: HashMap<String, String> = HashMap::new();

		let entries = split_entries(rest);

		for raw in entries.into_iter().map(str::trim).filter(|entry| !entry.is_empty()) {
			let malformed = || VerificationError::MalformedParameter { raw: raw.to_owned() };
			let (name, quoted) = raw.split_once('=').ok_or_else(malformed)?;
			let inner = quoted
				.trim()
				.strip_prefix('"')
				.and_then(|v| v.strip_suffix('"'))
				.filter(|v| !v.contains('"'))
				.ok_or_else(malformed)?;
			let name = percent_decode(name.trim()).ok_or_else(malformed)?.into_owned();
			let value = percent_decode(inner).ok_or_else(malformed)?.into_owned();

			if name != "realm" && !name.starts_with("oauth_") {
				continue;
			}
			if fields.insert(name.clone(), value).is_some() {
				return Err(VerificationError::DuplicateParameter { name });
			}
		}

		let mut take = |name: &'static str| {
			fields.remove(name).ok_or(VerificationError::MissingParameter { name })
		};
		let consumer_key = ConsumerKey::new(take("oauth_consumer_key")?)?;
		let signature = take("oauth_signature")?;
		let method_raw = take("oauth_signature_method")?;
		let signature_method = method_raw
			.parse::<SignatureMethod>()
			.map_err(|_| VerificationError::UnsupportedSignatureMethod { method: method_raw })?;
		let timestamp_raw = take("oauth_timestamp")?;
		let timestamp = timestamp_raw
			.parse::<i64>()
			.map_err(|_| VerificationError::InvalidTimestamp { raw: timestamp_raw })?;
		let nonce = take("oauth_nonce")?;
		let token = fields.remove("oauth_token").map(AccessToken::new).transpose()?;
		let version = fields.remove("oauth_version");
		let realm = fields.remove("realm");

		Ok(Self {
			params: OAuthParameters {
				consumer_key,
				token,
				signature_method,
				timestamp,
				nonce,
				version,
				realm,
			},
			signature,
		})
	}
}
impl Debug for AuthorizationHeader {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let signature = match self.params.signature_method {
			SignatureMethod::Plaintext => "<redacted>",
			_ => self.signature.as_str(),
		};

		f.debug_struct("AuthorizationHeader")
			.field("params", &self.params)
			.field("signature", &signature)
			.finish()
	}
}

/// Splits on commas that sit outside double quotes, so quoted values may contain commas.
fn split_entries(value: &str) -> Vec<&str> {
	let mut entries = Vec::new();
	let mut in_quotes = false;
	let mut start = 0;

	for (idx, ch) in value.char_indices() {
		match ch {
			'"' => in_quotes = !in_quotes,
			',' if !in_quotes => {
				entries.push(&value[start..idx]);
				start = idx + 1;
			},
			_ => {},
		}
	}

	entries.push(&value[start..]);

	entries
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn header() -> AuthorizationHeader {
		AuthorizationHeader {
			params: OAuthParameters {
				consumer_key: ConsumerKey::new("java-test-key").expect("Fixture key is valid."),
				token: None,
				signature_method: SignatureMethod::HmacSha1,
				timestamp: 1_700_000_000,
				nonce: "fixednonce".into(),
				version: Some("1.0".into()),
				realm: Some("Example Jobs".into()),
			},
			signature: "hKuKBsfv3iaNaZovCNWCejjxd3E=".into(),
		}
	}

	#[test]
	fn renders_realm_first_and_encodes_values() {
		assert_eq!(
			header().to_header_value(),
			concat!(
				"OAuth realm=\"Example%20Jobs\", oauth_consumer_key=\"java-test-key\", ",
				"oauth_nonce=\"fixednonce\", oauth_signature=\"hKuKBsfv3iaNaZovCNWCejjxd3E%3D\", ",
				"oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1700000000\", ",
				"oauth_version=\"1.0\""
			)
		);
	}

	#[test]
	fn parse_reads_what_render_writes() {
		let original = header();
		let parsed = AuthorizationHeader::parse(&original.to_header_value())
			.expect("Rendered header should parse.");

		assert_eq!(parsed, original);
	}

	#[test]
	fn parse_accepts_foreign_layouts() {
		let parsed = AuthorizationHeader::parse(concat!(
			"oauth  oauth_consumer_key=\"node-test-key\",oauth_nonce=\"abc\",",
			"oauth_signature_method=\"HMAC-SHA1\",oauth_timestamp=\"1\",",
			"oauth_token=\"tok\",oauth_signature=\"c2ln%3D\",x_extra=\"1\""
		))
		.expect("Compact header should parse.");

		assert_eq!(parsed.signature, "c2ln=");
		assert_eq!(parsed.params.token.as_deref(), Some("tok"));
		assert_eq!(parsed.params.version, None);
	}

	#[test]
	fn parse_keeps_commas_inside_quotes() {
		let parsed = AuthorizationHeader::parse(concat!(
			"OAuth realm=\"Example, Inc\", oauth_consumer_key=\"java-test-key\", ",
			"oauth_nonce=\"n\", oauth_signature=\"sig\", oauth_signature_method=\"HMAC-SHA1\", ",
			"oauth_timestamp=\"1\""
		))
		.expect("Quoted comma should stay inside the realm.");

		assert_eq!(parsed.params.realm.as_deref(), Some("Example, Inc"));
		assert!(matches!(
			AuthorizationHeader::parse("OAuth realm=\"unterminated, oauth_nonce=\"n\""),
			Err(VerificationError::MalformedParameter { .. })
		));
	}

	#[test]
	fn debug_redacts_plaintext_signatures_only() {
		let hmac = header();
		let mut plaintext = header();

		plaintext.params.signature_method = SignatureMethod::Plaintext;
		plaintext.signature = "TOPSECRET&".into();

		assert!(format!("{hmac:?}").contains("hKuKBsfv3iaNaZovCNWCejjxd3E="));
		assert!(!format!("{plaintext:?}").contains("TOPSECRET"));
		assert!(format!("{plaintext:?}").contains("<redacted>"));
	}

	#[test]
	fn parse_reports_structural_problems() {
		assert_eq!(
			AuthorizationHeader::parse("Bearer abc"),
			Err(VerificationError::MissingScheme)
		);
		assert!(matches!(
			AuthorizationHeader::parse("OAuth oauth_nonce=abc"),
			Err(VerificationError::MalformedParameter { .. })
		));
		assert!(matches!(
			AuthorizationHeader::parse("OAuth oauth_nonce=\"a\", oauth_nonce=\"b\""),
			Err(VerificationError::DuplicateParameter { .. })
		));
		assert_eq!(
			AuthorizationHeader::parse("OAuth oauth_nonce=\"a\""),
			Err(VerificationError::MissingParameter { name: "oauth_consumer_key" })
		);
	}
}

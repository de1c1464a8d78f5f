//! Server-side signature verification for received requests.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use subtle::ConstantTimeEq;
// self
use crate::{
	auth::{ConsumerCredentials, TokenSecret},
	oauth::{
		AuthorizationHeader, OAUTH_VERSION, SignatureMethod, VerificationError,
		signature_base_string,
		signer::{signature_bytes, signing_key},
	},
	request::FormRequest,
};

/// Verifies `header_value` against `request` as received, returning the parsed header on
/// success.
///
/// Signatures are compared in constant time for every method. An `oauth_version` other than
/// `1.0` is rejected; an absent one is accepted. Timestamp freshness and nonce replay are left
/// to the caller, which owns the clock and the nonce history.
pub fn verify(
	request: &FormRequest,
	header_value: &str,
	consumer: &ConsumerCredentials,
	token_secret: Option<&TokenSecret>,
) -> Result<AuthorizationHeader, VerificationError> {
	let header = AuthorizationHeader::parse(header_value)?;

	if let Some(version) = header.params.version.as_deref().filter(|v| *v != OAUTH_VERSION) {
		return Err(VerificationError::UnsupportedVersion { version: version.to_owned() });
	}
	if header.params.consumer_key != consumer.key {
		return Err(VerificationError::ConsumerKeyMismatch {
			expected: consumer.key.to_string(),
			received: header.params.consumer_key.to_string(),
		});
	}

	let method = header.params.signature_method;
	let base_string = signature_base_string(request, &header.params)?;
	let key = signing_key(&consumer.secret, token_secret.map(TokenSecret::expose));
	let received = match method {
		SignatureMethod::HmacSha1 | SignatureMethod::HmacSha256 => STANDARD
			.decode(header.signature.as_bytes())
			.map_err(|_| VerificationError::SignatureMismatch)?,
		SignatureMethod::Plaintext => header.signature.as_bytes().to_vec(),
	};
	let expected = signature_bytes(method, key.as_bytes(), base_string.as_bytes())?;

	if expected.as_slice().ct_eq(received.as_slice()).unwrap_u8() != 1 {
		return Err(VerificationError::SignatureMismatch);
	}

	Ok(header)
}

// std
use std::sync::Arc;
// crates.io
use url::Url;
// self
use oauth1_probe::{
	auth::{AccessToken, ConsumerCredentials, ConsumerKey, ConsumerSecret, TokenCredentials},
	oauth::{
		FixedClock, FixedNonce, SignatureMethod, Signer, VerificationError, base_string_uri,
		percent_encode, verify,
	},
	request::FormRequest,
};

fn url(value: &str) -> Url {
	Url::parse(value).expect("Fixture URL should parse.")
}

fn consumer(key: &str, secret: &str) -> ConsumerCredentials {
	ConsumerCredentials::new(
		ConsumerKey::new(key).expect("Fixture consumer key should be valid."),
		ConsumerSecret::new(secret).expect("Fixture consumer secret should be non-empty."),
	)
}

fn pinned(nonce: &str, timestamp: i64) -> Signer {
	Signer::new(SignatureMethod::HmacSha1)
		.with_nonce_source(Arc::new(FixedNonce::new(nonce)))
		.with_clock(Arc::new(FixedClock::new(timestamp)))
}

#[test]
fn published_three_legged_example_matches() {
	let request = FormRequest::post(url(
		"https://api.twitter.com/1.1/statuses/update.json?include_entities=true",
	))
	.with_param("status", "Hello Ladies + Gentlemen, a signed OAuth request!");
	let consumer = consumer("xvz1evFS4wEEPTGEFPHBog", "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw");
	let token = TokenCredentials::new(
		AccessToken::new("370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb")
			.expect("Fixture token should be valid."),
		"LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
	);
	let signed = pinned("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg", 1_318_622_958)
		.sign(&request, &consumer, Some(&token))
		.expect("Signing the published example should succeed.");

	assert!(signed.base_string.starts_with(
		"POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26"
	));
	assert!(signed.base_string.ends_with(
		"status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
	));
	assert_eq!(signed.authorization.signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");

	let header = signed.authorization.to_header_value();

	assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
	assert!(header.contains("oauth_token=\"370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb\""));

	verify(&request, &header, &consumer, Some(&token.secret))
		.expect("Published example should verify with the token secret.");
}

#[test]
fn probe_request_signature_depends_on_the_host() {
	let params = [
		("post", "happy"),
		("wow", "so"),
		("signposty", "a"),
		("signposty", "b"),
		("signposty", "rad"),
	];
	let consumer = consumer("java-test-key", "s3cr3t-value");
	let signer = pinned("fixednonce", 1_700_000_000);
	let localhost = signer
		.sign(
			&FormRequest::post(url("http://localhost:8000/job?this=is&fun=right")).with_params(params),
			&consumer,
			None,
		)
		.expect("Signing should succeed.");
	let loopback = signer
		.sign(
			&FormRequest::post(url("http://127.0.0.1:8000/job?this=is&fun=right")).with_params(params),
			&consumer,
			None,
		)
		.expect("Signing should succeed.");

	assert_eq!(localhost.authorization.signature, "hKuKBsfv3iaNaZovCNWCejjxd3E=");
	assert_eq!(loopback.authorization.signature, "VnQESVaolPmLt7WHfT3i6ACahrQ=");
}

#[test]
fn same_name_in_query_and_body_is_signed_twice_and_sent_once_each() {
	let request = FormRequest::post(url("http://localhost:8000/job?this=is&fun=right"))
		.with_param("this", "post");
	let consumer = consumer("java-test-key", "s3cr3t-value");
	let signed = pinned("fixednonce", 1_700_000_000)
		.sign(&request, &consumer, None)
		.expect("Signing should succeed.");

	assert!(signed.base_string.contains("%26this%3Dis%26this%3Dpost"));
	assert_eq!(signed.request.encoded_body().as_deref(), Some("this=post"));
	assert_eq!(signed.request.url().query(), Some("this=is&fun=right"));

	let header = signed.authorization.to_header_value();

	verify(&request, &header, &consumer, None).expect("Combined parameters should verify.");

	let body_only = FormRequest::post(url("http://localhost:8000/job?fun=right"))
		.with_params([("this", "is"), ("this", "post")]);

	verify(&body_only, &header, &consumer, None)
		.expect("Moving a pair between query and body keeps the normalized list.");

	let dropped = FormRequest::post(url("http://localhost:8000/job?fun=right"))
		.with_param("this", "post");

	assert_eq!(
		verify(&dropped, &header, &consumer, None),
		Err(VerificationError::SignatureMismatch)
	);
}

#[test]
fn encoding_and_base_uri_follow_rfc_5849() {
	assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
	assert_eq!(
		base_string_uri(&url("HTTP://EXAMPLE.COM:80/r%20v/X?id=123"))
			.expect("HTTP URL should normalize."),
		"http://example.com/r%20v/X"
	);
	assert_eq!(
		base_string_uri(&url("https://www.example.net:8080/?q=1"))
			.expect("HTTPS URL should normalize."),
		"https://www.example.net:8080/"
	);
}

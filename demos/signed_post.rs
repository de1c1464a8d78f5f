//! Runs the stock probe against an in-process mock that plays both the key proxy and the
//! job endpoint, then walks the same request through each stage by hand.
//!
//! 1. The mock serves `s3cr3t-value` at `/proxy/8000/8888/key/java-test-key/`.
//! 2. [`ReqwestProbe::from_config`] wires the proxy source, signer, and reqwest transport.
//! 3. `fetch_credentials`, `sign`, and `dispatch` expose each stage
//!    so the base string and header can be inspected, and [`verify`] checks the header the way
//!    a validating proxy would.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth1_probe::{config::ProbeConfig, oauth::verify, runner::ReqwestProbe};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let proxy_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/proxy/8000/8888/key/java-test-key/");
			then.status(200).body("s3cr3t-value");
		})
		.await;
	let job_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/job")
				.header_exists("authorization")
				.body("post=happy&wow=so&signposty=a&signposty=b&signposty=rad");
			then.status(200).body("job accepted");
		})
		.await;
	let mut config = ProbeConfig::default();

	config.key_proxy.base_url = server.base_url();
	config.target = server.url("/job?this=is&fun=right");

	let probe = ReqwestProbe::from_config(&config)?;
	let report = probe.run(config.request()?).await?;

	println!("{report}");

	let request = config.request()?;
	let consumer = probe.fetch_credentials().await?;
	let signed = probe.sign(&request, &consumer)?;

	println!("Base string: {}", signed.base_string);
	println!("Authorization: {}", signed.authorization.to_header_value());

	verify(&request, &signed.authorization.to_header_value(), &consumer, None)?;

	let status = probe.dispatch(&signed).await?;

	println!("Second dispatch answered {status}.");

	proxy_mock.assert_calls_async(2).await;
	job_mock.assert_calls_async(2).await;

	Ok(())
}

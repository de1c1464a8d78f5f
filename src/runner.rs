//! Probe orchestration: resolve the consumer secret, sign the request, send it, and report.
//!
//! [`Probe::run`] executes the three stages strictly in order. Each stage body runs through
//! [`StageSpan::observe`], which owns the span and the stage counters.
//! A failed secret lookup ends the run before anything is sent to the target.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerCredentials, ConsumerKey, TokenCredentials},
	http::{HttpTransport, OutboundRequest, StatusLine},
	keys::SecretSource,
	oauth::{SignatureMethod, SignedRequest, Signer},
	obs::{Stage, StageSpan},
	request::{FormRequest, HttpMethod},
};
#[cfg(feature = "reqwest")]
use crate::{
	config::ProbeConfig,
	http::ReqwestHttpClient,
	keys::{FileSecretSource, ProxySecretSource},
};

#[cfg(feature = "reqwest")]
/// Probe specialized for the crate's default reqwest transport.
pub type ReqwestProbe = Probe<ReqwestHttpClient>;

/// Outcome of one probe run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
	/// Method the request was sent with.
	pub method: HttpMethod,
	/// Target URL including its query.
	pub url: Url,
	/// Status line the target answered with.
	pub status: StatusLine,
	/// Signature method used.
	pub signature_method: SignatureMethod,
}
impl Display for ProbeReport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Got response:\n{}", self.status)
	}
}

/// Fetches a consumer secret, signs a form request with it, and sends the request.
///
/// The same transport serves the secret lookup (when the source is HTTP-backed) and the
/// signed request, so both legs share timeout and redirect settings.
#[derive(Clone)]
pub struct Probe<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for the signed request.
	pub http_client: Arc<T>,
	/// Backend resolving the consumer secret.
	pub secrets: Arc<dyn SecretSource>,
	/// Signer applied to every request.
	pub signer: Signer,
	/// Consumer key the request is signed for.
	pub consumer_key: ConsumerKey,
	/// Optional token credentials for three-legged requests.
	pub token: Option<TokenCredentials>,
}
impl<T> Probe<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a two-legged HMAC-SHA1 probe over the caller-provided transport.
	pub fn with_http_client(
		http_client: impl Into<Arc<T>>,
		secrets: Arc<dyn SecretSource>,
		consumer_key: ConsumerKey,
	) -> Self {
		Self {
			http_client: http_client.into(),
			secrets,
			signer: Signer::default(),
			consumer_key,
			token: None,
		}
	}

	/// Replaces the signer.
	pub fn with_signer(mut self, signer: Signer) -> Self {
		self.signer = signer;

		self
	}

	/// Signs on behalf of `token`.
	pub fn with_token(mut self, token: TokenCredentials) -> Self {
		self.token = Some(token);

		self
	}

	/// Resolves the consumer secret and pairs it with the configured key.
	pub async fn fetch_credentials(&self) -> Result<ConsumerCredentials> {
		StageSpan::new(Stage::FetchSecret, &self.consumer_key)
			.observe(async {
				let secret = self.secrets.fetch_secret(&self.consumer_key).await?;

				Ok::<_, Error>(ConsumerCredentials::new(self.consumer_key.clone(), secret))
			})
			.await
	}

	/// Signs `request` with `consumer` and the configured token, if any.
	pub fn sign(
		&self,
		request: &FormRequest,
		consumer: &ConsumerCredentials,
	) -> Result<SignedRequest> {
		StageSpan::new(Stage::Sign, &self.consumer_key).observe_sync(|| {
			let signed = self.signer.sign(request, consumer, self.token.as_ref())?;

			#[cfg(feature = "tracing")]
			tracing::debug!(base_string = %signed.base_string, "request signed");

			Ok::<_, Error>(signed)
		})
	}

	/// Sends `signed` and returns the status line of the answer.
	///
	/// Any status, including 4xx and 5xx, is a successful dispatch; only transport failures
	/// are errors.
	pub async fn dispatch(&self, signed: &SignedRequest) -> Result<StatusLine> {
		StageSpan::new(Stage::Dispatch, &self.consumer_key)
			.observe(async {
				let outbound = OutboundRequest::from_form(&signed.request)
					.with_header("authorization", signed.authorization.to_header_value());
				let response = self.http_client.execute(outbound).await?;

				Ok::<_, Error>(response.status)
			})
			.await
	}

	/// Runs every stage for `request` and reports the status line.
	pub async fn run(&self, request: FormRequest) -> Result<ProbeReport> {
		let consumer = self.fetch_credentials().await?;
		let signed = self.sign(&request, &consumer)?;
		let status = self.dispatch(&signed).await?;

		#[cfg(feature = "tracing")]
		tracing::info!(status = %status, "probe finished");

		Ok(ProbeReport {
			method: request.method(),
			url: request.url().clone(),
			status,
			signature_method: self.signer.method,
		})
	}
}
#[cfg(feature = "reqwest")]
impl Probe<ReqwestHttpClient> {
	/// Builds a probe from `config`.
	///
	/// Secrets come from `config.key_dir` when it is set, otherwise from the key proxy. The
	/// reqwest client has redirects disabled and uses `config.timeout_secs` for both legs.
	pub fn from_config(config: &ProbeConfig) -> Result<Self> {
		let http_client = Arc::new(ReqwestHttpClient::with_timeout(config.timeout()?)?);
		let proxy = &config.key_proxy;
		let secrets: Arc<dyn SecretSource> = match &config.key_dir {
			Some(root) => Arc::new(FileSecretSource::new(root, proxy.from_port, proxy.to_port)),
			None => Arc::new(ProxySecretSource::<ReqwestHttpClient>::new(
				http_client.clone(),
				proxy.base_url()?,
				proxy.from_port,
				proxy.to_port,
			)),
		};
		let signer = Signer::new(config.signature_method).with_realm(config.realm.clone());

		Ok(Self::with_http_client(http_client, secrets, config.consumer_key()?).with_signer(signer))
	}
}
impl<T> Debug for Probe<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Probe")
			.field("consumer_key", &self.consumer_key)
			.field("signer", &self.signer)
			.field("token_set", &self.token.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use parking_lot::Mutex;
	// self
	use super::*;
	use crate::{
		auth::ConsumerSecret,
		error::TransportError,
		http::{TransportFuture, TransportResponse},
		keys::{MemorySecretSource, SecretError},
		oauth::{FixedClock, FixedNonce, verify},
	};

	#[derive(Default)]
	struct RecordingTransport {
		seen: Mutex<Vec<OutboundRequest>>,
	}
	impl RecordingTransport {
		fn seen(&self) -> Vec<OutboundRequest> {
			self.seen.lock().clone()
		}
	}
	impl HttpTransport for RecordingTransport {
		fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
			self.seen.lock().push(request);

			Box::pin(async {
				Ok::<_, TransportError>(TransportResponse {
					status: StatusLine {
						version: "HTTP/1.1".into(),
						code: 202,
						reason: Some("Accepted".into()),
					},
					headers: Vec::new(),
					body: Vec::new(),
				})
			})
		}
	}

	fn key() -> ConsumerKey {
		ConsumerKey::new("java-test-key").expect("Fixture key is valid.")
	}

	fn request() -> FormRequest {
		FormRequest::post(
			Url::parse("http://localhost:8000/job?this=is&fun=right")
				.expect("Fixture URL should parse."),
		)
		.with_params([
			("post", "happy"),
			("wow", "so"),
			("signposty", "a"),
			("signposty", "b"),
			("signposty", "rad"),
		])
	}

	fn probe(secrets: Arc<dyn SecretSource>) -> (Probe<RecordingTransport>, Arc<RecordingTransport>) {
		let transport = Arc::new(RecordingTransport::default());
		let probe = Probe::with_http_client(transport.clone(), secrets, key()).with_signer(
			Signer::default()
				.with_nonce_source(Arc::new(FixedNonce::new("fixednonce")))
				.with_clock(Arc::new(FixedClock::new(1_700_000_000))),
		);

		(probe, transport)
	}

	#[tokio::test]
	async fn run_sends_one_signed_request_and_reports_the_status() {
		let secrets = Arc::new(MemorySecretSource::default());

		secrets.insert(key(), "s3cr3t-value").expect("Fixture secret is non-empty.");

		let (probe, transport) = probe(secrets);
		let report = probe.run(request()).await.expect("Probe run should succeed.");

		assert_eq!(report.to_string(), "Got response:\nHTTP/1.1 202 Accepted");
		assert_eq!(report.signature_method, SignatureMethod::HmacSha1);

		let seen = transport.seen();

		assert_eq!(seen.len(), 1);
		assert_eq!(
			seen[0].body.as_deref(),
			Some(b"post=happy&wow=so&signposty=a&signposty=b&signposty=rad".as_slice())
		);

		let authorization = seen[0]
			.headers
			.iter()
			.find(|(name, _)| name == "authorization")
			.map(|(_, value)| value.clone())
			.expect("Signed request should carry an Authorization header.");
		let consumer = ConsumerCredentials::new(
			key(),
			ConsumerSecret::new("s3cr3t-value").expect("Fixture secret is non-empty."),
		);
		let header = verify(&request(), &authorization, &consumer, None)
			.expect("Header should verify against the known secret.");

		assert_eq!(header.signature, "hKuKBsfv3iaNaZovCNWCejjxd3E=");
	}

	#[tokio::test]
	async fn missing_secret_sends_nothing() {
		let (probe, transport) = probe(Arc::new(MemorySecretSource::default()));
		let err = probe.run(request()).await.expect_err("Unknown key should fail the run.");

		assert!(matches!(err, Error::Secret(SecretError::NotFound { .. })));
		assert!(transport.seen().is_empty());
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn from_config_rejects_a_zero_timeout() {
		let config = ProbeConfig { timeout_secs: 0, ..Default::default() };

		assert!(matches!(
			ReqwestProbe::from_config(&config),
			Err(Error::Config(crate::error::ConfigError::ZeroTimeout))
		));
	}

	#[test]
	fn debug_output_hides_secrets() {
		let (probe, _) = probe(Arc::new(MemorySecretSource::default()));
		let probe = probe.with_token(TokenCredentials::new(
			crate::auth::AccessToken::new("tok").expect("Fixture token is valid."),
			"token-secret",
		));
		let rendered = format!("{probe:?}");

		assert!(rendered.contains("java-test-key"));
		assert!(rendered.contains("token_set: true"));
		assert!(!rendered.contains("token-secret"));
	}
}

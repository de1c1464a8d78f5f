//! Probe configuration: defaults, JSON file loading, and the `name=value` parameter syntax.
//!
//! [`ProbeConfig::default`] reproduces the probe's stock run: consumer key `java-test-key`,
//! key proxy at `http://localhost:8787` routing `8000 -> 8888`, and a signed `POST` to
//! `http://localhost:8000/job?this=is&fun=right` carrying
//! `post=happy&wow=so&signposty=a&signposty=b&signposty=rad`.

// std
use std::{fs, path::PathBuf};
// self
use crate::{
	_prelude::*,
	auth::ConsumerKey,
	error::ConfigError,
	oauth::SignatureMethod,
	request::{FormRequest, HttpMethod},
};

/// Consumer key used when none is configured.
pub const DEFAULT_CONSUMER_KEY: &str = "java-test-key";
/// Key proxy base URL used when none is configured.
pub const DEFAULT_KEY_PROXY: &str = "http://localhost:8787";
/// Port the signed request is sent to by default.
pub const DEFAULT_FROM_PORT: u16 = 8000;
/// Port the validating proxy forwards to by default.
pub const DEFAULT_TO_PORT: u16 = 8888;
/// Target URL used when none is configured.
pub const DEFAULT_TARGET: &str = "http://localhost:8000/job?this=is&fun=right";
/// Per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One form parameter, written `name=value` on the command line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormParam {
	/// Parameter name.
	pub name: String,
	/// Parameter value; may be empty.
	pub value: String,
}
impl FormParam {
	/// Creates a parameter from its parts.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self { name: name.into(), value: value.into() }
	}
}
impl FromStr for FormParam {
	type Err = ConfigError;

	/// Splits on the first `=`; the name must be non-empty and the value may contain `=`.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.split_once('=') {
			Some((name, value)) if !name.is_empty() => Ok(Self::new(name, value)),
			_ => Err(ConfigError::InvalidParameter { raw: s.to_owned() }),
		}
	}
}
impl Display for FormParam {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}={}", self.name, self.value)
	}
}

/// Location of the key-distribution proxy and the route whose secret is requested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyProxyConfig {
	/// Proxy base URL; `/proxy/{from}/{to}/key/{key}/` is appended to its path.
	pub base_url: String,
	/// Port the signed request targets.
	pub from_port: u16,
	/// Port the validating proxy forwards to.
	pub to_port: u16,
}
impl KeyProxyConfig {
	/// Parsed proxy base URL.
	pub fn base_url(&self) -> Result<Url, ConfigError> {
		parse_url("key proxy", &self.base_url)
	}
}
impl Default for KeyProxyConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_KEY_PROXY.into(),
			from_port: DEFAULT_FROM_PORT,
			to_port: DEFAULT_TO_PORT,
		}
	}
}

/// Everything a probe run needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
	/// Consumer key whose secret is fetched and used for signing.
	pub consumer_key: String,
	/// Key proxy location.
	pub key_proxy: KeyProxyConfig,
	/// When set, secrets are read from `{key_dir}/{from}/{to}/{key}` instead of the proxy.
	pub key_dir: Option<PathBuf>,
	/// Signed endpoint, including any query string.
	pub target: String,
	/// Request method.
	pub method: HttpMethod,
	/// Form parameters in transmission order; repeated names are kept.
	pub params: Vec<FormParam>,
	/// Signature method.
	pub signature_method: SignatureMethod,
	/// Optional `realm` for the `Authorization` header.
	pub realm: Option<String>,
	/// Per-request timeout, in seconds.
	pub timeout_secs: u64,
}
impl ProbeConfig {
	/// Parses a JSON document; missing fields keep their defaults.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(json);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Malformed { source })
	}

	/// Reads and parses a JSON file.
	pub fn from_json_path(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
		let path = path.into();
		let json = fs::read_to_string(&path)
			.map_err(|source| ConfigError::ReadFile { path: path.display().to_string(), source })?;

		Self::from_json_str(&json)
	}

	/// Validated consumer key.
	pub fn consumer_key(&self) -> Result<ConsumerKey, ConfigError> {
		Ok(ConsumerKey::new(&self.consumer_key)?)
	}

	/// Parsed target URL.
	pub fn target_url(&self) -> Result<Url, ConfigError> {
		parse_url("target", &self.target)
	}

	/// Builds the request to sign from `method`, `target`, and `params`.
	pub fn request(&self) -> Result<FormRequest, ConfigError> {
		Ok(FormRequest::new(self.method, self.target_url()?)
			.with_params(self.params.iter().map(|p| (p.name.as_str(), p.value.as_str()))))
	}

	/// Per-request timeout; zero is rejected since reqwest would fail every request.
	pub fn timeout(&self) -> Result<std::time::Duration, ConfigError> {
		match self.timeout_secs {
			0 => Err(ConfigError::ZeroTimeout),
			secs => Ok(std::time::Duration::from_secs(secs)),
		}
	}
}
impl Default for ProbeConfig {
	fn default() -> Self {
		Self {
			consumer_key: DEFAULT_CONSUMER_KEY.into(),
			key_proxy: KeyProxyConfig::default(),
			key_dir: None,
			target: DEFAULT_TARGET.into(),
			method: HttpMethod::Post,
			params: default_params(),
			signature_method: SignatureMethod::HmacSha1,
			realm: None,
			timeout_secs: DEFAULT_TIMEOUT_SECS,
		}
	}
}

/// The stock body: `post=happy&wow=so&signposty=a&signposty=b&signposty=rad`.
pub fn default_params() -> Vec<FormParam> {
	[("post", "happy"), ("wow", "so"), ("signposty", "a"), ("signposty", "b"), ("signposty", "rad")]
		.into_iter()
		.map(|(name, value)| FormParam::new(name, value))
		.collect()
}

/// Parses a URL supplied for `field`.
pub fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { field, source })
}

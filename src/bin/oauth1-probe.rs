//! `oauth1-probe` binary.
//!
//! # Usage
//!
//! ```bash
//! # Stock run: secret from http://localhost:8787, POST to http://localhost:8000/job
//! oauth1-probe
//!
//! # Different key, secret read from a key directory, custom body
//! oauth1-probe --consumer-key node-test-key --key-dir ./keys \
//!     --param post=happy --param signposty=a --param signposty=b
//! ```

// std
use std::path::PathBuf;
// crates.io
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
// self
use oauth1_probe::{
	config::{FormParam, ProbeConfig},
	oauth::SignatureMethod,
	request::HttpMethod,
	runner::ReqwestProbe,
};

/// Sign a form request with OAuth 1.0a and print the status line it gets back.
#[derive(Debug, Parser)]
#[command(name = "oauth1-probe", version, about)]
struct Args {
	/// JSON configuration file; flags override its values.
	#[arg(long)]
	config: Option<PathBuf>,

	/// Consumer key to fetch the secret for and sign with.
	#[arg(long)]
	consumer_key: Option<String>,

	/// Key proxy base URL.
	#[arg(long)]
	key_proxy: Option<String>,

	/// Port the signed request targets, as routed by the key proxy.
	#[arg(long)]
	from_port: Option<u16>,

	/// Port the validating proxy forwards to.
	#[arg(long)]
	to_port: Option<u16>,

	/// Read secrets from `{dir}/{from}/{to}/{key}` instead of asking the key proxy.
	#[arg(long)]
	key_dir: Option<PathBuf>,

	/// Target URL, including any query string.
	#[arg(long)]
	target: Option<String>,

	/// Request method.
	#[arg(long)]
	method: Option<HttpMethod>,

	/// Form parameter as `name=value`; repeat to add more. Replaces the default body.
	#[arg(long = "param")]
	params: Vec<FormParam>,

	/// HMAC-SHA1, HMAC-SHA256, or PLAINTEXT.
	#[arg(long)]
	signature_method: Option<SignatureMethod>,

	/// Realm to put in the Authorization header.
	#[arg(long)]
	realm: Option<String>,

	/// Per-request timeout in seconds.
	#[arg(long)]
	timeout_secs: Option<u64>,

	/// Print the report as JSON.
	#[arg(long)]
	json: bool,

	/// Log level (trace, debug, info, warn, error).
	#[arg(long, default_value = "warn")]
	log_level: String,
}
impl Args {
	fn into_config(self) -> Result<ProbeConfig> {
		let mut config = match &self.config {
			Some(path) => ProbeConfig::from_json_path(path)?,
			None => ProbeConfig::default(),
		};

		if let Some(consumer_key) = self.consumer_key {
			config.consumer_key = consumer_key;
		}
		if let Some(key_proxy) = self.key_proxy {
			config.key_proxy.base_url = key_proxy;
		}
		if let Some(from_port) = self.from_port {
			config.key_proxy.from_port = from_port;
		}
		if let Some(to_port) = self.to_port {
			config.key_proxy.to_port = to_port;
		}
		if let Some(key_dir) = self.key_dir {
			config.key_dir = Some(key_dir);
		}
		if let Some(target) = self.target {
			config.target = target;
		}
		if let Some(method) = self.method {
			config.method = method;
		}
		if !self.params.is_empty() {
			config.params = self.params;
		}
		if let Some(signature_method) = self.signature_method {
			config.signature_method = signature_method;
		}
		if let Some(realm) = self.realm {
			config.realm = Some(realm);
		}
		if let Some(timeout_secs) = self.timeout_secs {
			config.timeout_secs = timeout_secs;
		}

		Ok(config)
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let args = Args::parse();
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

	let json = args.json;
	let config = args.into_config()?;
	let probe = ReqwestProbe::from_config(&config)?;

	tracing::info!(?probe, target = %config.target, "starting probe");

	let report = probe.run(config.request()?).await?;

	if json {
		println!("{}", serde_json::to_string_pretty(&report)?);
	} else {
		println!("{report}");
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::fs;
	// self
	use super::*;

	fn write_config(name: &str, json: &str) -> PathBuf {
		let path =
			std::env::temp_dir().join(format!("oauth1-probe-{}-{name}.json", std::process::id()));

		fs::write(&path, json).expect("Temp config should be writable.");

		path
	}

	fn parse(args: &[&str]) -> ProbeConfig {
		Args::try_parse_from(std::iter::once("oauth1-probe").chain(args.iter().copied()))
			.expect("Arguments should parse.")
			.into_config()
			.expect("Config should resolve.")
	}

	#[test]
	fn flags_override_the_config_file() {
		let path = write_config(
			"override",
			r#"{
				"consumer_key": "file-key",
				"key_proxy": { "base_url": "http://proxy.test:1", "from_port": 1, "to_port": 2 },
				"target": "http://file.test/job",
				"timeout_secs": 5
			}"#,
		);
		let path_arg = path.display().to_string();
		let config = parse(&[
			"--config",
			&path_arg,
			"--consumer-key",
			"node-test-key",
			"--to-port",
			"9999",
			"--signature-method",
			"HMAC-SHA256",
			"--realm",
			"Example",
		]);

		fs::remove_file(&path).expect("Temp config should be removable.");

		assert_eq!(config.consumer_key, "node-test-key");
		assert_eq!(config.key_proxy.base_url, "http://proxy.test:1");
		assert_eq!((config.key_proxy.from_port, config.key_proxy.to_port), (1, 9999));
		assert_eq!(config.target, "http://file.test/job");
		assert_eq!(config.signature_method, SignatureMethod::HmacSha256);
		assert_eq!(config.realm.as_deref(), Some("Example"));
		assert_eq!(config.timeout_secs, 5);
	}

	#[test]
	fn params_replace_the_body_only_when_given() {
		let path =
			write_config("params", r#"{ "params": [{ "name": "from", "value": "file" }] }"#);
		let path_arg = path.display().to_string();
		let kept = parse(&["--config", &path_arg]);
		let replaced =
			parse(&["--config", &path_arg, "--param", "a=1", "--param", "a=2", "--param", "b="]);

		fs::remove_file(&path).expect("Temp config should be removable.");

		assert_eq!(kept.params, vec![FormParam::new("from", "file")]);
		assert_eq!(
			replaced.params,
			vec![FormParam::new("a", "1"), FormParam::new("a", "2"), FormParam::new("b", "")]
		);
	}

	#[test]
	fn no_flags_means_the_stock_run() {
		assert_eq!(parse(&[]), ProbeConfig::default());
		assert!(Args::try_parse_from(["oauth1-probe", "--param", "novalue"]).is_err());
	}
}

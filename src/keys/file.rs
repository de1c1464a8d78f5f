//! [`SecretSource`] reading a key directory laid out as `{root}/{from_port}/{to_port}/{key}`.

// std
use std::{
	fs,
	io::ErrorKind,
	path::{Path, PathBuf},
};
// self
use crate::{
	auth::{ConsumerKey, ConsumerSecret},
	keys::{SecretError, SecretFuture, SecretSource},
};

/// Reads consumer secrets from the key directory shared with the proxy.
///
/// File contents are used verbatim, including any trailing newline.
#[derive(Clone, Debug)]
pub struct FileSecretSource {
	root: PathBuf,
	from_port: u16,
	to_port: u16,
}
impl FileSecretSource {
	/// Points the source at `root` for the `from_port` -> `to_port` route.
	pub fn new(root: impl Into<PathBuf>, from_port: u16, to_port: u16) -> Self {
		Self { root: root.into(), from_port, to_port }
	}

	/// Path of the key file for `key`.
	pub fn key_path(&self, key: &ConsumerKey) -> PathBuf {
		self.root
			.join(self.from_port.to_string())
			.join(self.to_port.to_string())
			.join(key.as_ref())
	}

	fn read_now(path: &Path, key: &ConsumerKey) -> Result<ConsumerSecret, SecretError> {
		let bytes = fs::read(path).map_err(|e| match e.kind() {
			ErrorKind::NotFound => SecretError::NotFound { key: key.to_string() },
			_ => SecretError::Read { path: path.display().to_string(), source: e },
		})?;
		let text =
			String::from_utf8(bytes).map_err(|_| SecretError::InvalidEncoding { key: key.to_string() })?;

		ConsumerSecret::new(text).map_err(|_| SecretError::Empty { key: key.to_string() })
	}
}
impl SecretSource for FileSecretSource {
	fn fetch_secret<'a>(&'a self, key: &'a ConsumerKey) -> SecretFuture<'a> {
		Box::pin(async move { Self::read_now(&self.key_path(key), key) })
	}
}

//! Thread-safe in-memory [`SecretSource`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerKey, ConsumerSecret, EmptySecretError},
	keys::{SecretError, SecretFuture, SecretSource},
};

type SecretMap = Arc<RwLock<HashMap<ConsumerKey, ConsumerSecret>>>;

/// Secret source that keeps key/secret pairs in-process.
#[derive(Clone, Debug, Default)]
pub struct MemorySecretSource(SecretMap);
impl MemorySecretSource {
	/// Registers or replaces the secret for `key`.
	pub fn insert(
		&self,
		key: ConsumerKey,
		secret: impl Into<String>,
	) -> Result<(), EmptySecretError> {
		let secret = ConsumerSecret::new(secret)?;

		self.0.write().insert(key, secret);

		Ok(())
	}

	/// Removes the secret for `key`, returning whether one was registered.
	pub fn remove(&self, key: &ConsumerKey) -> bool {
		self.0.write().remove(key).is_some()
	}

	fn fetch_now(map: &SecretMap, key: &ConsumerKey) -> Result<ConsumerSecret, SecretError> {
		map.read().get(key).cloned().ok_or_else(|| SecretError::NotFound { key: key.to_string() })
	}
}
impl SecretSource for MemorySecretSource {
	fn fetch_secret<'a>(&'a self, key: &'a ConsumerKey) -> SecretFuture<'a> {
		Box::pin(async move { Self::fetch_now(&self.0, key) })
	}
}

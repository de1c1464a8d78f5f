//! Strongly typed identifiers used as URL path segments and OAuth protocol values.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $path_segment:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view, $path_segment)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value, $path_segment)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Kind of identifier (consumer key, access token).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (consumer key, access token).
		kind: &'static str,
	},
	/// The identifier contains a path separator and cannot be used as a key-proxy segment.
	#[error("{kind} contains a path separator.")]
	ContainsSeparator {
		/// Kind of identifier (consumer key, access token).
		kind: &'static str,
	},
	/// The identifier is `.` or `..`, which URL and filesystem paths resolve away.
	#[error("{kind} cannot be a dot segment.")]
	DotSegment {
		/// Kind of identifier (consumer key, access token).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (consumer key, access token).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! {
	ConsumerKey,
	"OAuth consumer key identifying the calling application; also a key-proxy path segment.",
	"ConsumerKey",
	true
}
def_id! { AccessToken, "OAuth token identifier sent as `oauth_token`.", "AccessToken", false }

fn validate_view(
	kind: &'static str,
	view: &str,
	path_segment: bool,
) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if path_segment {
		if view.contains(['/', '\\']) {
			return Err(IdentifierError::ContainsSeparator { kind });
		}
		if view == "." || view == ".." {
			return Err(IdentifierError::DotSegment { kind });
		}
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

//! Consumer identifiers, redacted secrets, and the credential pairs handed to the signer.

pub mod credentials;
pub mod id;
pub mod secret;

pub use credentials::*;
pub use id::*;
pub use secret::*;

//! Single-slot storage contract and built-in stores for the current valid token.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::AccessToken};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Durable single-slot storage holding at most one current valid token.
///
/// Implementations expose plain read and write; the gate performs read-then-write without a
/// transaction, so concurrent issuances resolve as last-writer-wins.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the current token, or `None` when no token has ever been issued.
	///
	/// "Never issued" is a normal state and must not be reported as an error.
	fn read(&self) -> StoreFuture<'_, Option<AccessToken>>;

	/// Persists `token` as the sole current token, atomically replacing any prior value.
	fn write(&self, token: AccessToken) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StoreError {
	/// Backend-level failure (permissions, disk full, missing directory).
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Persisted content cannot be interpreted as a token.
	#[error("Corrupt token store: {message}.")]
	Corrupt {
		/// Human-readable error payload.
		message: String,
	},
}

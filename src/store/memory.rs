//! Thread-safe in-memory [`TokenStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{StoreFuture, TokenStore},
};

type Slot = Arc<RwLock<Option<AccessToken>>>;

/// Storage backend that keeps the current token in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slot);
impl MemoryStore {
	/// Creates a store already holding `token`.
	pub fn with_token(token: AccessToken) -> Self {
		Self(Arc::new(RwLock::new(Some(token))))
	}

	/// Returns the current token without going through the async contract.
	pub fn current(&self) -> Option<AccessToken> {
		self.0.read().clone()
	}
}
impl TokenStore for MemoryStore {
	fn read(&self) -> StoreFuture<'_, Option<AccessToken>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn write(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(token);

			Ok(())
		})
	}
}

//! Single-endpoint forward-auth gate for reverse proxies: standing secure-link tokens minted on
//! demand, persisted in a single-slot store, and delivered out-of-band through ntfy.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod notify;
pub mod obs;
pub mod server;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for unit and integration tests; enabled via `cfg(test)`
	//! or the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::GateConfig,
		gate::Gate,
		notify::{Notifier, NtfyNotifier},
		store::{MemoryStore, TokenStore},
	};

	/// Public domain used by every test fixture.
	pub const TEST_DOMAIN: &str = "tv.example.com";

	/// Builds a validated configuration pointing alerts at `ntfy_url`.
	pub fn test_config(ntfy_url: &str) -> GateConfig {
		GateConfig {
			public_domain: TEST_DOMAIN.into(),
			ntfy_url: ntfy_url.into(),
			notify_timeout_secs: 2,
			..GateConfig::default()
		}
	}

	/// Constructs a [`Gate`] backed by an in-memory store and the ntfy transport, returning the
	/// store so tests can inspect or seed the current token.
	pub fn build_test_gate(ntfy_url: &str) -> (Gate, Arc<MemoryStore>) {
		let config = test_config(ntfy_url);
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let topic = config.notify_url().expect("Test ntfy URL should be valid.");
		let notifier: Arc<dyn Notifier> = Arc::new(
			NtfyNotifier::new(topic, config.notify_timeout())
				.expect("Failed to build ntfy notifier for tests."),
		);

		let gate = Gate::new(&config, store, notifier).expect("Test gate config should be valid.");

		(gate, store_backend)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
use color_eyre as _;
#[cfg(test)] use {httpmock as _, tower as _};

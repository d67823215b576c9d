//! The validation gate: admit, reject, or mint and dispatch a new standing token.
//!
//! The gate moves a single global state through three shapes: no token issued, a token issued
//! and pending first use, and a token presented. Only credential-less requests issue tokens; a
//! token stays valid for repeated use until the next issuance supersedes it.

// crates.io
use tokio::task::JoinHandle;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, CREDENTIAL_PARAM, OriginalUri},
	config::GateConfig,
	error::ConfigError,
	notify::{Alert, NotifyError, Notifier, NtfyNotifier},
	obs::{self, GateSpan, NotifyOutcome},
	store::{FileStore, TokenStore},
};

/// Outcome handed back to the reverse proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
	/// Forward the request upstream (HTTP 200).
	Allow,
	/// Refuse the request (HTTP 403).
	Deny(DenyReason),
}
impl Decision {
	/// Whether the proxy should forward the request.
	pub const fn is_allowed(self) -> bool {
		matches!(self, Decision::Allow)
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn label(self) -> &'static str {
		match self {
			Decision::Allow => "allow",
			Decision::Deny(reason) => reason.as_str(),
		}
	}
}

/// Why a request was denied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
	/// No credential was presented; a new token was issued and dispatched out-of-band.
	TokenDispatched,
	/// A credential was presented but does not match the current token.
	InvalidToken,
}
impl DenyReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DenyReason::TokenDispatched => "token_dispatched",
			DenyReason::InvalidToken => "invalid_token",
		}
	}

	/// Plain-text body returned with the 403. Never reveals anything about the token.
	pub const fn message(self) -> &'static str {
		match self {
			DenyReason::TokenDispatched => "Access Denied: Token sent via ntfy.",
			DenyReason::InvalidToken => "Access Denied: Invalid token.",
		}
	}
}

/// A token minted by this request, together with its in-flight delivery.
pub struct Issuance {
	/// Ready-to-use URL carrying the new token.
	pub authorized_url: Url,
	/// Spawned delivery task. Dropping the handle detaches it; awaiting it yields the outcome.
	pub delivery: JoinHandle<Result<(), NotifyError>>,
}
impl Debug for Issuance {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Issuance")
			.field("authorized_url", &"<redacted>")
			.field("delivered", &self.delivery.is_finished())
			.finish()
	}
}

/// Result of a single validation.
#[derive(Debug)]
pub struct Verdict {
	/// What the proxy should do.
	pub decision: Decision,
	/// Present only when this request issued a new token.
	pub issuance: Option<Issuance>,
}
impl Verdict {
	fn allow() -> Self {
		Self { decision: Decision::Allow, issuance: None }
	}

	fn deny(reason: DenyReason) -> Self {
		Self { decision: Decision::Deny(reason), issuance: None }
	}
}

/// Authorization gate consulted by the reverse proxy before forwarding a request.
///
/// The gate owns no mutable state of its own; the [`TokenStore`] is the only shared resource.
#[derive(Clone)]
pub struct Gate {
	store: Arc<dyn TokenStore>,
	notifier: Arc<dyn Notifier>,
	authorized_base: Url,
	alert_title: String,
	notify_timeout: Duration,
	exempt_extensions: Vec<String>,
}
impl Gate {
	/// Creates a gate from a configuration and explicit collaborators.
	pub fn new(
		config: &GateConfig,
		store: Arc<dyn TokenStore>,
		notifier: Arc<dyn Notifier>,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self {
			store,
			notifier,
			authorized_base: config.authorized_base()?,
			alert_title: config.alert_title.clone(),
			notify_timeout: config.notify_timeout(),
			exempt_extensions: config.exempt_extensions.clone(),
		})
	}

	/// Creates a gate backed by a [`FileStore`] at `config.token_path` and an [`NtfyNotifier`].
	pub fn from_config(config: &GateConfig) -> Result<Self> {
		config.validate()?;

		let store: Arc<dyn TokenStore> = Arc::new(FileStore::open(&config.token_path)?);
		let notifier: Arc<dyn Notifier> =
			Arc::new(NtfyNotifier::new(config.notify_url()?, config.notify_timeout())?);

		Ok(Self::new(config, store, notifier)?)
	}

	/// Decides whether the request behind `original_uri` may proceed.
	///
	/// - Exempt extensions are admitted without touching the store.
	/// - Without a credential, a new token is generated, written over the previous one, and
	///   dispatched out-of-band; the request is denied.
	/// - With a credential, the request is admitted only if it exactly matches the current token.
	///   A mismatch never issues a new token.
	///
	/// Store failures propagate as [`Error::Storage`] and are never read as "no token".
	///
	/// Issuance is read-then-write without mutual exclusion: two concurrent credential-less
	/// requests both issue and both notify, and only the last write stays valid.
	pub async fn validate(&self, original_uri: &str) -> Result<Verdict> {
		let request = OriginalUri::parse(original_uri);
		let span = GateSpan::new("validate");
		let result = span
			.instrument(async {
				if request.has_extension(self.exempt_extensions.as_slice()) {
					tracing::debug!(path = request.path(), "Admitted exempt path.");

					return Ok(Verdict::allow());
				}

				match request.credential() {
					None => self.issue(request.path(), &span).await,
					Some(presented) => self.check(presented).await,
				}
			})
			.await;

		if let Ok(verdict) = &result {
			obs::record_decision(verdict.decision);
		}

		result
	}

	/// Builds `https://<public_domain><path>?secure=<token>`.
	pub fn authorized_url(&self, path: &str, token: &AccessToken) -> Url {
		let mut url = self.authorized_base.clone();

		url.set_path(path);
		url.query_pairs_mut().append_pair(CREDENTIAL_PARAM, token.expose());

		url
	}

	async fn check(&self, presented: &str) -> Result<Verdict> {
		let current = self.store.read().await?;

		match current {
			Some(token) if token.matches(presented) => {
				tracing::debug!(fingerprint = %token.fingerprint(), "Admitted current token.");

				Ok(Verdict::allow())
			},
			Some(_) => {
				tracing::info!("Rejected a credential that does not match the current token.");

				Ok(Verdict::deny(DenyReason::InvalidToken))
			},
			None => {
				tracing::info!("Rejected a credential while no token has been issued.");

				Ok(Verdict::deny(DenyReason::InvalidToken))
			},
		}
	}

	async fn issue(&self, path: &str, span: &GateSpan) -> Result<Verdict> {
		let token = AccessToken::generate();
		let authorized_url = self.authorized_url(path, &token);

		self.store.write(token.clone()).await?;

		tracing::info!(fingerprint = %token.fingerprint(), path, "Issued a new access token.");

		let alert = Alert::token_issued(self.alert_title.clone(), authorized_url.clone());
		let delivery = self.dispatch(alert, token.fingerprint(), span);

		Ok(Verdict {
			decision: Decision::Deny(DenyReason::TokenDispatched),
			issuance: Some(Issuance { authorized_url, delivery }),
		})
	}

	fn dispatch(
		&self,
		alert: Alert,
		fingerprint: String,
		span: &GateSpan,
	) -> JoinHandle<Result<(), NotifyError>> {
		use tracing::Instrument;

		let notifier = Arc::clone(&self.notifier);
		let timeout = self.notify_timeout;
		let delivery = async move {
			let result = match tokio::time::timeout(timeout, notifier.send(alert)).await {
				Ok(result) => result,
				Err(_) => Err(NotifyError::TimedOut { timeout }),
			};

			match &result {
				Ok(()) => {
					obs::record_notify(NotifyOutcome::Delivered);
					tracing::info!(%fingerprint, "Delivered token alert.");
				},
				Err(e) => {
					let outcome = match e {
						NotifyError::TimedOut { .. } => NotifyOutcome::TimedOut,
						_ => NotifyOutcome::Failed,
					};

					obs::record_notify(outcome);
					tracing::error!(
						%fingerprint,
						error = %e,
						"Token alert was not delivered; the owner will not receive this token."
					);
				},
			}

			result
		};

		tokio::spawn(delivery.instrument(span.span().clone()))
	}
}
impl Debug for Gate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gate")
			.field("authorized_base", &self.authorized_base.as_str())
			.field("notify_timeout", &self.notify_timeout)
			.field("exempt_extensions", &self.exempt_extensions)
			.finish()
	}
}

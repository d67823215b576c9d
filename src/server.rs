//! HTTP surface consumed by the reverse proxy's auth-subrequest mechanism.

// crates.io
use axum::{
	Router,
	extract::State,
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::get,
};
use tokio::{net::TcpListener, signal};
// self
use crate::{
	_prelude::*,
	config::GateConfig,
	gate::{Decision, Gate},
};

/// Header carrying the path+query the proxy was asked to serve.
pub const ORIGINAL_URI_HEADER: &str = "x-original-uri";
/// Route the proxy's auth subrequest targets.
pub const VALIDATE_PATH: &str = "/validate";

/// Builds the router exposing `GET /validate`.
pub fn router(gate: Arc<Gate>) -> Router {
	Router::new().route(VALIDATE_PATH, get(validate)).with_state(gate)
}

/// Binds `config.host:config.port` and serves until Ctrl+C or SIGTERM.
pub async fn serve(config: GateConfig) -> Result<()> {
	let gate = Arc::new(Gate::from_config(&config)?);
	let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;

	tracing::info!(
		addr = %listener.local_addr()?,
		domain = %config.public_domain,
		token_path = %config.token_path.display(),
		"Gate listening."
	);

	axum::serve(listener, router(gate)).with_graceful_shutdown(shutdown_signal()).await?;

	tracing::info!("Gate stopped.");

	Ok(())
}

async fn validate(State(gate): State<Arc<Gate>>, headers: HeaderMap) -> Response {
	let original_uri =
		headers.get(ORIGINAL_URI_HEADER).and_then(|value| value.to_str().ok()).unwrap_or("/");

	match gate.validate(original_uri).await {
		Ok(verdict) => decision_response(verdict.decision),
		Err(e) => {
			tracing::error!(error = %e, "Gate could not reach a decision.");

			(StatusCode::INTERNAL_SERVER_ERROR, "Internal error.").into_response()
		},
	}
}

fn decision_response(decision: Decision) -> Response {
	match decision {
		Decision::Allow => StatusCode::OK.into_response(),
		Decision::Deny(reason) => (StatusCode::FORBIDDEN, reason.message()).into_response(),
	}
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			tracing::warn!(error = %e, "Failed to listen for Ctrl+C.");
			std::future::pending::<()>().await;
		}
	};
	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			},
			Err(e) => {
				tracing::warn!(error = %e, "Failed to listen for SIGTERM.");
				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("Shutdown signal received.");
}

//! Parsing of the original URI a reverse proxy forwards with its auth subrequest.

// self
use crate::_prelude::*;

/// Query parameter carrying the presented credential.
pub const CREDENTIAL_PARAM: &str = "secure";

// Relative references are resolved against this base; only path and query survive.
const PLACEHOLDER_BASE: &str = "http://original.invalid/";

/// Path and presented credential extracted from an `X-Original-URI` value.
#[derive(Clone, PartialEq, Eq)]
pub struct OriginalUri {
	path: String,
	credential: Option<String>,
}
impl OriginalUri {
	/// Parses a path+query (or absolute URI) forwarded by the proxy.
	///
	/// Blank input is treated as `/`. The credential is the first non-empty, percent-decoded
	/// `secure` value; blank values count as absent. Dot segments are resolved as a browser would
	/// before requesting the path. Input that cannot be resolved at all yields `/` with no
	/// credential.
	pub fn parse(raw: &str) -> Self {
		let raw = raw.trim();
		let raw = if raw.is_empty() { "/" } else { raw };

		match Url::parse(PLACEHOLDER_BASE).and_then(|base| base.join(raw)) {
			Ok(url) => Self::from_url(&url),
			Err(_) => Self { path: "/".into(), credential: None },
		}
	}

	fn from_url(url: &Url) -> Self {
		let path = if url.path().is_empty() { "/".into() } else { url.path().to_owned() };
		let credential = url
			.query_pairs()
			.find(|(key, value)| key == CREDENTIAL_PARAM && !value.is_empty())
			.map(|(_, value)| value.into_owned());

		Self { path, credential }
	}

	/// Percent-encoded request path, never empty.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Presented credential, if any.
	pub fn credential(&self) -> Option<&str> {
		self.credential.as_deref()
	}

	/// Whether the path ends with any of `extensions`, ignoring ASCII case.
	pub fn has_extension<S>(&self, extensions: &[S]) -> bool
	where
		S: AsRef<str>,
	{
		let path = self.path.to_ascii_lowercase();

		extensions.iter().any(|ext| {
			let ext = ext.as_ref();

			!ext.is_empty() && path.ends_with(&ext.to_ascii_lowercase())
		})
	}
}
impl Debug for OriginalUri {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OriginalUri")
			.field("path", &self.path)
			.field("credential_present", &self.credential.is_some())
			.finish()
	}
}

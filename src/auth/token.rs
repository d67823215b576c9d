//! Standing access token minted by the gate and presented through the `secure` query parameter.

// crates.io
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
// self
use crate::_prelude::*;

/// Random bytes backing every generated token.
pub const TOKEN_BYTES: usize = 16;
/// Length of a generated token once hex-encoded.
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// Redacted token wrapper keeping the credential out of logs.
///
/// A token stays valid for repeated use until the next issuance replaces it in the
/// [`TokenStore`](crate::store::TokenStore). It deliberately does not implement `PartialEq`;
/// compare presented credentials with [`AccessToken::matches`].
#[derive(Clone)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps an existing token string, e.g. one loaded from a store.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Mints a fresh token from [`TOKEN_BYTES`] bytes of thread-local CSPRNG output.
	pub fn generate() -> Self {
		let bytes: [u8; TOKEN_BYTES] = rand::random();

		Self(hex::encode(bytes))
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Exact, case-sensitive comparison against a presented credential.
	///
	/// Runs in constant time for equal-length inputs so response timing does not leak how many
	/// leading characters were guessed correctly.
	pub fn matches(&self, presented: &str) -> bool {
		self.0.as_bytes().ct_eq(presented.as_bytes()).into()
	}

	/// Short SHA-256 prefix that lets logs correlate issuances without disclosing the token.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());

		hex::encode(&digest[..4])
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

//! Credential primitives: the standing access token and the proxied request it guards.

pub mod token;
pub mod uri;

pub use token::*;
pub use uri::*;

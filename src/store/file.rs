//! File-backed [`TokenStore`] that keeps the current token as raw text.

// std
use std::{
	fs::{self, OpenOptions},
	io::{ErrorKind, Write},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{StoreError, StoreFuture, TokenStore},
};

/// Persists the current token to a single file, replacing it atomically on every write.
///
/// The file holds the bare token with no trailing structure. Anyone able to read it holds the
/// valid credential, so deployments must restrict access to it; on Unix new files are created
/// with mode `0600`.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	write_guard: Arc<Mutex<()>>,
}
impl FileStore {
	/// Opens a store at `path`, creating the parent directory when missing.
	///
	/// The token file itself is only created by the first write.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		Ok(Self { path, write_guard: Default::default() })
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn read_now(&self) -> Result<Option<AccessToken>, StoreError> {
		let contents = match fs::read_to_string(&self.path) {
			Ok(contents) => contents,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) if e.kind() == ErrorKind::InvalidData =>
				return Err(StoreError::Corrupt {
					message: format!("{} is not valid UTF-8", self.path.display()),
				}),
			Err(e) =>
				return Err(StoreError::Backend {
					message: format!("Failed to read {}: {e}", self.path.display()),
				}),
		};
		let token = contents.trim();

		if token.is_empty() {
			return Ok(None);
		}
		if token.chars().any(char::is_whitespace) {
			return Err(StoreError::Corrupt {
				message: format!("{} holds more than a single token", self.path.display()),
			});
		}

		Ok(Some(AccessToken::new(token)))
	}

	fn write_now(&self, token: &AccessToken) -> Result<(), StoreError> {
		let _guard = self.write_guard.lock();

		Self::ensure_parent_exists(&self.path)?;

		let mut tmp_path = self.path.clone().into_os_string();

		tmp_path.push(".tmp");

		let tmp_path = PathBuf::from(tmp_path);

		{
			let mut file = Self::create_private(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(token.expose().as_bytes()).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn create_private(path: &Path) -> std::io::Result<fs::File> {
		let mut options = OpenOptions::new();

		options.write(true).create(true).truncate(true);

		#[cfg(unix)]
		{
			use std::os::unix::fs::OpenOptionsExt;

			options.mode(0o600);
		}

		options.open(path)
	}
}
impl TokenStore for FileStore {
	fn read(&self) -> StoreFuture<'_, Option<AccessToken>> {
		Box::pin(async move { self.read_now() })
	}

	fn write(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.write_now(&token) })
	}
}

//! Simple file-backed [`TokenStore`] keeping sessions alive across process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	store::{StoreError, StoreFuture, TokenStore},
};

/// On-disk shape of a persisted session.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
	tokens: TokenPair,
	#[serde(with = "time::serde::rfc3339")]
	saved_at: OffsetDateTime,
}

/// Persists the session to a JSON snapshot after each mutation.
///
/// Writes go to a temporary sibling first and land via atomic rename, so a crash mid-write never
/// leaves a torn snapshot behind. Clearing the session removes the file.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
	path: PathBuf,
	inner: Arc<RwLock<Option<TokenPair>>>,
}
impl FileTokenStore {
	/// Opens (or creates) a store at the provided path, eagerly loading an existing session.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<Option<TokenPair>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let session: StoredSession =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(Some(session.tokens))
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &Option<TokenPair>) -> Result<(), StoreError> {
		let Some(tokens) = contents else {
			if self.path.exists() {
				fs::remove_file(&self.path).map_err(|e| StoreError::Backend {
					message: format!("Failed to remove {}: {e}", self.path.display()),
				})?;
			}

			return Ok(());
		};

		Self::ensure_parent_exists(&self.path)?;

		let session = StoredSession { tokens: tokens.clone(), saved_at: OffsetDateTime::now_utc() };
		let serialized =
			serde_json::to_vec_pretty(&session).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize session snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
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
}
impl TokenStore for FileTokenStore {
	fn access(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async move { Ok(self.inner.read().as_ref().map(|pair| pair.access.clone())) })
	}

	fn refresh(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async move { Ok(self.inner.read().as_ref().map(|pair| pair.refresh.clone())) })
	}

	fn set_tokens(&self, access: TokenSecret, refresh: TokenSecret) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = Some(TokenPair { access, refresh });
			self.persist_locked(&guard)
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = None;
			self.persist_locked(&guard)
		})
	}
}

/* src/storage/mod.rs */

//!
//! Persistence primitives: the [`Backend`] trait, the record codec and the
//! [`load`] / [`save`] / [`on_change`] helpers built on top of them.

pub mod backend;
mod error;
pub mod record;
mod sync;

pub use backend::MemoryBackend;
#[cfg(feature = "fs")]
pub use backend::FileBackend;
pub use error::StorageError;
pub use sync::{load, on_change, save};

use std::fmt;
use std::sync::Arc;

use crate::diagnostics::{Diagnostic, Diagnostics, LogDiagnostics};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "feature-flags";

/// A write to a key, as observed by an instance other than the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
	pub key: String,
	pub old_value: Option<String>,
	/// `None` when the key was removed.
	pub new_value: Option<String>,
}

/// Callback registered through [`Backend::watch`].
pub type ChangeHandler = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

/// A key-value text store.
pub trait Backend: Send + Sync {
	/// Reads the raw value at `key`.
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

	/// Writes `value` at `key`.
	fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

	/// Deletes `key`. Removing a missing key is not an error.
	fn remove(&self, key: &str) -> Result<(), StorageError>;

	/// Registers `handler` for writes to `key` made by other instances.
	///
	/// Backends without a notification mechanism return `None`.
	fn watch(&self, _key: &str, _handler: ChangeHandler) -> Option<WatchHandle> {
		None
	}
}

/// Keeps a [`Backend::watch`] registration alive. Dropping it unsubscribes.
#[must_use = "the listener is removed when the handle is dropped"]
pub struct WatchHandle {
	cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl WatchHandle {
	/// Wraps the function that tears the registration down.
	pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// Removes the listener now.
	pub fn unsubscribe(mut self) {
		self.cancel_now();
	}

	fn cancel_now(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl Drop for WatchHandle {
	fn drop(&mut self) {
		self.cancel_now();
	}
}

impl fmt::Debug for WatchHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WatchHandle")
			.field("active", &self.cancel.is_some())
			.finish()
	}
}

/// Where and whether flags are persisted. Immutable once built.
#[derive(Clone)]
pub struct StorageConfig {
	enabled: bool,
	storage_key: String,
	backend: Arc<dyn Backend>,
	diagnostics: Arc<dyn Diagnostics>,
}

impl StorageConfig {
	/// Enabled persistence to `backend` under [`DEFAULT_STORAGE_KEY`].
	pub fn new(backend: impl Backend + 'static) -> Self {
		Self::shared(Arc::new(backend))
	}

	/// Same as [`new`](Self::new) for a backend that is already shared.
	pub fn shared(backend: Arc<dyn Backend>) -> Self {
		Self {
			enabled: true,
			storage_key: DEFAULT_STORAGE_KEY.to_string(),
			backend,
			diagnostics: Arc::new(LogDiagnostics),
		}
	}

	/// Persistence turned off. Every storage helper is a no-op with it.
	pub fn disabled() -> Self {
		Self::new(MemoryBackend::new()).enabled(false)
	}

	pub fn storage_key(mut self, key: impl Into<String>) -> Self {
		self.storage_key = key.into();
		self
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
		self.diagnostics = diagnostics;
		self
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn key(&self) -> &str {
		&self.storage_key
	}

	pub fn backend(&self) -> &Arc<dyn Backend> {
		&self.backend
	}

	pub(crate) fn diagnostics_sink(&self) -> &Arc<dyn Diagnostics> {
		&self.diagnostics
	}

	pub(crate) fn report(&self, diagnostic: Diagnostic) {
		self.diagnostics.report(diagnostic);
	}
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self::disabled()
	}
}

impl fmt::Debug for StorageConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StorageConfig")
			.field("enabled", &self.enabled)
			.field("storage_key", &self.storage_key)
			.finish_non_exhaustive()
	}
}

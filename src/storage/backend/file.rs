/* src/storage/backend/file.rs */

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use notify::{EventKind, RecursiveMode, Watcher as _};

use super::super::{Backend, ChangeHandler, StorageError, StorageEvent, WatchHandle};

/// Stores each key as `<root>/<key>.json`.
///
/// Each write goes through its own temporary file in the root and a rename,
/// so readers never see a partial record, even with several writers.
/// [`watch`](Backend::watch) uses a filesystem watcher on the root
/// directory, so other processes sharing the directory act as other
/// instances.
#[derive(Debug, Clone)]
pub struct FileBackend {
	root: PathBuf,
}

impl FileBackend {
	/// Creates the backend, creating `root` if it does not exist yet.
	pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
		let root = root.into();
		fs::create_dir_all(&root)?;
		Ok(Self { root })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Resolves the file for `key`, refusing anything that is not a plain name.
	fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
		let mut components = Path::new(key).components();
		match (components.next(), components.next()) {
			(Some(Component::Normal(_)), None) => Ok(self.root.join(format!("{}.json", key))),
			_ => Err(StorageError::SandboxViolation {
				key: key.to_string(),
			}),
		}
	}
}

impl Backend for FileBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		let path = self.resolve(key)?;
		match fs::read_to_string(path) {
			Ok(raw) => Ok(Some(raw)),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(StorageError::Io(e)),
		}
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		let path = self.resolve(key)?;
		let mut tmp = tempfile::Builder::new()
			.prefix(".flags")
			.suffix(".tmp")
			.tempfile_in(&self.root)?;
		tmp.write_all(value.as_bytes())?;
		tmp.persist(&path).map_err(|e| StorageError::Io(e.error))?;
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		let path = self.resolve(key)?;
		match fs::remove_file(path) {
			Err(e) if e.kind() != ErrorKind::NotFound => Err(StorageError::Io(e)),
			_ => Ok(()),
		}
	}

	fn watch(&self, key: &str, handler: ChangeHandler) -> Option<WatchHandle> {
		let path = self.resolve(key).ok()?;
		let file_name = path.file_name()?.to_os_string();
		let key = key.to_string();

		let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
			let event = match res {
				Ok(event) => event,
				Err(_e) => {
					#[cfg(feature = "logging")]
					log::error!("file watch error for '{}': {:?}", key, _e);
					return;
				}
			};
			if !matches!(
				event.kind,
				EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
			) {
				return;
			}
			if !event
				.paths
				.iter()
				.any(|p| p.file_name() == Some(file_name.as_os_str()))
			{
				return;
			}

			// Always dispatch the current content; bursts of events for one
			// write collapse into identical reads.
			let new_value = fs::read_to_string(&path).ok();
			handler(&StorageEvent {
				key: key.clone(),
				old_value: None,
				new_value,
			});
		});

		let mut watcher = match watcher {
			Ok(watcher) => watcher,
			Err(_e) => {
				#[cfg(feature = "logging")]
				log::warn!("file change notifications unavailable: {}", _e);
				return None;
			}
		};
		if let Err(_e) = watcher.watch(&self.root, RecursiveMode::NonRecursive) {
			#[cfg(feature = "logging")]
			log::warn!("cannot watch {:?}: {}", self.root, _e);
			return None;
		}

		let watcher = Mutex::new(watcher);
		Some(WatchHandle::new(move || drop(watcher)))
	}
}

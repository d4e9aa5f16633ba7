/* src/storage/sync.rs */

use std::sync::Arc;

use super::{ChangeHandler, StorageConfig, StorageError, StorageEvent, WatchHandle, record};
use crate::diagnostics::Diagnostic;
use crate::holder::{FlagSet, Overrides};

/// Reads the persisted record and keeps only the keys known to `defaults`.
///
/// Returns an empty mapping when storage is disabled, nothing is stored, or
/// the record is malformed. Failures are reported, never returned.
pub fn load(config: &StorageConfig, defaults: &FlagSet) -> Overrides {
	if !config.is_enabled() {
		return Overrides::new();
	}

	match read(config, defaults) {
		Ok(overrides) => overrides,
		Err(error) => {
			config.report(Diagnostic::LoadFailed {
				key: config.key().to_string(),
				error,
			});
			Overrides::new()
		}
	}
}

fn read(config: &StorageConfig, defaults: &FlagSet) -> Result<Overrides, StorageError> {
	let Some(raw) = config.backend().get(config.key())? else {
		#[cfg(feature = "logging")]
		log::debug!("no persisted flags under '{}'", config.key());
		return Ok(Overrides::new());
	};
	Ok(defaults.restrict(record::decode(&raw)?))
}

/// Writes `flags` under the configured key. Best effort: failures are reported.
pub fn save(config: &StorageConfig, flags: &FlagSet) {
	if !config.is_enabled() {
		return;
	}

	let written = record::encode(flags).and_then(|raw| config.backend().set(config.key(), &raw));
	if let Err(error) = written {
		config.report(Diagnostic::SaveFailed {
			key: config.key().to_string(),
			error,
		});
	}
}

/// Listens for writes to the configured key made by other instances.
///
/// `callback` receives the new record restricted to the keys of `known`.
/// Returns `None` when storage is disabled or the backend cannot notify.
/// Dropping the handle removes the listener.
pub fn on_change<F>(config: &StorageConfig, known: &FlagSet, callback: F) -> Option<WatchHandle>
where
	F: Fn(Overrides) + Send + Sync + 'static,
{
	if !config.is_enabled() {
		return None;
	}

	let known = known.clone();
	let key = config.key().to_string();
	let diagnostics = Arc::clone(config.diagnostics_sink());

	let handler: ChangeHandler = Arc::new(move |event: &StorageEvent| {
		if event.key != key {
			return;
		}
		// A removed key carries nothing to apply.
		let Some(raw) = event.new_value.as_deref() else {
			return;
		};
		match record::decode(raw) {
			Ok(flags) => callback(known.restrict(flags)),
			Err(error) => diagnostics.report(Diagnostic::SyncFailed {
				key: key.clone(),
				error,
			}),
		}
	});

	config.backend().watch(config.key(), handler)
}

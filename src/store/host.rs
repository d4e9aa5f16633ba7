/* src/store/host.rs */

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::FlagStore;
use crate::holder::{FlagError, FlagSet};
use crate::storage::StorageConfig;

/// Prefix of every flag store id.
pub const STORE_ID_PREFIX: &str = "featureFlags-";

/// The id a store persisting under `storage_key` is registered with.
pub fn store_id(storage_key: &str) -> String {
	format!("{}{}", STORE_ID_PREFIX, storage_key)
}

/// Registry of named flag stores.
///
/// Defining an id twice returns the live instance, so every part of an
/// application that asks for the same id shares one store.
#[derive(Debug, Default)]
pub struct StoreHost {
	stores: Mutex<HashMap<String, Arc<FlagStore>>>,
	closed: AtomicBool,
}

impl StoreHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a store, or returns the existing one with the same id.
	///
	/// The first definition wins: when the id already exists, `initial` is
	/// only compared for its flag names, and `config` is ignored. The live
	/// store keeps the backend, key and diagnostics it was created with.
	///
	/// Fails if the id is taken by a store with different flag names, or if
	/// the host was closed.
	pub fn define(
		&self,
		id: impl Into<String>,
		initial: FlagSet,
		config: StorageConfig,
	) -> Result<Arc<FlagStore>, FlagError> {
		let id = id.into();
		if self.closed.load(Ordering::SeqCst) {
			return Err(FlagError::HostClosed { id });
		}

		let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
		if let Some(existing) = stores.get(&id) {
			if !existing.initial().same_schema(&initial) {
				return Err(FlagError::StoreConflict { id });
			}
			return Ok(Arc::clone(existing));
		}

		let store = Arc::new(FlagStore::new(id.clone(), initial, config));
		stores.insert(id, Arc::clone(&store));
		Ok(store)
	}

	/// Returns the live store registered under `id`.
	pub fn get(&self, id: &str) -> Option<Arc<FlagStore>> {
		self.stores
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.get(id)
			.cloned()
	}

	pub fn ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self
			.stores
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.keys()
			.cloned()
			.collect();
		ids.sort();
		ids
	}

	/// Stops accepting registrations and releases the host's references.
	/// Stores already handed out keep working.
	pub fn close(&self) {
		self.closed.store(true, Ordering::SeqCst);
		self.stores
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clear();
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}
}

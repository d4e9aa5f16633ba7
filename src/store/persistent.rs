/* src/store/persistent.rs */

use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::holder::{
	FeatureFlags, FlagController, FlagError, FlagEvent, FlagSet, Listener, ListenerId, Origin,
};
use crate::storage::{self, StorageConfig, WatchHandle};

/// A flag controller whose state survives restarts and follows writes made
/// by other instances sharing the same backend.
///
/// Created through [`StoreHost::define`](super::StoreHost::define). On
/// creation the persisted record is merged into the initial flags, then
/// every local change is saved and every remote change is applied. Remote
/// changes are not written back.
pub struct FlagStore {
	id: String,
	initial: FlagSet,
	controller: Arc<FlagController>,
	config: StorageConfig,
	remote: Option<WatchHandle>,
}

impl FlagStore {
	pub(crate) fn new(id: String, initial: FlagSet, config: StorageConfig) -> Self {
		let controller = Arc::new(FlagController::new(initial.clone()));
		// Listeners and the backend handler must not keep the controller alive.
		let weak = Arc::downgrade(&controller);

		let restored = storage::load(&config, &initial);
		if !restored.is_empty() {
			#[cfg(feature = "logging")]
			log::debug!(
				"store '{}' restored {} flag(s) from '{}'",
				id,
				restored.len(),
				config.key()
			);
			controller.apply(&restored, Origin::Restore);
		}

		if config.is_enabled() {
			let save_config = config.clone();
			let saved = Weak::clone(&weak);
			// Saves are serialized and write the state current at save time.
			let saving = Mutex::new(());
			controller.subscribe(move |event: &FlagEvent| {
				if !event.origin.is_local() {
					return;
				}
				let Some(controller) = saved.upgrade() else {
					return;
				};
				let _guard = saving.lock().unwrap_or_else(PoisonError::into_inner);
				storage::save(&save_config, &controller.flags());
			});
		}

		let remote = storage::on_change(&config, &initial, move |overrides| {
			if let Some(controller) = weak.upgrade() {
				#[cfg(feature = "logging")]
				log::debug!("applying {} flag(s) from another instance", overrides.len());
				controller.apply(&overrides, Origin::Remote);
			}
		});

		Self {
			id,
			initial,
			controller,
			config,
			remote,
		}
	}

	/// The id this store is registered under.
	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn config(&self) -> &StorageConfig {
		&self.config
	}

	/// The values the store was created with.
	pub fn initial(&self) -> &FlagSet {
		&self.initial
	}

	/// True if the store receives writes made by other instances.
	pub fn is_synced(&self) -> bool {
		self.remote.is_some()
	}

	pub fn is_enabled(&self, key: &str) -> bool {
		self.controller.is_enabled(key)
	}

	pub fn get(&self, key: &str) -> Option<bool> {
		self.controller.get(key)
	}

	pub fn set(&self, key: &str, value: bool) -> Result<(), FlagError> {
		self.controller.set(key, value)
	}

	pub fn enable(&self, key: &str) -> Result<(), FlagError> {
		self.controller.enable(key)
	}

	pub fn disable(&self, key: &str) -> Result<(), FlagError> {
		self.controller.disable(key)
	}

	pub fn flags(&self) -> Arc<FlagSet> {
		self.controller.flags()
	}

	/// Restores every flag to its construction-time value, ignoring what
	/// storage holds. The result is saved like any local change.
	pub fn reset(&self) {
		self.controller.reset_to(&self.initial);
	}

	pub fn subscribe<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&FlagEvent) + Send + Sync + 'static,
	{
		self.controller.subscribe(listener)
	}

	pub fn unsubscribe(&self, id: ListenerId) -> bool {
		self.controller.unsubscribe(id)
	}

	#[cfg(feature = "events")]
	pub fn events(&self) -> tokio::sync::broadcast::Receiver<FlagEvent> {
		self.controller.events()
	}

	pub fn revision(&self) -> u64 {
		self.controller.revision()
	}
}

impl FeatureFlags for FlagStore {
	fn get(&self, key: &str) -> Option<bool> {
		FlagStore::get(self, key)
	}

	fn set(&self, key: &str, value: bool) -> Result<(), FlagError> {
		FlagStore::set(self, key, value)
	}

	fn flags(&self) -> Arc<FlagSet> {
		FlagStore::flags(self)
	}

	fn subscribe(&self, listener: Listener) -> ListenerId {
		self.controller.add_listener(listener)
	}

	fn unsubscribe(&self, id: ListenerId) -> bool {
		FlagStore::unsubscribe(self, id)
	}
}

impl std::fmt::Debug for FlagStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlagStore")
			.field("id", &self.id)
			.field("flags", &self.controller.flags())
			.field("config", &self.config)
			.field("synced", &self.is_synced())
			.finish()
	}
}

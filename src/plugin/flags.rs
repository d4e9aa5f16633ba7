/* src/plugin/flags.rs */

use std::sync::Arc;

use crate::holder::{
	FeatureFlags, FlagController, FlagError, FlagEvent, FlagSet, Listener, ListenerId,
};
use crate::store::FlagStore;

/// The flag handle published by [`FlagsPlugin`](super::FlagsPlugin).
///
/// Which variant is used is decided once, at install time. Clones share
/// the same underlying state.
#[derive(Debug, Clone)]
pub enum Flags {
	/// In-memory only.
	Plain {
		controller: Arc<FlagController>,
		initial: Arc<FlagSet>,
	},
	/// Backed by a host-registered [`FlagStore`].
	Persistent(Arc<FlagStore>),
}

impl Flags {
	/// An in-memory handle over a copy of `initial`.
	pub fn plain(initial: FlagSet) -> Self {
		Flags::Plain {
			controller: Arc::new(FlagController::new(initial.clone())),
			initial: Arc::new(initial),
		}
	}

	pub fn is_persistent(&self) -> bool {
		matches!(self, Flags::Persistent(_))
	}

	/// Restores every flag to the value it was installed with.
	pub fn reset(&self) {
		match self {
			Flags::Plain {
				controller,
				initial,
			} => {
				controller.reset_to(initial);
			}
			Flags::Persistent(store) => store.reset(),
		}
	}

	pub fn subscribe<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&FlagEvent) + Send + Sync + 'static,
	{
		match self {
			Flags::Plain { controller, .. } => controller.subscribe(listener),
			Flags::Persistent(store) => store.subscribe(listener),
		}
	}

	pub fn unsubscribe(&self, id: ListenerId) -> bool {
		match self {
			Flags::Plain { controller, .. } => controller.unsubscribe(id),
			Flags::Persistent(store) => store.unsubscribe(id),
		}
	}

	#[cfg(feature = "events")]
	pub fn events(&self) -> tokio::sync::broadcast::Receiver<FlagEvent> {
		match self {
			Flags::Plain { controller, .. } => controller.events(),
			Flags::Persistent(store) => store.events(),
		}
	}

	/// The underlying store, if this handle is persistent.
	pub fn store(&self) -> Option<&Arc<FlagStore>> {
		match self {
			Flags::Plain { .. } => None,
			Flags::Persistent(store) => Some(store),
		}
	}
}

impl FeatureFlags for Flags {
	fn get(&self, key: &str) -> Option<bool> {
		match self {
			Flags::Plain { controller, .. } => controller.get(key),
			Flags::Persistent(store) => store.get(key),
		}
	}

	fn set(&self, key: &str, value: bool) -> Result<(), FlagError> {
		match self {
			Flags::Plain { controller, .. } => controller.set(key, value),
			Flags::Persistent(store) => store.set(key, value),
		}
	}

	fn flags(&self) -> Arc<FlagSet> {
		match self {
			Flags::Plain { controller, .. } => controller.flags(),
			Flags::Persistent(store) => store.flags(),
		}
	}

	fn subscribe(&self, listener: Listener) -> ListenerId {
		match self {
			Flags::Plain { controller, .. } => controller.add_listener(listener),
			Flags::Persistent(store) => FeatureFlags::subscribe(&**store, listener),
		}
	}

	fn unsubscribe(&self, id: ListenerId) -> bool {
		Flags::unsubscribe(self, id)
	}
}

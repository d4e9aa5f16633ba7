/* src/holder/api.rs */

use std::sync::Arc;

use super::{FlagController, FlagError, FlagSet, Listener, ListenerId};

/// The capability set every flag handle offers.
///
/// Application code should depend on this trait (or on
/// [`Flags`](crate::plugin::Flags)) rather than on a concrete controller.
pub trait FeatureFlags {
	/// Current value of `key`, or `None` if it is not a known flag.
	fn get(&self, key: &str) -> Option<bool>;

	/// Current value of `key`. Unknown keys read as `false`.
	fn is_enabled(&self, key: &str) -> bool {
		self.get(key).unwrap_or(false)
	}

	fn set(&self, key: &str, value: bool) -> Result<(), FlagError>;

	fn enable(&self, key: &str) -> Result<(), FlagError> {
		self.set(key, true)
	}

	fn disable(&self, key: &str) -> Result<(), FlagError> {
		self.set(key, false)
	}

	/// Read-only snapshot of every flag.
	fn flags(&self) -> Arc<FlagSet>;

	/// Registers a listener, run synchronously after every change.
	fn subscribe(&self, listener: Listener) -> ListenerId;

	/// Removes a listener. Returns false if it was not registered.
	fn unsubscribe(&self, id: ListenerId) -> bool;
}

impl FeatureFlags for FlagController {
	fn get(&self, key: &str) -> Option<bool> {
		FlagController::get(self, key)
	}

	fn set(&self, key: &str, value: bool) -> Result<(), FlagError> {
		FlagController::set(self, key, value)
	}

	fn flags(&self) -> Arc<FlagSet> {
		FlagController::flags(self)
	}

	fn subscribe(&self, listener: Listener) -> ListenerId {
		self.add_listener(listener)
	}

	fn unsubscribe(&self, id: ListenerId) -> bool {
		FlagController::unsubscribe(self, id)
	}
}

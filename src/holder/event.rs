/* src/holder/event.rs */

use std::sync::Arc;

use super::FlagSet;

/// Where a mutation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
	/// `set`, `enable` or `disable` on this instance.
	Local,
	/// Values restored from the storage backend at startup.
	Restore,
	/// A change written by another instance sharing the backend.
	Remote,
	/// Rollback to the construction-time values.
	Reset,
}

impl Origin {
	/// True for mutations that originate in this instance and must be persisted.
	pub fn is_local(self) -> bool {
		matches!(self, Origin::Local | Origin::Reset)
	}
}

/// A single flag transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagChange {
	pub key: String,
	pub old: bool,
	pub new: bool,
}

/// Emitted once per mutating operation that changed at least one flag.
#[derive(Debug, Clone)]
pub struct FlagEvent {
	pub origin: Origin,
	/// Controller revision after the mutation.
	pub revision: u64,
	pub changes: Vec<FlagChange>,
	/// The full flag set after the mutation.
	pub snapshot: Arc<FlagSet>,
}

impl FlagEvent {
	/// Returns the change for `key`, if this event touched it.
	pub fn change(&self, key: &str) -> Option<&FlagChange> {
		self.changes.iter().find(|c| c.key == key)
	}
}

/* src/holder/error.rs */

/// Configuration errors. These are returned to the caller; persistence
/// problems are never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
	/// The key is not part of the flag set the controller was created with.
	#[error("unknown feature flag: {key}")]
	UnknownFlag { key: String },
	/// `use_flags` was called on a context no plugin was installed into.
	#[error("feature flags plugin not installed: install a FlagsPlugin into this context before calling use_flags")]
	NotInstalled,
	/// The context already holds a flags handle.
	#[error("feature flags plugin already installed in this context")]
	AlreadyInstalled,
	/// A store with this id exists with a different set of flags.
	#[error("store '{id}' is already registered with a different flag set")]
	StoreConflict { id: String },
	/// The store host no longer accepts registrations.
	#[error("store host is closed, cannot register '{id}'")]
	HostClosed { id: String },
}

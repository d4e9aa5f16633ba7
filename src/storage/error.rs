/* src/storage/error.rs */

/// Errors raised by storage backends and the record codec.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	/// IO error from a backend.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// The stored text is not a valid flag record.
	#[error("parse error: {0}")]
	Parse(String),

	/// The flag set could not be serialized.
	#[error("serialize error: {0}")]
	Serialize(String),

	/// The write would exceed the backend's size limit.
	#[error("quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
	QuotaExceeded {
		key: String,
		needed: usize,
		quota: usize,
	},

	/// The key would resolve outside of the backend's root.
	#[error("sandbox violation for key '{key}'")]
	SandboxViolation { key: String },

	/// The backend cannot be used in this environment.
	#[error("storage unavailable: {0}")]
	Unavailable(String),
}

/* src/diagnostics.rs */

//!
//! The one-way channel for recoverable failures.
//!
//! Persistence errors never reach the caller of a flag operation. They are
//! handed to a [`Diagnostics`] sink instead, which by default writes them
//! to the `log` facade.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::holder::FlagError;
use crate::storage::StorageError;

/// A recoverable failure, reported instead of returned.
#[derive(Debug)]
pub enum Diagnostic {
	/// Persisted state could not be read or parsed. Defaults were kept.
	LoadFailed { key: String, error: StorageError },
	/// The current state could not be written. Memory stays authoritative.
	SaveFailed { key: String, error: StorageError },
	/// A change notification from another instance could not be applied.
	SyncFailed { key: String, error: StorageError },
	/// Storage was enabled but no store host was supplied, so nothing persists.
	PersistenceUnavailable { key: String },
	/// The persistent store could not be created; installation aborted.
	StoreFailed { id: String, error: FlagError },
}

impl Diagnostic {
	/// Warnings describe degraded behaviour; everything else is an error.
	pub fn is_warning(&self) -> bool {
		matches!(self, Diagnostic::PersistenceUnavailable { .. })
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Diagnostic::LoadFailed { key, error } => {
				write!(f, "failed to load flags from storage key '{}': {}", key, error)
			}
			Diagnostic::SaveFailed { key, error } => {
				write!(f, "failed to save flags to storage key '{}': {}", key, error)
			}
			Diagnostic::SyncFailed { key, error } => {
				write!(f, "failed to sync flags from another instance on '{}': {}", key, error)
			}
			Diagnostic::PersistenceUnavailable { key } => write!(
				f,
				"storage is enabled for '{}' but no store host was provided; flags will not persist",
				key
			),
			Diagnostic::StoreFailed { id, error } => {
				write!(f, "failed to initialize flag store '{}': {}", id, error)
			}
		}
	}
}

/// Sink for [`Diagnostic`]s. Implementations must not panic.
pub trait Diagnostics: Send + Sync {
	fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
	fn report(&self, diagnostic: Diagnostic) {
		#[cfg(feature = "logging")]
		{
			if diagnostic.is_warning() {
				log::warn!("{}", diagnostic);
			} else {
				log::error!("{}", diagnostic);
			}
		}

		#[cfg(not(feature = "logging"))]
		{
			let _ = diagnostic;
		}
	}
}

/// Keeps every report in memory. Useful for tests and for surfacing
/// persistence problems in a UI.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
	reports: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
	pub fn new() -> Self {
		Self::default()
	}

	/// Removes and returns everything reported so far.
	pub fn take(&self) -> Vec<Diagnostic> {
		std::mem::take(&mut *self.reports.lock().unwrap_or_else(PoisonError::into_inner))
	}

	pub fn len(&self) -> usize {
		self.reports.lock().unwrap_or_else(PoisonError::into_inner).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Diagnostics for MemoryDiagnostics {
	fn report(&self, diagnostic: Diagnostic) {
		self.reports
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(diagnostic);
	}
}

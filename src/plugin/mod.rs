/* src/plugin/mod.rs */

//!
//! Installation of a flags handle into an [`AppContext`].
//!
//! [`FlagsPlugin::install`] picks the implementation once:
//!
//! - with a [`StoreHost`]: a shared, persistent [`FlagStore`](crate::store::FlagStore)
//!   registered as `featureFlags-<storage key>`;
//! - without one: an in-memory controller. If storage was requested a
//!   warning is reported, since nothing will be persisted.

mod context;
mod flags;

pub use context::{AppContext, use_flags};
pub use flags::Flags;

use std::sync::Arc;

use crate::diagnostics::{Diagnostic, Diagnostics, LogDiagnostics};
use crate::holder::{FlagError, FlagSet};
use crate::storage::StorageConfig;
use crate::store::{StoreHost, store_id};

/// Options for [`FlagsPlugin`].
#[derive(Clone, Default)]
pub struct PluginOptions {
	storage: Option<StorageConfig>,
	host: Option<Arc<StoreHost>>,
	diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl PluginOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Persist flags with `config`. Requires a [`host`](Self::host) to take effect.
	///
	/// If the host already holds a store for the same storage key, that
	/// store is shared as is and `config` is not applied to it.
	pub fn storage(mut self, config: StorageConfig) -> Self {
		self.storage = Some(config);
		self
	}

	/// Register the flags as a shared store on `host`.
	pub fn host(mut self, host: Arc<StoreHost>) -> Self {
		self.host = Some(host);
		self
	}

	/// Where installation warnings and errors go. Defaults to the storage
	/// config's sink, then to the `log` facade.
	pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
		self.diagnostics = Some(diagnostics);
		self
	}
}

impl std::fmt::Debug for PluginOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PluginOptions")
			.field("storage", &self.storage)
			.field("host", &self.host.is_some())
			.finish_non_exhaustive()
	}
}

/// An installable flags plugin.
#[derive(Debug, Clone)]
pub struct FlagsPlugin {
	initial: FlagSet,
	options: PluginOptions,
}

/// Shorthand for [`FlagsPlugin::new`].
pub fn create_flags_plugin(initial: FlagSet, options: PluginOptions) -> FlagsPlugin {
	FlagsPlugin::new(initial, options)
}

impl FlagsPlugin {
	pub fn new(initial: FlagSet, options: PluginOptions) -> Self {
		Self { initial, options }
	}

	/// Builds the flags handle and publishes it into `app`.
	///
	/// Returns the published handle. On error nothing is published.
	pub fn install(&self, app: &mut AppContext) -> Result<Flags, FlagError> {
		if app.is_installed() {
			return Err(FlagError::AlreadyInstalled);
		}

		let flags = match &self.options.host {
			Some(host) => {
				let config = self.options.storage.clone().unwrap_or_default();
				let id = store_id(config.key());
				match host.define(id.clone(), self.initial.clone(), config) {
					Ok(store) => Flags::Persistent(store),
					Err(error) => {
						self.diagnostics().report(Diagnostic::StoreFailed {
							id,
							error: error.clone(),
						});
						return Err(error);
					}
				}
			}
			None => {
				if let Some(config) = self.options.storage.as_ref().filter(|c| c.is_enabled()) {
					self.diagnostics().report(Diagnostic::PersistenceUnavailable {
						key: config.key().to_string(),
					});
				}
				Flags::plain(self.initial.clone())
			}
		};

		app.provide(flags.clone())?;
		Ok(flags)
	}

	fn diagnostics(&self) -> Arc<dyn Diagnostics> {
		if let Some(diagnostics) = &self.options.diagnostics {
			return Arc::clone(diagnostics);
		}
		match &self.options.storage {
			Some(config) => Arc::clone(config.diagnostics_sink()),
			None => Arc::new(LogDiagnostics),
		}
	}
}

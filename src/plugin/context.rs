/* src/plugin/context.rs */

use super::{Flags, FlagsPlugin};
use crate::holder::FlagError;

/// One application instance. Holds the flags handle a plugin publishes.
///
/// Pass it explicitly to code that needs flags; there is no global slot.
#[derive(Debug, Default)]
pub struct AppContext {
	flags: Option<Flags>,
}

impl AppContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs `plugin` into this context. See [`FlagsPlugin::install`].
	pub fn install(&mut self, plugin: &FlagsPlugin) -> Result<Flags, FlagError> {
		plugin.install(self)
	}

	/// Publishes `flags`. A context holds at most one handle.
	pub fn provide(&mut self, flags: Flags) -> Result<(), FlagError> {
		if self.flags.is_some() {
			return Err(FlagError::AlreadyInstalled);
		}
		self.flags = Some(flags);
		Ok(())
	}

	pub fn is_installed(&self) -> bool {
		self.flags.is_some()
	}
}

/// Returns the flags handle published into `app`.
///
/// Fails with [`FlagError::NotInstalled`] if no plugin was installed.
pub fn use_flags(app: &AppContext) -> Result<Flags, FlagError> {
	app.flags.clone().ok_or(FlagError::NotInstalled)
}

/* src/lib.rs */

//!
//! A runtime feature-flag store: named boolean flags behind one handle,
//! optionally persisted to a key-value backend and kept in sync across
//! instances sharing that backend.
//!
//! The crate is split into:
//!
//! - **holder**: [`FlagSet`] and the [`FlagController`] that owns it, with
//!   synchronous change listeners.
//! - **storage**: the [`Backend`](storage::Backend) trait, the record
//!   format and the `load` / `save` / `on_change` helpers.
//! - **store**: [`FlagStore`], a controller wired to storage, and the
//!   [`StoreHost`] that registers stores by name.
//! - **plugin**: [`FlagsPlugin`], which installs a [`Flags`] handle into an
//!   [`AppContext`], and [`use_flags`] to read it back.
//! - **diagnostics**: where persistence failures are reported.
//!
//! ## Feature Flags
//!
//! - `logging` (default): report diagnostics through the `log` facade.
//! - `events`: a `tokio` broadcast channel of [`FlagEvent`]s.
//! - `fs`: [`FileBackend`](storage::FileBackend), with change
//!   notifications from `notify`.
//! - `full`: all of the above.
//!
//! ## Basic Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use gates::storage::{MemoryBackend, StorageConfig};
//! use gates::{AppContext, FeatureFlags, FlagSet, FlagsPlugin, PluginOptions, StoreHost, use_flags};
//!
//! let plugin = FlagsPlugin::new(
//!     FlagSet::from([("newDashboard", false), ("betaMode", false)]),
//!     PluginOptions::new()
//!         .storage(StorageConfig::new(MemoryBackend::new()))
//!         .host(Arc::new(StoreHost::new())),
//! );
//!
//! let mut app = AppContext::new();
//! plugin.install(&mut app)?;
//!
//! let flags = use_flags(&app)?;
//! flags.enable("newDashboard")?;
//! assert!(flags.is_enabled("newDashboard"));
//! # Ok::<(), gates::FlagError>(())
//! ```

pub mod diagnostics;
pub mod holder;
pub mod plugin;
pub mod storage;
pub mod store;

pub use diagnostics::{Diagnostic, Diagnostics, LogDiagnostics, MemoryDiagnostics};
pub use holder::{FeatureFlags, FlagChange, FlagController, FlagError, FlagEvent, FlagSet, Origin};
pub use plugin::{AppContext, Flags, FlagsPlugin, PluginOptions, create_flags_plugin, use_flags};
pub use storage::{StorageConfig, StorageError};
pub use store::{FlagStore, StoreHost};

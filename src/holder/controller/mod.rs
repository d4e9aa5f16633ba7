/* src/holder/controller/mod.rs */

mod read;
mod write;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use arc_swap::ArcSwap;

use super::{FlagEvent, FlagSet};

/// Default event channel capacity.
#[cfg(feature = "events")]
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Callback invoked synchronously after every change.
pub type Listener = Arc<dyn Fn(&FlagEvent) + Send + Sync>;

/// Handle returned by [`FlagController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Owns one flag set and notifies listeners on every change.
///
/// Reads are wait-free snapshots; writes use RCU on the flag set so a
/// listener may call back into the controller without deadlocking.
pub struct FlagController {
	pub(crate) inner: ArcSwap<FlagSet>,
	pub(crate) revision: AtomicU64,
	pub(crate) listeners: ArcSwap<Vec<(ListenerId, Listener)>>,
	pub(crate) next_listener: AtomicU64,
	#[cfg(feature = "events")]
	pub(crate) events: tokio::sync::broadcast::Sender<FlagEvent>,
}

impl FlagController {
	/// Creates a controller over `initial`. Its keys become the fixed schema.
	pub fn new(initial: FlagSet) -> Self {
		Self {
			inner: ArcSwap::from_pointee(initial),
			revision: AtomicU64::new(0),
			listeners: ArcSwap::from_pointee(Vec::new()),
			next_listener: AtomicU64::new(0),
			#[cfg(feature = "events")]
			events: tokio::sync::broadcast::channel(DEFAULT_EVENT_CAPACITY).0,
		}
	}

	/// Creates a controller with a custom event channel capacity.
	///
	/// Events may be dropped for receivers that lag behind the write rate.
	#[cfg(feature = "events")]
	pub fn with_event_capacity(initial: FlagSet, capacity: usize) -> Self {
		Self {
			events: tokio::sync::broadcast::channel(capacity).0,
			..Self::new(initial)
		}
	}
}

impl fmt::Debug for FlagController {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlagController")
			.field("flags", &self.flags())
			.field("revision", &self.revision())
			.field("listeners", &self.listeners.load().len())
			.finish_non_exhaustive()
	}
}

/* src/holder/mod.rs */

mod api;
mod controller;
mod error;
mod event;
mod flags;

pub use api::FeatureFlags;
pub use controller::{FlagController, Listener, ListenerId};
#[cfg(feature = "events")]
pub use controller::DEFAULT_EVENT_CAPACITY;
pub use error::FlagError;
pub use event::{FlagChange, FlagEvent, Origin};
pub use flags::{FlagSet, Overrides};

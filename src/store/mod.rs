/* src/store/mod.rs */

//!
//! Named, host-registered flag stores with persistence.
//!
//! - [`FlagStore`] - a controller wired to a storage backend
//! - [`StoreHost`] - registers stores by id and shares live instances

mod host;
mod persistent;

pub use host::{STORE_ID_PREFIX, StoreHost, store_id};
pub use persistent::FlagStore;

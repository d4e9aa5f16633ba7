/* src/storage/backend/mod.rs */

mod memory;
pub use memory::MemoryBackend;

#[cfg(feature = "fs")]
mod file;
#[cfg(feature = "fs")]
pub use file::FileBackend;

/* src/storage/backend/memory.rs */

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::super::{Backend, ChangeHandler, StorageError, StorageEvent, WatchHandle};

struct Watch {
	id: u64,
	context: u64,
	key: String,
	handler: ChangeHandler,
}

#[derive(Default)]
struct Area {
	data: Mutex<HashMap<String, String>>,
	watches: Mutex<Vec<Watch>>,
	next_context: AtomicU64,
	next_watch: AtomicU64,
	quota: Option<usize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An in-memory storage area shared by any number of contexts.
///
/// Each handle belongs to one context (think browser tab). A write made
/// through one context notifies watchers registered by every *other*
/// context, synchronously and before `set` returns. The writer itself is
/// not notified.
#[derive(Clone)]
pub struct MemoryBackend {
	area: Arc<Area>,
	context: u64,
}

impl MemoryBackend {
	/// Creates a new, empty area and returns its first context.
	pub fn new() -> Self {
		Self::from_area(Area::default())
	}

	/// Creates an area that rejects writes once keys and values together
	/// would exceed `bytes`.
	pub fn with_quota(bytes: usize) -> Self {
		Self::from_area(Area {
			quota: Some(bytes),
			..Area::default()
		})
	}

	fn from_area(area: Area) -> Self {
		let area = Arc::new(area);
		let context = area.next_context.fetch_add(1, Ordering::SeqCst);
		Self { area, context }
	}

	/// Returns a new context over the same area.
	pub fn context(&self) -> Self {
		Self {
			area: Arc::clone(&self.area),
			context: self.area.next_context.fetch_add(1, Ordering::SeqCst),
		}
	}

	/// Number of keys stored in the area.
	pub fn len(&self) -> usize {
		lock(&self.area.data).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn dispatch(&self, event: StorageEvent) {
		let handlers: Vec<ChangeHandler> = lock(&self.area.watches)
			.iter()
			.filter(|w| w.context != self.context && w.key == event.key)
			.map(|w| Arc::clone(&w.handler))
			.collect();

		// The lock is released before handlers run; they may write back.
		for handler in handlers {
			handler(&event);
		}
	}
}

impl Default for MemoryBackend {
	fn default() -> Self {
		Self::new()
	}
}

impl Backend for MemoryBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(lock(&self.area.data).get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		let old_value = {
			let mut data = lock(&self.area.data);
			if let Some(quota) = self.area.quota {
				let others: usize = data
					.iter()
					.filter(|(k, _)| k.as_str() != key)
					.map(|(k, v)| k.len() + v.len())
					.sum();
				let needed = others + key.len() + value.len();
				if needed > quota {
					return Err(StorageError::QuotaExceeded {
						key: key.to_string(),
						needed,
						quota,
					});
				}
			}
			data.insert(key.to_string(), value.to_string())
		};

		self.dispatch(StorageEvent {
			key: key.to_string(),
			old_value,
			new_value: Some(value.to_string()),
		});
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		let old_value = lock(&self.area.data).remove(key);
		if old_value.is_some() {
			self.dispatch(StorageEvent {
				key: key.to_string(),
				old_value,
				new_value: None,
			});
		}
		Ok(())
	}

	fn watch(&self, key: &str, handler: ChangeHandler) -> Option<WatchHandle> {
		let id = self.area.next_watch.fetch_add(1, Ordering::SeqCst);
		lock(&self.area.watches).push(Watch {
			id,
			context: self.context,
			key: key.to_string(),
			handler,
		});

		let area: Weak<Area> = Arc::downgrade(&self.area);
		Some(WatchHandle::new(move || {
			if let Some(area) = area.upgrade() {
				lock(&area.watches).retain(|w| w.id != id);
			}
		}))
	}
}

impl std::fmt::Debug for MemoryBackend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryBackend")
			.field("context", &self.context)
			.field("keys", &self.len())
			.field("quota", &self.area.quota)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn recorder() -> (ChangeHandler, Arc<Mutex<Vec<StorageEvent>>>) {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		let handler: ChangeHandler = Arc::new(move |e: &StorageEvent| {
			sink.lock().unwrap().push(e.clone());
		});
		(handler, seen)
	}

	#[test]
	fn writer_is_not_notified() {
		let tab = MemoryBackend::new();
		let (handler, seen) = recorder();
		let _watch = tab.watch("k", handler);

		tab.set("k", "1").unwrap();
		assert!(seen.lock().unwrap().is_empty());
	}

	#[test]
	fn other_contexts_are_notified() {
		let a = MemoryBackend::new();
		let b = a.context();
		let (handler, seen) = recorder();
		let _watch = a.watch("k", handler);

		b.set("k", "1").unwrap();
		b.set("other", "x").unwrap();
		b.remove("k").unwrap();

		let seen = seen.lock().unwrap();
		assert_eq!(seen.len(), 2);
		assert_eq!(seen[0].new_value.as_deref(), Some("1"));
		assert_eq!(seen[1].old_value.as_deref(), Some("1"));
		assert_eq!(seen[1].new_value, None);
	}

	#[test]
	fn dropping_handle_unsubscribes() {
		let a = MemoryBackend::new();
		let b = a.context();
		let (handler, seen) = recorder();
		let watch = a.watch("k", handler);
		drop(watch);

		b.set("k", "1").unwrap();
		assert!(seen.lock().unwrap().is_empty());
	}

	#[test]
	fn quota_rejects_oversized_writes() {
		let backend = MemoryBackend::with_quota(8);
		backend.set("k", "1234").unwrap();
		// Overwriting the same key only counts the new value.
		backend.set("k", "1234567").unwrap();

		let err = backend.set("k2", "12345").unwrap_err();
		assert!(matches!(err, StorageError::QuotaExceeded { quota: 8, .. }));
		assert_eq!(backend.get("k2").unwrap(), None);
	}
}

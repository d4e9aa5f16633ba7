/* src/holder/controller/read.rs */

use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::super::{FlagEvent, FlagSet};
use super::{FlagController, Listener, ListenerId};

impl FlagController {
	/// Current value of `key`. Unknown keys read as `false`.
	pub fn is_enabled(&self, key: &str) -> bool {
		self.get(key).unwrap_or(false)
	}

	/// Current value of `key`, or `None` if it is not a known flag.
	pub fn get(&self, key: &str) -> Option<bool> {
		self.inner.load().get(key)
	}

	/// Read-only snapshot of every flag.
	pub fn flags(&self) -> Arc<FlagSet> {
		self.inner.load_full()
	}

	/// Number of mutations applied so far.
	pub fn revision(&self) -> u64 {
		self.revision.load(Ordering::SeqCst)
	}

	/// Registers a listener. Listeners run synchronously, in registration
	/// order, before the mutating call returns.
	pub fn subscribe<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&FlagEvent) + Send + Sync + 'static,
	{
		self.add_listener(Arc::new(listener))
	}

	/// Registers an already shared listener.
	pub fn add_listener(&self, listener: Listener) -> ListenerId {
		let id = ListenerId(self.next_listener.fetch_add(1, Ordering::SeqCst));
		self.listeners.rcu(|current| {
			let mut next = (**current).clone();
			next.push((id, Arc::clone(&listener)));
			next
		});
		id
	}

	/// Removes a listener. Returns false if it was not registered.
	pub fn unsubscribe(&self, id: ListenerId) -> bool {
		let previous = self.listeners.rcu(|current| {
			let mut next = (**current).clone();
			next.retain(|(existing, _)| *existing != id);
			next
		});
		previous.iter().any(|(existing, _)| *existing == id)
	}

	/// Subscribes to the broadcast channel of change events.
	#[cfg(feature = "events")]
	pub fn events(&self) -> tokio::sync::broadcast::Receiver<FlagEvent> {
		self.events.subscribe()
	}
}

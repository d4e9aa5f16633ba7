/* src/holder/controller/write.rs */

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::super::{FlagChange, FlagError, FlagEvent, FlagSet, Origin, Overrides};
use super::FlagController;

impl FlagController {
	/// Overwrites `key`. Listeners are notified only if the value changed.
	pub fn set(&self, key: &str, value: bool) -> Result<(), FlagError> {
		if !self.inner.load().contains(key) {
			return Err(FlagError::UnknownFlag {
				key: key.to_string(),
			});
		}
		self.merge([(key, value)], Origin::Local);
		Ok(())
	}

	pub fn enable(&self, key: &str) -> Result<(), FlagError> {
		self.set(key, true)
	}

	pub fn disable(&self, key: &str) -> Result<(), FlagError> {
		self.set(key, false)
	}

	/// Merges `overrides` into the current set. Keys outside the schema are
	/// dropped without error.
	pub fn apply(&self, overrides: &Overrides, origin: Origin) -> Option<FlagEvent> {
		self.merge(overrides.iter().map(|(k, v)| (k.as_str(), *v)), origin)
	}

	/// Sets every known key to its value in `target`.
	pub fn reset_to(&self, target: &FlagSet) -> Option<FlagEvent> {
		self.merge(target.iter(), Origin::Reset)
	}

	fn merge<'a, I>(&self, entries: I, origin: Origin) -> Option<FlagEvent>
	where
		I: IntoIterator<Item = (&'a str, bool)>,
	{
		let entries: Vec<(&str, bool)> = entries.into_iter().collect();

		// Capture the outcome inside rcu; the closure may run more than once.
		let outcome: RefCell<(Vec<FlagChange>, Option<Arc<FlagSet>>)> =
			RefCell::new((Vec::new(), None));

		self.inner.rcu(|current| {
			let mut next = (**current).clone();
			let mut changes = Vec::new();
			for (key, value) in &entries {
				if let Some(old) = next.replace(key, *value) {
					if old != *value {
						changes.push(FlagChange {
							key: key.to_string(),
							old,
							new: *value,
						});
					}
				}
			}
			if changes.is_empty() {
				*outcome.borrow_mut() = (changes, None);
				return Arc::clone(current);
			}
			let next = Arc::new(next);
			*outcome.borrow_mut() = (changes, Some(Arc::clone(&next)));
			next
		});

		let (changes, snapshot) = outcome.into_inner();
		let snapshot = snapshot?;
		let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;

		#[cfg(feature = "logging")]
		log::trace!("flags changed ({:?}, revision {}): {:?}", origin, revision, changes);

		let event = FlagEvent {
			origin,
			revision,
			changes,
			snapshot,
		};
		self.notify(&event);
		Some(event)
	}

	/// Listeners run outside of any lock, so they may mutate the controller.
	fn notify(&self, event: &FlagEvent) {
		let listeners = self.listeners.load_full();
		for (_, listener) in listeners.iter() {
			listener(event);
		}

		#[cfg(feature = "events")]
		{
			let _ = self.events.send(event.clone());
		}
	}
}

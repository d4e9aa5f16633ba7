/* src/holder/flags.rs */

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// A partial flag mapping, already restricted to known keys.
pub type Overrides = BTreeMap<String, bool>;

/// The complete mapping of flag names to values.
///
/// The key set is the schema of a controller: it is fixed when the
/// controller is created, and nothing in this crate adds a key afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(BTreeMap<String, bool>);

impl FlagSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a flag while building the initial set.
	pub fn with(mut self, key: impl Into<String>, value: bool) -> Self {
		self.0.insert(key.into(), value);
		self
	}

	/// Returns the value of `key`, or `None` if it is not part of the set.
	pub fn get(&self, key: &str) -> Option<bool> {
		self.0.get(key).copied()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
		self.0.iter().map(|(k, v)| (k.as_str(), *v))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// True if both sets have exactly the same keys, ignoring values.
	pub fn same_schema(&self, other: &FlagSet) -> bool {
		self.len() == other.len() && self.keys().zip(other.keys()).all(|(a, b)| a == b)
	}

	/// Keeps only the entries of `candidate` whose key exists in this set.
	pub fn restrict<I, K>(&self, candidate: I) -> Overrides
	where
		I: IntoIterator<Item = (K, bool)>,
		K: Into<String>,
	{
		candidate
			.into_iter()
			.map(|(k, v)| (k.into(), v))
			.filter(|(k, _)| self.contains(k))
			.collect()
	}

	/// Overwrites an existing key. Returns the previous value, or `None`
	/// (and leaves the set untouched) when the key is unknown.
	pub(crate) fn replace(&mut self, key: &str, value: bool) -> Option<bool> {
		self.0.get_mut(key).map(|slot| std::mem::replace(slot, value))
	}

	pub(crate) fn as_map(&self) -> &BTreeMap<String, bool> {
		&self.0
	}
}

impl<K: Into<String>> FromIterator<(K, bool)> for FlagSet {
	fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}
}

impl<K: Into<String>, const N: usize> From<[(K, bool); N]> for FlagSet {
	fn from(entries: [(K, bool); N]) -> Self {
		entries.into_iter().collect()
	}
}

impl From<BTreeMap<String, bool>> for FlagSet {
	fn from(map: BTreeMap<String, bool>) -> Self {
		Self(map)
	}
}

impl<'a> IntoIterator for &'a FlagSet {
	type Item = (&'a String, &'a bool);
	type IntoIter = btree_map::Iter<'a, String, bool>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn replace_ignores_unknown_keys() {
		let mut set = FlagSet::from([("a", false)]);
		assert_eq!(set.replace("a", true), Some(false));
		assert_eq!(set.replace("ghost", true), None);
		assert_eq!(set.len(), 1);
		assert_eq!(set.get("a"), Some(true));
	}

	#[test]
	fn restrict_drops_foreign_keys() {
		let set = FlagSet::from([("a", false), ("b", true)]);
		let kept = set.restrict([("a", true), ("ghost", true)]);
		assert_eq!(kept, Overrides::from([("a".to_string(), true)]));
	}

	#[test]
	fn schema_comparison_ignores_values() {
		let a = FlagSet::from([("x", true), ("y", false)]);
		let b = FlagSet::from([("x", false), ("y", true)]);
		let c = FlagSet::from([("x", false)]);
		assert!(a.same_schema(&b));
		assert!(!a.same_schema(&c));
	}
}

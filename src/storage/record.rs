/* src/storage/record.rs */

//!
//! The persisted record: `{"flags": {"<name>": <bool>, ...}}`.
//!
//! Every path that touches storage uses this envelope, both the store's
//! save-on-change and the standalone [`load`](super::load) /
//! [`save`](super::save) helpers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::StorageError;
use crate::holder::FlagSet;

#[derive(Serialize)]
struct RecordRef<'a> {
	flags: &'a FlagSet,
}

#[derive(Deserialize)]
struct Record {
	flags: BTreeMap<String, bool>,
}

/// Serializes `flags` into the record envelope.
pub fn encode(flags: &FlagSet) -> Result<String, StorageError> {
	serde_json::to_string(&RecordRef { flags }).map_err(|e| StorageError::Serialize(e.to_string()))
}

/// Parses a record. The returned mapping is not yet restricted to any schema.
pub fn decode(raw: &str) -> Result<BTreeMap<String, bool>, StorageError> {
	serde_json::from_str::<Record>(raw)
		.map(|record| record.flags)
		.map_err(|e| StorageError::Parse(e.to_string()))
}

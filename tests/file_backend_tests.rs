/* tests/file_backend_tests.rs */

#![cfg(feature = "fs")]

use gates::holder::FlagSet;
use gates::storage::{Backend, FileBackend, StorageConfig, record};
use gates::StoreHost;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn dashboard_flags() -> FlagSet {
	FlagSet::from([("newDashboard", false), ("betaMode", false)])
}

#[test]
fn test_file_store_persists_across_hosts() {
	let dir = tempfile::tempdir().unwrap();
	let backend = FileBackend::new(dir.path()).unwrap();

	let first = StoreHost::new()
		.define("flags", dashboard_flags(), StorageConfig::new(backend.clone()))
		.unwrap();
	first.enable("betaMode").unwrap();
	drop(first);

	let raw = std::fs::read_to_string(dir.path().join("feature-flags.json")).unwrap();
	let expected = FlagSet::from([("betaMode", true), ("newDashboard", false)]);
	assert_eq!(raw, record::encode(&expected).unwrap());

	let second = StoreHost::new()
		.define("flags", dashboard_flags(), StorageConfig::new(backend))
		.unwrap();
	assert!(second.is_enabled("betaMode"));
}

#[test]
fn test_file_store_follows_external_writes() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let ours = FileBackend::new(dir.path())?;
	let theirs = FileBackend::new(dir.path())?;

	let store = StoreHost::new()
		.define("flags", dashboard_flags(), StorageConfig::new(ours))
		.unwrap();
	assert!(store.is_synced());

	theirs.set("feature-flags", r#"{"flags": {"newDashboard": true}}"#)?;

	// Wait for the watcher.
	for _ in 0..50 {
		// 5 seconds max
		std::thread::sleep(Duration::from_millis(100));
		if store.is_enabled("newDashboard") {
			break;
		}
	}

	assert!(store.is_enabled("newDashboard"));
	assert!(!store.is_enabled("betaMode"));
	Ok(())
}

#[test]
fn test_concurrent_writers_never_tear_records() {
	let dir = tempfile::tempdir().unwrap();

	// Large records make overlapping writes likely.
	let flags: FlagSet = (0..4000).map(|i| (format!("flag_{i:05}"), i % 2 == 0)).collect();
	let raw = Arc::new(record::encode(&flags).unwrap());

	let writers: Vec<_> = (0..4)
		.map(|_| {
			let backend = FileBackend::new(dir.path()).unwrap();
			let raw = Arc::clone(&raw);
			thread::spawn(move || {
				let mut failures = Vec::new();
				for _ in 0..50 {
					if let Err(e) = backend.set("feature-flags", &raw) {
						failures.push(format!("set: {e}"));
					}
					match backend.get("feature-flags") {
						Ok(Some(read)) if read == *raw => {}
						Ok(other) => {
							let len = other.map_or(0, |r| r.len());
							failures.push(format!("read {len} bytes"));
						}
						Err(e) => failures.push(format!("get: {e}")),
					}
				}
				failures
			})
		})
		.collect();

	let failures: Vec<String> = writers
		.into_iter()
		.flat_map(|w| w.join().unwrap())
		.collect();
	assert!(failures.is_empty(), "{failures:?}");

	// No temporary files are left behind.
	let leftovers: Vec<_> = std::fs::read_dir(dir.path())
		.unwrap()
		.map(|e| e.unwrap().file_name())
		.filter(|name| name != "feature-flags.json")
		.collect();
	assert!(leftovers.is_empty(), "{leftovers:?}");
}

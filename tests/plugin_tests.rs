/* tests/plugin_tests.rs */

use gates::holder::ListenerId;
use gates::storage::{Backend, MemoryBackend, StorageConfig};
use gates::{
	AppContext, Diagnostic, FeatureFlags, FlagError, FlagEvent, FlagSet, Flags, FlagsPlugin,
	MemoryDiagnostics, PluginOptions, StoreHost, create_flags_plugin, use_flags,
};
use std::sync::{Arc, Mutex};

fn dashboard_flags() -> FlagSet {
	FlagSet::from([("newDashboard", false), ("betaMode", false)])
}

#[test]
fn test_use_flags_without_plugin() {
	let app = AppContext::new();
	let err = use_flags(&app).unwrap_err();
	assert_eq!(err, FlagError::NotInstalled);
	assert!(err.to_string().contains("not installed"));
}

#[test]
fn test_plain_install() {
	let mut app = AppContext::new();
	let plugin = create_flags_plugin(dashboard_flags(), PluginOptions::new());
	let installed = plugin.install(&mut app).unwrap();
	assert!(!installed.is_persistent());

	let flags = use_flags(&app).unwrap();
	flags.enable("newDashboard").unwrap();

	// Both handles share one controller.
	assert!(installed.is_enabled("newDashboard"));
	assert_eq!(
		*flags.flags(),
		FlagSet::from([("newDashboard", true), ("betaMode", false)])
	);
}

#[test]
fn test_each_install_gets_its_own_plain_controller() {
	let plugin = FlagsPlugin::new(dashboard_flags(), PluginOptions::new());
	let mut first = AppContext::new();
	let mut second = AppContext::new();
	plugin.install(&mut first).unwrap();
	plugin.install(&mut second).unwrap();

	use_flags(&first).unwrap().enable("betaMode").unwrap();
	assert!(!use_flags(&second).unwrap().is_enabled("betaMode"));
}

#[test]
fn test_install_twice_fails() {
	let plugin = FlagsPlugin::new(dashboard_flags(), PluginOptions::new());
	let mut app = AppContext::new();
	app.install(&plugin).unwrap();
	assert_eq!(app.install(&plugin).unwrap_err(), FlagError::AlreadyInstalled);
}

#[test]
fn test_storage_without_host_warns() {
	let backend = MemoryBackend::new();
	let diagnostics = Arc::new(MemoryDiagnostics::new());
	let plugin = FlagsPlugin::new(
		dashboard_flags(),
		PluginOptions::new()
			.storage(StorageConfig::new(backend.clone()).diagnostics(diagnostics.clone())),
	);

	let mut app = AppContext::new();
	let flags = plugin.install(&mut app).unwrap();
	flags.enable("betaMode").unwrap();

	assert!(flags.is_enabled("betaMode"));
	assert!(backend.is_empty());
	let reports = diagnostics.take();
	assert_eq!(reports.len(), 1);
	assert!(reports[0].is_warning());
	assert!(matches!(reports[0], Diagnostic::PersistenceUnavailable { .. }));
}

#[test]
fn test_persistent_install() {
	let backend = MemoryBackend::new();
	let host = Arc::new(StoreHost::new());
	let plugin = FlagsPlugin::new(
		dashboard_flags(),
		PluginOptions::new()
			.storage(StorageConfig::new(backend.clone()).storage_key("app-flags"))
			.host(host.clone()),
	);

	let mut app = AppContext::new();
	let flags = plugin.install(&mut app).unwrap();
	assert!(flags.is_persistent());
	assert_eq!(host.ids(), vec!["featureFlags-app-flags".to_string()]);

	flags.enable("newDashboard").unwrap();
	assert!(backend.get("app-flags").unwrap().is_some());
}

#[test]
fn test_persistent_installs_share_one_store() {
	let host = Arc::new(StoreHost::new());
	let plugin = FlagsPlugin::new(
		dashboard_flags(),
		PluginOptions::new()
			.storage(StorageConfig::new(MemoryBackend::new()))
			.host(host),
	);

	let mut first = AppContext::new();
	let mut second = AppContext::new();
	let a = plugin.install(&mut first).unwrap();
	let b = plugin.install(&mut second).unwrap();

	a.enable("betaMode").unwrap();
	assert!(b.is_enabled("betaMode"));
}

#[test]
fn test_host_without_storage_is_in_memory() {
	let host = Arc::new(StoreHost::new());
	let plugin = FlagsPlugin::new(dashboard_flags(), PluginOptions::new().host(host.clone()));
	let mut app = AppContext::new();
	let flags = plugin.install(&mut app).unwrap();

	let store = flags.store().unwrap();
	assert!(!store.config().is_enabled());
	assert_eq!(store.id(), "featureFlags-feature-flags");
}

#[test]
fn test_store_failure_aborts_install() {
	let host = Arc::new(StoreHost::new());
	host.close();
	let diagnostics = Arc::new(MemoryDiagnostics::new());
	let plugin = FlagsPlugin::new(
		dashboard_flags(),
		PluginOptions::new().host(host).diagnostics(diagnostics.clone()),
	);

	let mut app = AppContext::new();
	let err = plugin.install(&mut app).unwrap_err();
	assert!(matches!(err, FlagError::HostClosed { .. }));
	assert!(!app.is_installed());
	assert!(matches!(
		diagnostics.take().as_slice(),
		[Diagnostic::StoreFailed { .. }]
	));
}

#[test]
fn test_reset_on_both_variants() {
	let plain = Flags::plain(dashboard_flags());
	plain.enable("betaMode").unwrap();
	plain.reset();
	assert_eq!(*plain.flags(), dashboard_flags());

	let host = Arc::new(StoreHost::new());
	let plugin = FlagsPlugin::new(dashboard_flags(), PluginOptions::new().host(host));
	let persistent = plugin.install(&mut AppContext::new()).unwrap();
	persistent.enable("betaMode").unwrap();
	persistent.reset();
	assert_eq!(*persistent.flags(), dashboard_flags());
}

#[test]
fn test_consumers_depend_on_capability_set() {
	fn turn_on(flags: &dyn FeatureFlags, key: &str) -> Result<(), FlagError> {
		flags.enable(key)
	}

	fn watch(flags: &dyn FeatureFlags) -> (ListenerId, Arc<Mutex<Vec<String>>>) {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		let id = flags.subscribe(Arc::new(move |event: &FlagEvent| {
			for change in &event.changes {
				sink.lock().unwrap().push(change.key.clone());
			}
		}));
		(id, seen)
	}

	let plain = Flags::plain(dashboard_flags());
	let (id, seen) = watch(&plain);
	turn_on(&plain, "betaMode").unwrap();
	assert!(plain.is_enabled("betaMode"));
	assert!(matches!(
		turn_on(&plain, "ghost"),
		Err(FlagError::UnknownFlag { .. })
	));
	assert_eq!(*seen.lock().unwrap(), vec!["betaMode".to_string()]);

	let as_trait: &dyn FeatureFlags = &plain;
	assert!(as_trait.unsubscribe(id));
	assert!(!as_trait.unsubscribe(id));
	turn_on(&plain, "newDashboard").unwrap();
	assert_eq!(seen.lock().unwrap().len(), 1);

	let host = Arc::new(StoreHost::new());
	let plugin = FlagsPlugin::new(dashboard_flags(), PluginOptions::new().host(host.clone()));
	let persistent = plugin.install(&mut AppContext::new()).unwrap();
	let (id, seen) = watch(&persistent);
	turn_on(&persistent, "newDashboard").unwrap();
	assert_eq!(*seen.lock().unwrap(), vec!["newDashboard".to_string()]);

	// The store itself exposes the same capability set.
	let store = host.get("featureFlags-feature-flags").unwrap();
	let store: &dyn FeatureFlags = &*store;
	assert!(store.unsubscribe(id));
}

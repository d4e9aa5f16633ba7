/* demos/basic.rs */

use gates::storage::{MemoryBackend, StorageConfig};
use gates::{AppContext, FeatureFlags, FlagSet, FlagsPlugin, PluginOptions, StoreHost, use_flags};
use std::sync::Arc;

fn install(backend: MemoryBackend) -> Result<AppContext, Box<dyn std::error::Error>> {
	// Each application instance has its own host, like a separate tab.
	let plugin = FlagsPlugin::new(
		FlagSet::from([("newDashboard", false), ("betaMode", false)]),
		PluginOptions::new()
			.storage(StorageConfig::new(backend).storage_key("demo-flags"))
			.host(Arc::new(StoreHost::new())),
	);

	let mut app = AppContext::new();
	plugin.install(&mut app)?;
	Ok(app)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	// 1. One storage area, two contexts sharing it.
	let first_tab = MemoryBackend::new();
	let second_tab = first_tab.context();

	// 2. Install the plugin into two independent applications.
	let first = install(first_tab)?;
	let second = install(second_tab)?;

	let first_flags = use_flags(&first)?;
	let second_flags = use_flags(&second)?;

	second_flags.subscribe(|event| {
		for change in &event.changes {
			println!(
				"second app saw {} -> {} ({:?})",
				change.key, change.new, event.origin
			);
		}
	});

	// 3. Flip flags in the first application.
	first_flags.enable("newDashboard")?;
	first_flags.enable("betaMode")?;
	println!("first app:  {:?}", first_flags.flags());
	println!("second app: {:?}", second_flags.flags());

	// 4. Reset in the second application propagates back.
	second_flags.reset();
	println!("after reset, first app: {:?}", first_flags.flags());

	// 5. A late joiner restores the persisted state.
	let area = MemoryBackend::new();
	let writer = install(area.context())?;
	use_flags(&writer)?.enable("betaMode")?;
	let reader = install(area.context())?;
	println!(
		"late joiner sees betaMode = {}",
		use_flags(&reader)?.is_enabled("betaMode")
	);

	Ok(())
}

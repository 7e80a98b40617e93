// ~/glasspane/glasspane-addon/src/custom/mod.rs

pub mod debounce;
pub mod panel;
pub mod stylesheet;
pub mod transparency;

use std::time::Duration;

/// Fixed identifier: settings namespace and injected-sheet name.
pub const ADDON_ID: &str = "glasspane";

/// Key of the persisted settings record within the addon namespace.
pub const SETTINGS_KEY: &str = "settings";

/// Named mount element whose background is cleared alongside the body.
pub const MOUNT_ID: &str = "app-mount";

/// Quiet period for window-event coalescing.
pub const DEBOUNCE_WAIT: Duration = Duration::from_millis(100);

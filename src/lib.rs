// ~/glasspane/glasspane-addon/src/lib.rs

pub mod cli;
pub mod custom;
pub mod host;
pub mod logging;
pub mod paths;
pub mod settings;

pub use custom::transparency::TransparencyController;
pub use custom::{ADDON_ID, DEBOUNCE_WAIT, MOUNT_ID, SETTINGS_KEY};
pub use settings::{OpacityField, TransparencySettings};

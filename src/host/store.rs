// Settings persistence collaborator: the host hands the overlay a flat
// namespaced record store, nothing more.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fs,
    path::PathBuf,
};

use serde_json::Value;

use super::HostError;

pub trait SettingsStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, HostError>;
    fn set(&self, namespace: &str, key: &str, value: &Value) -> Result<(), HostError>;
}

/// Flat JSON-file store: one `<namespace>.<key>.json` per record under the
/// GlassPane root directory.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn record_path(&self, namespace: &str, key: &str) -> PathBuf {
        self.root.join(format!("{namespace}.{key}.json"))
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, HostError> {
        let path = self.record_path(namespace, key);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&text)?;
        Ok(Some(value))
    }

    fn set(&self, namespace: &str, key: &str, value: &Value) -> Result<(), HostError> {
        fs::create_dir_all(&self.root)?;
        let text = serde_json::to_string_pretty(value)?;
        fs::write(self.record_path(namespace, key), text)?;
        Ok(())
    }
}

/// In-memory store for the demo and tests; read/write failures can be
/// injected to exercise the fail-soft paths.
#[derive(Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<(String, String), Value>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preload(&self, namespace: &str, key: &str, value: Value) {
        self.records
            .borrow_mut()
            .insert((namespace.to_string(), key.to_string()), value);
    }

    /// Inspect the persisted copy of a record.
    pub fn record(&self, namespace: &str, key: &str) -> Option<Value> {
        self.records
            .borrow()
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.set(on);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.set(on);
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, HostError> {
        if self.fail_reads.get() {
            return Err(HostError::Store("injected read failure".into()));
        }
        Ok(self.record(namespace, key))
    }

    fn set(&self, namespace: &str, key: &str, value: &Value) -> Result<(), HostError> {
        if self.fail_writes.get() {
            return Err(HostError::Store("injected write failure".into()));
        }
        self.preload(namespace, key, value.clone());
        Ok(())
    }
}

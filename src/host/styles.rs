// Style-registry collaborator: a named block of style rules the host
// applies globally. Re-injecting under the same identifier replaces the
// previous content.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use super::HostError;

pub trait StyleRegistry {
    fn inject(&self, id: &str, css: &str) -> Result<(), HostError>;
    fn clear(&self, id: &str) -> Result<(), HostError>;
}

/// In-memory registry for the demo and tests.
#[derive(Default)]
pub struct MemoryStyleRegistry {
    sheets: RefCell<BTreeMap<String, String>>,
    injections: Cell<u32>,
    fail: Cell<bool>,
}

impl MemoryStyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, id: &str) -> Option<String> {
        self.sheets.borrow().get(id).cloned()
    }

    /// Total number of successful `inject` calls.
    pub fn injections(&self) -> u32 {
        self.injections.get()
    }

    pub fn fail_all(&self, on: bool) {
        self.fail.set(on);
    }
}

impl StyleRegistry for MemoryStyleRegistry {
    fn inject(&self, id: &str, css: &str) -> Result<(), HostError> {
        if self.fail.get() {
            return Err(HostError::Styles("injected registry failure".into()));
        }
        self.sheets.borrow_mut().insert(id.to_string(), css.to_string());
        self.injections.set(self.injections.get() + 1);
        Ok(())
    }

    fn clear(&self, id: &str) -> Result<(), HostError> {
        if self.fail.get() {
            return Err(HostError::Styles("injected registry failure".into()));
        }
        self.sheets.borrow_mut().remove(id);
        Ok(())
    }
}

// Capabilities the overlay requires from its host environment, plus the
// in-memory simulated host used by the CLI demo and the tests.

pub mod document;
pub mod events;
pub mod scheduler;
pub mod sim;
pub mod store;
pub mod styles;

use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("settings store: {0}")]
    Store(String),
    #[error("style registry: {0}")]
    Styles(String),
    #[error("document: {0}")]
    Document(String),
    #[error("event target: {0}")]
    Events(String),
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Bundle of host capabilities handed to the controller at construction.
#[derive(Clone)]
pub struct HostApi {
    pub settings: Rc<dyn store::SettingsStore>,
    pub styles: Rc<dyn styles::StyleRegistry>,
    pub document: Rc<dyn document::DocumentTree>,
    pub events: Rc<dyn events::WindowEvents>,
    pub scheduler: Rc<dyn scheduler::Scheduler>,
}

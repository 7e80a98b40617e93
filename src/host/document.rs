// Document-tree collaborator: presence-checked lookups into the host's
// externally-owned element tree, plus inline-style mutation on the nodes
// the overlay touches directly.

use super::HostError;

/// Inline-style surface of a single element.
pub trait ElementHandle {
    fn set_opacity(&self, value: f64) -> Result<(), HostError>;
    fn set_background(&self, value: &str) -> Result<(), HostError>;
    /// Return the background to unset, not to any specific color.
    fn clear_background(&self) -> Result<(), HostError>;
}

/// Read access to the host document. Every lookup is presence-checked:
/// window events can arrive before the host has built its tree.
pub trait DocumentTree {
    /// Root element, the whole-document opacity target.
    fn root(&self) -> Option<Box<dyn ElementHandle>>;
    /// Body-equivalent node; `None` until the page exists.
    fn body(&self) -> Option<Box<dyn ElementHandle>>;
    fn element_by_id(&self, id: &str) -> Option<Box<dyn ElementHandle>>;
}

// Simulated host: a deterministic, single-threaded stand-in for the chat
// client's window. Drives the overlay through a virtual millisecond clock
// (`advance`), synchronous event dispatch (`dispatch`) and an explicit
// frame pump (`run_frames`), so the demo and the tests never sleep.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    rc::Rc,
    time::Duration,
};

use super::{
    document::{DocumentTree, ElementHandle},
    events::{WindowEvent, WindowEventHandler, WindowEvents},
    scheduler::{Scheduler, TimerId},
    store::SettingsStore,
    styles::StyleRegistry,
    HostApi, HostError,
};

/* =========================
   DOCUMENT
   ========================= */

/// One element of the simulated tree, tracking the inline styles the
/// overlay is allowed to touch.
#[derive(Default)]
pub struct SimNode {
    opacity: Cell<Option<f64>>,
    background: RefCell<Option<String>>,
    opacity_writes: Cell<u32>,
    fail_writes: Cell<bool>,
}

impl SimNode {
    pub fn opacity(&self) -> Option<f64> {
        self.opacity.get()
    }

    pub fn background(&self) -> Option<String> {
        self.background.borrow().clone()
    }

    /// Number of opacity writes this node has received; the debounce tests
    /// count re-applies with this.
    pub fn opacity_writes(&self) -> u32 {
        self.opacity_writes.get()
    }

    pub fn fail_style_writes(&self, on: bool) {
        self.fail_writes.set(on);
    }

    fn check_writable(&self) -> Result<(), HostError> {
        if self.fail_writes.get() {
            return Err(HostError::Document("injected style write failure".into()));
        }
        Ok(())
    }
}

impl ElementHandle for Rc<SimNode> {
    fn set_opacity(&self, value: f64) -> Result<(), HostError> {
        self.check_writable()?;
        self.opacity.set(Some(value));
        self.opacity_writes.set(self.opacity_writes.get() + 1);
        Ok(())
    }

    fn set_background(&self, value: &str) -> Result<(), HostError> {
        self.check_writable()?;
        self.background.replace(Some(value.to_string()));
        Ok(())
    }

    fn clear_background(&self) -> Result<(), HostError> {
        self.check_writable()?;
        self.background.replace(None);
        Ok(())
    }
}

/// Simulated document tree: a root element, a body that may not exist yet,
/// and named mount nodes.
pub struct SimDocument {
    body_ready: Cell<bool>,
    root: Rc<SimNode>,
    body: Rc<SimNode>,
    named: RefCell<HashMap<String, Rc<SimNode>>>,
}

impl SimDocument {
    pub fn new() -> Self {
        Self {
            body_ready: Cell::new(true),
            root: Rc::new(SimNode::default()),
            body: Rc::new(SimNode::default()),
            named: RefCell::new(HashMap::new()),
        }
    }

    /// Add a named mount node and return a handle for inspection.
    pub fn insert_node(&self, id: &str) -> Rc<SimNode> {
        let node = Rc::new(SimNode::default());
        self.named.borrow_mut().insert(id.to_string(), node.clone());
        node
    }

    /// Model the window before/after the host has built its page.
    pub fn set_body_ready(&self, ready: bool) {
        self.body_ready.set(ready);
    }

    pub fn root_node(&self) -> Rc<SimNode> {
        self.root.clone()
    }

    pub fn body_node(&self) -> Rc<SimNode> {
        self.body.clone()
    }

    pub fn node(&self, id: &str) -> Option<Rc<SimNode>> {
        self.named.borrow().get(id).cloned()
    }
}

impl Default for SimDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree for SimDocument {
    fn root(&self) -> Option<Box<dyn ElementHandle>> {
        self.body_ready
            .get()
            .then(|| Box::new(self.root.clone()) as Box<dyn ElementHandle>)
    }

    fn body(&self) -> Option<Box<dyn ElementHandle>> {
        self.body_ready
            .get()
            .then(|| Box::new(self.body.clone()) as Box<dyn ElementHandle>)
    }

    fn element_by_id(&self, id: &str) -> Option<Box<dyn ElementHandle>> {
        self.named
            .borrow()
            .get(id)
            .map(|node| Box::new(node.clone()) as Box<dyn ElementHandle>)
    }
}

/* =========================
   WINDOW
   ========================= */

struct PendingTimer {
    id: u64,
    due_ms: u64,
    callback: Box<dyn FnOnce()>,
}

/// Simulated window: listener table, timer wheel and frame queue over a
/// virtual clock.
pub struct SimHost {
    now_ms: Cell<u64>,
    next_timer_id: Cell<u64>,
    timers: RefCell<Vec<PendingTimer>>,
    frames: RefCell<VecDeque<Box<dyn FnOnce()>>>,
    listeners: RefCell<Vec<(WindowEvent, Rc<dyn WindowEventHandler>)>>,
}

impl SimHost {
    pub fn new() -> Self {
        Self {
            now_ms: Cell::new(0),
            next_timer_id: Cell::new(1),
            timers: RefCell::new(Vec::new()),
            frames: RefCell::new(VecDeque::new()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Assemble the capability bundle the controller consumes.
    pub fn host_api(
        self: &Rc<Self>,
        document: &Rc<SimDocument>,
        settings: Rc<dyn SettingsStore>,
        styles: Rc<dyn StyleRegistry>,
    ) -> HostApi {
        HostApi {
            settings,
            styles,
            document: document.clone(),
            events: self.clone(),
            scheduler: self.clone(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn queued_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver a window event synchronously to every matching listener.
    pub fn dispatch(&self, event: WindowEvent) {
        let targets: Vec<Rc<dyn WindowEventHandler>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in targets {
            handler.on_window_event(event);
        }
    }

    /// Advance the virtual clock, firing due timers in due order. Timer
    /// callbacks run with the clock set to their own deadline.
    pub fn advance(&self, delta: Duration) {
        let target = self.now_ms.get() + delta.as_millis() as u64;
        loop {
            let next = self
                .timers
                .borrow()
                .iter()
                .filter(|t| t.due_ms <= target)
                .min_by_key(|t| (t.due_ms, t.id))
                .map(|t| t.id);
            let Some(id) = next else {
                break;
            };
            let timer = {
                let mut timers = self.timers.borrow_mut();
                let index = timers.iter().position(|t| t.id == id);
                index.map(|i| timers.swap_remove(i))
            };
            if let Some(timer) = timer {
                self.now_ms.set(timer.due_ms);
                (timer.callback)();
            }
        }
        self.now_ms.set(target);
    }

    /// Drain the frame queue FIFO, as the host would on its next paint.
    pub fn run_frames(&self) {
        loop {
            let next = self.frames.borrow_mut().pop_front();
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowEvents for SimHost {
    fn add_listener(
        &self,
        event: WindowEvent,
        handler: Rc<dyn WindowEventHandler>,
    ) -> Result<(), HostError> {
        self.listeners.borrow_mut().push((event, handler));
        Ok(())
    }

    fn remove_listener(
        &self,
        event: WindowEvent,
        handler: &Rc<dyn WindowEventHandler>,
    ) -> Result<(), HostError> {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(e, h)| !(*e == event && Rc::ptr_eq(h, handler)));
        if listeners.len() == before {
            return Err(HostError::Events(format!(
                "no listener registered for {}",
                event.name()
            )));
        }
        Ok(())
    }
}

impl Scheduler for SimHost {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = self.next_timer_id.get();
        self.next_timer_id.set(id + 1);
        self.timers.borrow_mut().push(PendingTimer {
            id,
            due_ms: self.now_ms.get() + delay.as_millis() as u64,
            callback,
        });
        TimerId(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        let mut timers = self.timers.borrow_mut();
        if let Some(index) = timers.iter().position(|t| t.id == id.0) {
            timers.swap_remove(index);
        }
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        self.frames.borrow_mut().push_back(callback);
    }
}

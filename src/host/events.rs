// Window-event collaborator: subscribe/unsubscribe for the four window
// lifecycle events the overlay reacts to.

use std::rc::Rc;

use super::HostError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WindowEvent {
    Focus,
    Blur,
    Resize,
    VisibilityChange,
}

impl WindowEvent {
    pub const ALL: [WindowEvent; 4] = [
        WindowEvent::Focus,
        WindowEvent::Blur,
        WindowEvent::Resize,
        WindowEvent::VisibilityChange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WindowEvent::Focus => "focus",
            WindowEvent::Blur => "blur",
            WindowEvent::Resize => "resize",
            WindowEvent::VisibilityChange => "visibilitychange",
        }
    }
}

pub trait WindowEventHandler {
    fn on_window_event(&self, event: WindowEvent);
}

/// Event registration surface. Removal matches by handler allocation
/// identity, so unsubscribing with the same reference used to subscribe
/// is exact.
pub trait WindowEvents {
    fn add_listener(
        &self,
        event: WindowEvent,
        handler: Rc<dyn WindowEventHandler>,
    ) -> Result<(), HostError>;

    fn remove_listener(
        &self,
        event: WindowEvent,
        handler: &Rc<dyn WindowEventHandler>,
    ) -> Result<(), HostError>;
}

// Transparency controller: owns the settings record and the debounce
// state, and drives every host-facing effect. All failures are caught at
// the operation that produced them, logged and absorbed; `start`, `stop`
// and the panel builder never raise.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::host::{
    events::{WindowEvent, WindowEventHandler},
    HostApi,
};
use crate::settings::{OpacityField, TransparencySettings};
use crate::{error, info};

use super::{
    debounce::Debounce, panel::SettingsPanel, stylesheet, ADDON_ID, DEBOUNCE_WAIT, MOUNT_ID,
    SETTINGS_KEY,
};

pub struct TransparencyController {
    host: HostApi,
    settings: RefCell<TransparencySettings>,
    debounce: Debounce,
    weak_self: Weak<TransparencyController>,
}

impl TransparencyController {
    pub fn new(host: HostApi) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            debounce: Debounce::new(host.scheduler.clone(), DEBOUNCE_WAIT),
            settings: RefCell::new(TransparencySettings::default()),
            weak_self: weak.clone(),
            host,
        })
    }

    /// Snapshot of the in-memory record.
    pub fn settings(&self) -> TransparencySettings {
        self.settings.borrow().clone()
    }

    /// Bring the overlay up: load persisted settings, inject the sheet,
    /// register window listeners, apply the direct overrides. Each step
    /// guards its own body, so one failing step does not stop the rest.
    pub fn start(&self) {
        self.load_settings();
        self.inject_styles();
        self.add_window_listeners();
        self.setup_transparency();
        info!("[Transparency] Addon started");
    }

    /// Reverse every registration `start` made.
    pub fn stop(&self) {
        self.remove_styles();
        self.remove_window_listeners();
        self.reset_transparency();
        info!("[Transparency] Addon stopped");
    }

    /// Build the detached settings surface. No side effects until the host
    /// delivers slider input.
    pub fn settings_panel(self: &Rc<Self>) -> SettingsPanel {
        SettingsPanel::build(self)
    }

    pub fn load_settings(&self) {
        match self.host.settings.get(ADDON_ID, SETTINGS_KEY) {
            Ok(Some(saved)) => {
                self.settings
                    .replace(TransparencySettings::merged_from(&saved));
                info!("[Transparency] Loaded persisted settings");
            }
            Ok(None) => {
                self.settings.replace(TransparencySettings::default());
                info!("[Transparency] No persisted settings, using defaults");
            }
            Err(e) => {
                error!("[Transparency] Failed to load settings: {e}");
                self.settings.replace(TransparencySettings::default());
            }
        }
    }

    /// Persist the full record. The in-memory copy is not rolled back on
    /// failure; it stays ahead of the store until the next save succeeds.
    pub fn save_settings(&self) {
        let record = match serde_json::to_value(&*self.settings.borrow()) {
            Ok(value) => value,
            Err(e) => {
                error!("[Transparency] Failed to serialize settings: {e}");
                return;
            }
        };
        if let Err(e) = self.host.settings.set(ADDON_ID, SETTINGS_KEY, &record) {
            error!("[Transparency] Failed to save settings: {e}");
        }
    }

    pub fn inject_styles(&self) {
        let css = stylesheet::render(&self.settings.borrow());
        match self.host.styles.inject(ADDON_ID, &css) {
            Ok(()) => info!("[Transparency] Styles injected"),
            Err(e) => error!("[Transparency] Failed to inject styles: {e}"),
        }
    }

    fn remove_styles(&self) {
        match self.host.styles.clear(ADDON_ID) {
            Ok(()) => info!("[Transparency] Styles removed"),
            Err(e) => error!("[Transparency] Failed to remove styles: {e}"),
        }
    }

    fn handler_ref(&self) -> Option<Rc<dyn WindowEventHandler>> {
        // The controller is its own handler; upgrading always yields the
        // same allocation, so add/remove see an identical reference.
        self.weak_self
            .upgrade()
            .map(|rc| rc as Rc<dyn WindowEventHandler>)
    }

    fn add_window_listeners(&self) {
        let Some(handler) = self.handler_ref() else {
            return;
        };
        for event in WindowEvent::ALL {
            if let Err(e) = self.host.events.add_listener(event, handler.clone()) {
                error!("[Transparency] Failed to add {} listener: {e}", event.name());
            }
        }
        info!("[Transparency] Window listeners added");
    }

    fn remove_window_listeners(&self) {
        let Some(handler) = self.handler_ref() else {
            return;
        };
        for event in WindowEvent::ALL {
            if let Err(e) = self.host.events.remove_listener(event, &handler) {
                error!(
                    "[Transparency] Failed to remove {} listener: {e}",
                    event.name()
                );
            }
        }
        info!("[Transparency] Window listeners removed");
    }

    /// Apply the direct overrides: whole-document opacity on the root,
    /// transparent backgrounds on the body and the named mount element.
    /// A missing body means the host has not built its tree yet; that is
    /// a no-op, not an error. Every target is guarded independently.
    pub fn setup_transparency(&self) {
        let Some(body) = self.host.document.body() else {
            return;
        };

        let window_opacity = self.settings.borrow().window_opacity;
        if let Some(root) = self.host.document.root() {
            if let Err(e) = root.set_opacity(window_opacity) {
                error!("[Transparency] Failed to set window opacity: {e}");
            }
        }
        if let Err(e) = body.set_background("transparent") {
            error!("[Transparency] Failed to clear body background: {e}");
        }
        if let Some(mount) = self.host.document.element_by_id(MOUNT_ID) {
            if let Err(e) = mount.set_background("transparent") {
                error!("[Transparency] Failed to clear mount background: {e}");
            }
        }
    }

    /// Mirror of `setup_transparency`: fully opaque, backgrounds unset.
    pub fn reset_transparency(&self) {
        let Some(body) = self.host.document.body() else {
            return;
        };

        if let Some(root) = self.host.document.root() {
            if let Err(e) = root.set_opacity(1.0) {
                error!("[Transparency] Failed to reset window opacity: {e}");
            }
        }
        if let Err(e) = body.clear_background() {
            error!("[Transparency] Failed to reset body background: {e}");
        }
        if let Some(mount) = self.host.document.element_by_id(MOUNT_ID) {
            if let Err(e) = mount.clear_background() {
                error!("[Transparency] Failed to reset mount background: {e}");
            }
        }
    }

    /// Field update shared by the settings panel and the CLI: mutate,
    /// persist, then re-apply. `windowOpacity` only needs the direct
    /// overrides; the other fields are baked into the sheet text and force
    /// a full regeneration.
    pub fn apply_field(&self, field: OpacityField, value: f64) {
        self.settings.borrow_mut().set(field, value);
        self.save_settings();
        if field == OpacityField::Window {
            self.setup_transparency();
        } else {
            self.inject_styles();
        }
    }
}

impl WindowEventHandler for TransparencyController {
    fn on_window_event(&self, _event: WindowEvent) {
        let Some(ctrl) = self.weak_self.upgrade() else {
            return;
        };
        self.debounce.call(Box::new(move || {
            ctrl.debounce.mark_fired();
            let frame_ctrl = Rc::clone(&ctrl);
            ctrl.host
                .scheduler
                .request_frame(Box::new(move || frame_ctrl.setup_transparency()));
        }));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::host::sim::{SimDocument, SimHost};
    use crate::host::store::MemoryStore;
    use crate::host::styles::MemoryStyleRegistry;

    struct Fixture {
        sim: Rc<SimHost>,
        document: Rc<SimDocument>,
        store: Rc<MemoryStore>,
        styles: Rc<MemoryStyleRegistry>,
        controller: Rc<TransparencyController>,
    }

    fn fixture() -> Fixture {
        let sim = Rc::new(SimHost::new());
        let document = Rc::new(SimDocument::new());
        document.insert_node(MOUNT_ID);
        let store = Rc::new(MemoryStore::new());
        let styles = Rc::new(MemoryStyleRegistry::new());
        let api = sim.host_api(&document, store.clone(), styles.clone());
        let controller = TransparencyController::new(api);
        Fixture {
            sim,
            document,
            store,
            styles,
            controller,
        }
    }

    #[test]
    fn start_applies_overrides_and_injects_the_sheet() {
        let fx = fixture();
        fx.controller.start();

        assert_eq!(fx.document.root_node().opacity(), Some(0.95));
        assert_eq!(
            fx.document.body_node().background().as_deref(),
            Some("transparent")
        );
        assert_eq!(
            fx.document.node(MOUNT_ID).unwrap().background().as_deref(),
            Some("transparent")
        );
        assert!(fx.styles.sheet(ADDON_ID).is_some());
        assert_eq!(fx.sim.listener_count(), WindowEvent::ALL.len());
    }

    #[test]
    fn load_merges_partial_persisted_records() {
        let fx = fixture();
        fx.store
            .preload(ADDON_ID, SETTINGS_KEY, json!({ "serversOpacity": 0.4 }));
        fx.controller.start();

        let settings = fx.controller.settings();
        assert_eq!(settings.servers_opacity, 0.4);
        assert_eq!(settings.window_opacity, 0.95);
        assert_eq!(settings.chat_opacity, 0.9);
    }

    #[test]
    fn failed_store_read_falls_back_to_pure_defaults() {
        let fx = fixture();
        fx.store
            .preload(ADDON_ID, SETTINGS_KEY, json!({ "serversOpacity": 0.4 }));
        fx.store.fail_reads(true);
        fx.controller.start();

        assert_eq!(fx.controller.settings(), TransparencySettings::default());
    }

    #[test]
    fn event_burst_coalesces_into_one_reapply_after_quiet_period() {
        let fx = fixture();
        fx.controller.start();
        let writes_after_start = fx.document.root_node().opacity_writes();

        fx.sim.dispatch(WindowEvent::Focus);
        fx.sim.advance(Duration::from_millis(50));
        fx.sim.dispatch(WindowEvent::Blur);
        fx.sim.advance(Duration::from_millis(40));
        fx.sim.dispatch(WindowEvent::Resize);

        // Quiet period is timed from the last event.
        fx.sim.advance(Duration::from_millis(99));
        fx.sim.run_frames();
        assert_eq!(fx.document.root_node().opacity_writes(), writes_after_start);

        fx.sim.advance(Duration::from_millis(1));
        fx.sim.run_frames();
        assert_eq!(
            fx.document.root_node().opacity_writes(),
            writes_after_start + 1
        );

        // And nothing further once the burst is over.
        fx.sim.advance(Duration::from_millis(500));
        fx.sim.run_frames();
        assert_eq!(
            fx.document.root_node().opacity_writes(),
            writes_after_start + 1
        );
    }

    #[test]
    fn single_event_still_triggers_exactly_one_reapply() {
        let fx = fixture();
        fx.controller.start();
        let writes_after_start = fx.document.root_node().opacity_writes();

        fx.sim.dispatch(WindowEvent::VisibilityChange);
        fx.sim.advance(Duration::from_millis(100));
        fx.sim.run_frames();
        assert_eq!(
            fx.document.root_node().opacity_writes(),
            writes_after_start + 1
        );
    }

    #[test]
    fn reapply_waits_for_the_frame_pump() {
        let fx = fixture();
        fx.controller.start();
        let writes_after_start = fx.document.root_node().opacity_writes();

        fx.sim.dispatch(WindowEvent::Resize);
        fx.sim.advance(Duration::from_millis(100));

        // Timer fired, but the visual update only happens on the next
        // rendering opportunity.
        assert_eq!(fx.sim.queued_frames(), 1);
        assert_eq!(fx.document.root_node().opacity_writes(), writes_after_start);

        fx.sim.run_frames();
        assert_eq!(
            fx.document.root_node().opacity_writes(),
            writes_after_start + 1
        );
    }

    #[test]
    fn stop_undoes_every_registration() {
        let fx = fixture();
        fx.controller.start();
        fx.controller.stop();

        assert_eq!(fx.document.root_node().opacity(), Some(1.0));
        assert!(fx.document.body_node().background().is_none());
        assert!(fx.document.node(MOUNT_ID).unwrap().background().is_none());
        assert!(fx.styles.sheet(ADDON_ID).is_none());
        assert_eq!(fx.sim.listener_count(), 0);

        // Subsequent window events no longer reach the controller.
        let writes = fx.document.root_node().opacity_writes();
        fx.sim.dispatch(WindowEvent::Focus);
        fx.sim.advance(Duration::from_millis(200));
        fx.sim.run_frames();
        assert_eq!(fx.document.root_node().opacity_writes(), writes);
    }

    #[test]
    fn default_sheet_contains_the_expected_layer_colors() {
        let fx = fixture();
        fx.controller.start();
        let css = fx.styles.sheet(ADDON_ID).unwrap();
        assert!(css.contains("rgba(30, 31, 34, 0.75)"));
        assert!(css.contains("rgba(43, 45, 49, 0.8)"));
        assert!(css.contains("rgba(54, 57, 63, 0.9)"));
        assert!(css.contains("rgba(47, 49, 54, 0.8)"));
    }

    #[test]
    fn chat_slider_updates_record_store_and_sheet_but_not_window_opacity() {
        let fx = fixture();
        fx.controller.start();
        let root_writes = fx.document.root_node().opacity_writes();

        let panel = fx.controller.settings_panel();
        panel.slider(OpacityField::Chat).unwrap().input("0.5");

        assert_eq!(fx.controller.settings().chat_opacity, 0.5);
        let persisted = fx.store.record(ADDON_ID, SETTINGS_KEY).unwrap();
        assert_eq!(persisted.get("chatOpacity").and_then(|v| v.as_f64()), Some(0.5));
        let css = fx.styles.sheet(ADDON_ID).unwrap();
        assert!(css.contains("rgba(54, 57, 63, 0.5)"));

        // The changed field was not windowOpacity: no direct re-apply.
        assert_eq!(fx.document.root_node().opacity(), Some(0.95));
        assert_eq!(fx.document.root_node().opacity_writes(), root_writes);
    }

    #[test]
    fn window_slider_takes_the_direct_override_path() {
        let fx = fixture();
        fx.controller.start();
        let injections = fx.styles.injections();

        let panel = fx.controller.settings_panel();
        panel.slider(OpacityField::Window).unwrap().input("0.6");

        assert_eq!(fx.document.root_node().opacity(), Some(0.6));
        // No sheet regeneration for the window-level field.
        assert_eq!(fx.styles.injections(), injections);
        let persisted = fx.store.record(ADDON_ID, SETTINGS_KEY).unwrap();
        assert_eq!(
            persisted.get("windowOpacity").and_then(|v| v.as_f64()),
            Some(0.6)
        );
    }

    #[test]
    fn events_before_the_page_exists_are_ignored() {
        let fx = fixture();
        fx.document.set_body_ready(false);
        fx.controller.start();

        assert!(fx.document.root_node().opacity().is_none());

        fx.sim.dispatch(WindowEvent::Resize);
        fx.sim.advance(Duration::from_millis(100));
        fx.sim.run_frames();
        assert!(fx.document.root_node().opacity().is_none());

        // Once the page is up, the next event applies the overrides.
        fx.document.set_body_ready(true);
        fx.sim.dispatch(WindowEvent::Focus);
        fx.sim.advance(Duration::from_millis(100));
        fx.sim.run_frames();
        assert_eq!(fx.document.root_node().opacity(), Some(0.95));
    }

    #[test]
    fn style_registry_failure_leaves_the_rest_of_start_intact() {
        let fx = fixture();
        fx.styles.fail_all(true);
        fx.controller.start();

        // Partial success by design: listeners registered, overrides set.
        assert_eq!(fx.sim.listener_count(), WindowEvent::ALL.len());
        assert_eq!(fx.document.root_node().opacity(), Some(0.95));
        assert!(fx.styles.sheet(ADDON_ID).is_none());
    }

    #[test]
    fn failed_save_keeps_the_in_memory_record_ahead_of_the_store() {
        let fx = fixture();
        fx.controller.start();
        fx.store.fail_writes(true);

        let panel = fx.controller.settings_panel();
        panel.slider(OpacityField::Members).unwrap().input("0.3");

        assert_eq!(fx.controller.settings().members_opacity, 0.3);
        assert!(fx.store.record(ADDON_ID, SETTINGS_KEY).is_none());
    }

    #[test]
    fn a_broken_mount_node_does_not_block_the_document_level_change() {
        let fx = fixture();
        fx.document.node(MOUNT_ID).unwrap().fail_style_writes(true);
        fx.controller.start();

        assert_eq!(fx.document.root_node().opacity(), Some(0.95));
        assert_eq!(
            fx.document.body_node().background().as_deref(),
            Some("transparent")
        );
        assert!(fx.document.node(MOUNT_ID).unwrap().background().is_none());
    }
}

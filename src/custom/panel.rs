// Settings panel: a detached control tree the host renders. One labeled
// slider per opacity field, each bound back to the controller.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use crate::error;
use crate::settings::{OpacityField, MAX_OPACITY, MIN_OPACITY};

use super::transparency::TransparencyController;

pub const SLIDER_STEP: f64 = 0.05;

pub struct SettingsPanel {
    pub title: String,
    pub sliders: Vec<SliderControl>,
}

impl SettingsPanel {
    pub(super) fn build(controller: &Rc<TransparencyController>) -> Self {
        let current = controller.settings();
        let sliders = OpacityField::ALL
            .iter()
            .map(|&field| {
                let value = current.get(field);
                SliderControl {
                    field,
                    min: MIN_OPACITY,
                    max: MAX_OPACITY,
                    step: SLIDER_STEP,
                    value: Cell::new(value),
                    label: RefCell::new(format!("{}: {value:.2}", field.label())),
                    controller: Rc::downgrade(controller),
                }
            })
            .collect();
        Self {
            title: "Transparency Settings".to_string(),
            sliders,
        }
    }

    pub fn slider(&self, field: OpacityField) -> Option<&SliderControl> {
        self.sliders.iter().find(|s| s.field == field)
    }
}

pub struct SliderControl {
    field: OpacityField,
    min: f64,
    max: f64,
    step: f64,
    value: Cell<f64>,
    label: RefCell<String>,
    controller: Weak<TransparencyController>,
}

impl SliderControl {
    pub fn field(&self) -> OpacityField {
        self.field
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    /// Visible label text, value to two decimals.
    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    pub fn range(&self) -> (f64, f64, f64) {
        (self.min, self.max, self.step)
    }

    /// Input event from the host control, raw string value as delivered.
    /// Malformed input is logged and dropped; the record stays untouched.
    pub fn input(&self, raw: &str) {
        let parsed: f64 = match raw.trim().parse() {
            Ok(v) => v,
            Err(e) => {
                error!("[Panel] Ignoring malformed slider value '{raw}': {e}");
                return;
            }
        };
        if !parsed.is_finite() {
            error!("[Panel] Ignoring non-finite slider value '{raw}'");
            return;
        }

        let new_value = parsed.clamp(self.min, self.max);
        self.value.set(new_value);
        self.label
            .replace(format!("{}: {new_value:.2}", self.field.label()));
        if let Some(controller) = self.controller.upgrade() {
            controller.apply_field(self.field, new_value);
        }
    }
}

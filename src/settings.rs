// ~/glasspane/glasspane-addon/src/settings.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::warn;

/// Lower bound the panel sliders (and the load boundary) enforce.
pub const MIN_OPACITY: f64 = 0.1;
pub const MAX_OPACITY: f64 = 1.0;

/// One user-adjustable opacity parameter of the overlay.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpacityField {
    Window,
    Servers,
    Channels,
    Chat,
    Members,
}

impl OpacityField {
    pub const ALL: [OpacityField; 5] = [
        OpacityField::Window,
        OpacityField::Servers,
        OpacityField::Channels,
        OpacityField::Chat,
        OpacityField::Members,
    ];

    /// Key under which the field is persisted.
    pub fn key(self) -> &'static str {
        match self {
            OpacityField::Window => "windowOpacity",
            OpacityField::Servers => "serversOpacity",
            OpacityField::Channels => "channelsOpacity",
            OpacityField::Chat => "chatOpacity",
            OpacityField::Members => "membersOpacity",
        }
    }

    /// Human-facing slider label.
    pub fn label(self) -> &'static str {
        match self {
            OpacityField::Window => "Window Opacity",
            OpacityField::Servers => "Servers Opacity",
            OpacityField::Channels => "Channels Opacity",
            OpacityField::Chat => "Chat Opacity",
            OpacityField::Members => "Members Opacity",
        }
    }
}

/// The overlay's only persisted state: five opacity values in [0.1, 1.0].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransparencySettings {
    pub window_opacity: f64,
    pub servers_opacity: f64,
    pub channels_opacity: f64,
    pub chat_opacity: f64,
    pub members_opacity: f64,
}

impl Default for TransparencySettings {
    fn default() -> Self {
        Self {
            window_opacity: 0.95,
            servers_opacity: 0.75,
            channels_opacity: 0.8,
            chat_opacity: 0.9,
            members_opacity: 0.8,
        }
    }
}

impl TransparencySettings {
    pub fn get(&self, field: OpacityField) -> f64 {
        match field {
            OpacityField::Window => self.window_opacity,
            OpacityField::Servers => self.servers_opacity,
            OpacityField::Channels => self.channels_opacity,
            OpacityField::Chat => self.chat_opacity,
            OpacityField::Members => self.members_opacity,
        }
    }

    pub fn set(&mut self, field: OpacityField, value: f64) {
        match field {
            OpacityField::Window => self.window_opacity = value,
            OpacityField::Servers => self.servers_opacity = value,
            OpacityField::Channels => self.channels_opacity = value,
            OpacityField::Chat => self.chat_opacity = value,
            OpacityField::Members => self.members_opacity = value,
        }
    }

    /// Merge a persisted record over the defaults, per field.
    ///
    /// Persisted values win where present and numeric; anything missing or
    /// malformed keeps the default. Out-of-range numbers are clamped into
    /// [`MIN_OPACITY`, `MAX_OPACITY`] rather than rejected, so an edited or
    /// corrupted store can never produce an out-of-range record.
    pub fn merged_from(value: &Value) -> Self {
        let mut out = Self::default();
        for field in OpacityField::ALL {
            let Some(raw) = value.get(field.key()) else {
                continue;
            };
            match raw.as_f64() {
                Some(n) => {
                    let clamped = n.clamp(MIN_OPACITY, MAX_OPACITY);
                    if clamped != n {
                        warn!(
                            "[Settings] Clamping persisted {} from {n} to {clamped}",
                            field.key()
                        );
                    }
                    out.set(field, clamped);
                }
                None => {
                    warn!(
                        "[Settings] Ignoring non-numeric persisted value for {}: {raw}",
                        field.key()
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_shipped_values() {
        let s = TransparencySettings::default();
        assert_eq!(s.window_opacity, 0.95);
        assert_eq!(s.servers_opacity, 0.75);
        assert_eq!(s.channels_opacity, 0.8);
        assert_eq!(s.chat_opacity, 0.9);
        assert_eq!(s.members_opacity, 0.8);
    }

    #[test]
    fn merge_keeps_defaults_for_missing_fields() {
        let merged = TransparencySettings::merged_from(&json!({ "chatOpacity": 0.5 }));
        assert_eq!(merged.chat_opacity, 0.5);
        assert_eq!(merged.window_opacity, 0.95);
        assert_eq!(merged.servers_opacity, 0.75);
        assert_eq!(merged.channels_opacity, 0.8);
        assert_eq!(merged.members_opacity, 0.8);
    }

    #[test]
    fn merge_takes_every_present_field() {
        let merged = TransparencySettings::merged_from(&json!({
            "windowOpacity": 0.4,
            "serversOpacity": 0.3,
            "channelsOpacity": 0.2,
            "chatOpacity": 0.6,
            "membersOpacity": 0.7,
        }));
        assert_eq!(merged.window_opacity, 0.4);
        assert_eq!(merged.servers_opacity, 0.3);
        assert_eq!(merged.channels_opacity, 0.2);
        assert_eq!(merged.chat_opacity, 0.6);
        assert_eq!(merged.members_opacity, 0.7);
    }

    #[test]
    fn merge_clamps_out_of_range_values() {
        let merged = TransparencySettings::merged_from(&json!({
            "windowOpacity": 1.7,
            "chatOpacity": 0.01,
        }));
        assert_eq!(merged.window_opacity, MAX_OPACITY);
        assert_eq!(merged.chat_opacity, MIN_OPACITY);
    }

    #[test]
    fn merge_ignores_non_numeric_values() {
        let merged = TransparencySettings::merged_from(&json!({
            "serversOpacity": "very",
            "membersOpacity": null,
        }));
        assert_eq!(merged.servers_opacity, 0.75);
        assert_eq!(merged.members_opacity, 0.8);
    }

    #[test]
    fn merge_ignores_unknown_fields() {
        let merged = TransparencySettings::merged_from(&json!({
            "glowOpacity": 0.2,
            "chatOpacity": 0.5,
        }));
        assert_eq!(merged, TransparencySettings::merged_from(&json!({ "chatOpacity": 0.5 })));
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(TransparencySettings::default()).unwrap();
        for field in OpacityField::ALL {
            assert!(value.get(field.key()).is_some(), "missing {}", field.key());
        }
    }
}

// Style-sheet generation: a pure function of the settings record. Four of
// the layer rules interpolate an opacity straight into an rgba alpha
// channel; everything else is static selector data for the host client.

use std::fmt::Write;

use crate::settings::TransparencySettings;

static BASE_RULES: &str = "\
/* Base app transparency */
#app-mount, .app-shell, body {
    background: transparent !important;
}

/* Keep text solid */
.message-markup, .member-name, .channel-title,
.author-username, .channel-name,
.header-text, .name-decorators,
.activity-text, .embed-content, .role-color {
    opacity: 1 !important;
    color: rgb(220, 221, 222) !important;
    text-shadow: 0 1px 2px rgba(0, 0, 0, 0.5) !important;
}

/* Keep settings and modals opaque */
.layer-panel[aria-label=\"USER_SETTINGS\"],
.layer-panel[aria-label=\"CHANNEL_SETTINGS\"],
.layer-panel[aria-label=\"GUILD_SETTINGS\"],
.modal-root, .menu-root, .popout-root,
.search-results, .emoji-picker,
.messages-popout, .quick-switcher,
.upload-modal, .tooltip-root {
    background-color: var(--background-primary) !important;
    opacity: 1 !important;
}

/* Remove backgrounds */
.base-layer, .content-column, .page-wrapper,
.chat-wrapper, .list-scroller,
.private-channels, .bottom-panels {
    background: transparent !important;
}
";

static THEME_RULES: &str = "\

/* Theme overrides */
.theme-dark {
    --background-primary: #36393f !important;
    --background-secondary: #2f3136 !important;
    --background-secondary-alt: #292b2f !important;
    --background-tertiary: #202225 !important;
    --background-accent: #4f545c !important;
    --background-floating: #18191c !important;
}
";

static PANEL_RULES: &str = "\

/* Settings Panel Styling */
.glasspane-settings {
    padding: 16px;
    color: var(--header-primary);
}

.glasspane-settings .setting-item {
    margin-bottom: 20px;
    padding: 16px;
    background: var(--background-secondary);
    border-radius: 8px;
    transition: background 0.2s ease;
}

.glasspane-settings .setting-item:hover {
    background: var(--background-secondary-alt);
}

.glasspane-settings input[type=\"range\"] {
    width: 100%;
    height: 8px;
    border-radius: 4px;
    background: var(--background-tertiary);
    outline: none;
    margin-top: 8px;
}

.glasspane-title {
    font-size: 20px;
    font-weight: 600;
    color: var(--header-primary);
    margin-bottom: 16px;
    padding-bottom: 8px;
    border-bottom: 2px solid var(--background-accent);
}
";

/// Render the full sheet for a settings record. Deterministic: the same
/// record always yields byte-identical text. Values are interpolated as-is;
/// range enforcement lives at the input boundaries.
pub fn render(settings: &TransparencySettings) -> String {
    let mut css = String::with_capacity(4096);
    css.push_str(BASE_RULES);

    let _ = write!(
        css,
        "
/* Servers sidebar */
.server-rail, .guild-scroller {{
    background: rgba(30, 31, 34, {}) !important;
    z-index: 10 !important;
}}
",
        settings.servers_opacity
    );

    let _ = write!(
        css,
        "
/* Channels sidebar */
.channel-sidebar, .sidebar-container, .bottom-panels {{
    background: rgba(43, 45, 49, {}) !important;
    z-index: 20 !important;
}}
",
        settings.channels_opacity
    );

    let _ = write!(
        css,
        "
/* Chat area */
.chat-content, .message-list, .message-body {{
    background: rgba(54, 57, 63, {}) !important;
    z-index: 15 !important;
}}
",
        settings.chat_opacity
    );

    let _ = write!(
        css,
        "
/* Members list */
.member-list {{
    background: rgba(47, 49, 54, {}) !important;
    z-index: 25 !important;
}}
",
        settings.members_opacity
    );

    css.push_str(THEME_RULES);
    css.push_str(PANEL_RULES);
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_is_deterministic() {
        let settings = TransparencySettings::default();
        assert_eq!(render(&settings), render(&settings));
    }

    #[test]
    fn default_record_produces_expected_layer_colors() {
        let css = render(&TransparencySettings::default());
        assert!(css.contains("rgba(30, 31, 34, 0.75)"));
        assert!(css.contains("rgba(43, 45, 49, 0.8)"));
        assert!(css.contains("rgba(54, 57, 63, 0.9)"));
        assert!(css.contains("rgba(47, 49, 54, 0.8)"));
    }

    #[test]
    fn layer_rules_track_the_record() {
        let mut settings = TransparencySettings::default();
        settings.chat_opacity = 0.5;
        let css = render(&settings);
        assert!(css.contains("rgba(54, 57, 63, 0.5)"));
        assert!(!css.contains("rgba(54, 57, 63, 0.9)"));
    }

    #[test]
    fn window_opacity_is_not_part_of_the_sheet() {
        let mut dimmed = TransparencySettings::default();
        dimmed.window_opacity = 0.25;
        assert_eq!(render(&TransparencySettings::default()), render(&dimmed));
    }

    #[test]
    fn z_index_layering_is_stable() {
        let css = render(&TransparencySettings::default());
        assert!(css.contains("z-index: 10 !important"));
        assert!(css.contains("z-index: 15 !important"));
        assert!(css.contains("z-index: 20 !important"));
        assert!(css.contains("z-index: 25 !important"));
    }
}

//! Typed view over `services.json`.
use crate::config::ConfigDocument;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const KEY_AI: &str = "ai";
pub const KEY_POSTURE: &str = "posture";
pub const KEY_APP_MENU_LAYOUT: &str = "appMenuLayout";
pub const KEY_FLOATING_PANEL: &str = "floatingPanel";
pub const KEY_PANEL_POSITION: &str = "panelPosition";
pub const KEY_LOWSPEC_ENABLED: &str = "lowspecEnabled";

/// Defaults for `services.json`. `lowspecEnabled` is deliberately absent;
/// readers treat a missing key as `false`.
pub fn default_services() -> ConfigDocument {
    let Value::Object(map) = json!({
        "ai": false,
        "posture": false,
        "appMenuLayout": "grid",
        "mainMenuHoverActivate": false,
        "taskbarHoverActivate": false,
        "showDesktopHoverActivate": false,
        "calendarHoverActivate": false,
        "quickAccessHoverActivate": false,
        "floatingPanel": true,
        "panelPosition": "top",
    }) else {
        unreachable!("literal is an object")
    };
    ConfigDocument::from(map)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuLayout {
    #[default]
    Grid,
    List,
}

impl MenuLayout {
    pub const ALL: [MenuLayout; 2] = [MenuLayout::Grid, MenuLayout::List];

    pub fn index(self) -> u32 {
        match self {
            MenuLayout::Grid => 0,
            MenuLayout::List => 1,
        }
    }

    pub fn from_index(index: u32) -> Self {
        if index == 0 {
            MenuLayout::Grid
        } else {
            MenuLayout::List
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPosition {
    #[default]
    Top,
    Bottom,
}

impl PanelPosition {
    pub fn index(self) -> u32 {
        match self {
            PanelPosition::Top => 0,
            PanelPosition::Bottom => 1,
        }
    }

    pub fn from_index(index: u32) -> Self {
        if index == 0 {
            PanelPosition::Top
        } else {
            PanelPosition::Bottom
        }
    }
}

/// Panel widgets that can open on pointer hover instead of click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    MainMenu,
    Taskbar,
    ShowDesktop,
    Calendar,
    QuickAccess,
}

impl HoverTarget {
    pub const ALL: [HoverTarget; 5] = [
        HoverTarget::MainMenu,
        HoverTarget::Taskbar,
        HoverTarget::ShowDesktop,
        HoverTarget::Calendar,
        HoverTarget::QuickAccess,
    ];

    pub fn key(self) -> &'static str {
        match self {
            HoverTarget::MainMenu => "mainMenuHoverActivate",
            HoverTarget::Taskbar => "taskbarHoverActivate",
            HoverTarget::ShowDesktop => "showDesktopHoverActivate",
            HoverTarget::Calendar => "calendarHoverActivate",
            HoverTarget::QuickAccess => "quickAccessHoverActivate",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            HoverTarget::MainMenu => "Main menu",
            HoverTarget::Taskbar => "Taskbar",
            HoverTarget::ShowDesktop => "Show Desktop",
            HoverTarget::Calendar => "Calendar",
            HoverTarget::QuickAccess => "Quick Access",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServicesConfig {
    doc: ConfigDocument,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        ServicesConfig {
            doc: default_services(),
        }
    }
}

impl From<ConfigDocument> for ServicesConfig {
    fn from(doc: ConfigDocument) -> Self {
        ServicesConfig { doc }
    }
}

impl ServicesConfig {
    pub fn document(&self) -> &ConfigDocument {
        &self.doc
    }

    pub fn ai(&self) -> bool {
        self.doc.bool_or(KEY_AI, false)
    }

    pub fn set_ai(&mut self, enabled: bool) {
        self.doc.set(KEY_AI, enabled);
    }

    pub fn posture(&self) -> bool {
        self.doc.bool_or(KEY_POSTURE, false)
    }

    pub fn set_posture(&mut self, enabled: bool) {
        self.doc.set(KEY_POSTURE, enabled);
    }

    pub fn menu_layout(&self) -> MenuLayout {
        self.enum_or_default(KEY_APP_MENU_LAYOUT)
    }

    pub fn set_menu_layout(&mut self, layout: MenuLayout) {
        self.doc.set(KEY_APP_MENU_LAYOUT, to_value(layout));
    }

    pub fn hover(&self, target: HoverTarget) -> bool {
        self.doc.bool_or(target.key(), false)
    }

    pub fn set_hover(&mut self, target: HoverTarget, enabled: bool) {
        self.doc.set(target.key(), enabled);
    }

    pub fn floating_panel(&self) -> bool {
        self.doc.bool_or(KEY_FLOATING_PANEL, true)
    }

    pub fn set_floating_panel(&mut self, floating: bool) {
        self.doc.set(KEY_FLOATING_PANEL, floating);
    }

    pub fn panel_position(&self) -> PanelPosition {
        self.enum_or_default(KEY_PANEL_POSITION)
    }

    pub fn set_panel_position(&mut self, position: PanelPosition) {
        self.doc.set(KEY_PANEL_POSITION, to_value(position));
    }

    pub fn lowspec_enabled(&self) -> bool {
        self.doc.bool_or(KEY_LOWSPEC_ENABLED, false)
    }

    pub fn set_lowspec_enabled(&mut self, enabled: bool) {
        self.doc.set(KEY_LOWSPEC_ENABLED, enabled);
    }

    fn enum_or_default<T>(&self, key: &str) -> T
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        self.doc
            .get(key)
            .and_then(|value| T::deserialize(value).ok())
            .unwrap_or_default()
    }
}

fn to_value<T: Serialize>(value: T) -> Value {
    // Unit enum variants always serialize to a string.
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::{HoverTarget, MenuLayout, PanelPosition, ServicesConfig, default_services};
    use crate::config::{ConfigDocument, ConfigPaths, ConfigStore, merge};
    use serde_json::{Value, json};

    fn with(value: Value) -> ServicesConfig {
        let Value::Object(map) = value else {
            panic!("expected object")
        };
        ServicesConfig::from(merge(&default_services(), &map))
    }

    #[test]
    fn empty_file_backfills_exact_defaults() {
        let config = with(json!({}));
        assert_eq!(
            Value::Object(config.document().as_map().clone()),
            json!({
                "ai": false,
                "posture": false,
                "appMenuLayout": "grid",
                "mainMenuHoverActivate": false,
                "taskbarHoverActivate": false,
                "showDesktopHoverActivate": false,
                "calendarHoverActivate": false,
                "quickAccessHoverActivate": false,
                "floatingPanel": true,
                "panelPosition": "top",
            })
        );
        assert!(!config.lowspec_enabled());
    }

    #[test]
    fn empty_services_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path());
        std::fs::write(paths.services(), "{}").unwrap();

        let loaded = ConfigStore::new(paths.services(), default_services()).load();
        assert_eq!(loaded, default_services());
        let keys: Vec<&str> = loaded.as_map().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "ai",
                "posture",
                "appMenuLayout",
                "mainMenuHoverActivate",
                "taskbarHoverActivate",
                "showDesktopHoverActivate",
                "calendarHoverActivate",
                "quickAccessHoverActivate",
                "floatingPanel",
                "panelPosition",
            ]
        );
    }

    #[test]
    fn reads_typed_values() {
        let config = with(json!({
            "appMenuLayout": "list",
            "panelPosition": "bottom",
            "calendarHoverActivate": true,
            "lowspecEnabled": true,
        }));
        assert_eq!(config.menu_layout(), MenuLayout::List);
        assert_eq!(config.panel_position(), PanelPosition::Bottom);
        assert!(config.hover(HoverTarget::Calendar));
        assert!(!config.hover(HoverTarget::Taskbar));
        assert!(config.lowspec_enabled());
    }

    #[test]
    fn unparseable_values_read_as_defaults_but_are_kept() {
        let config = with(json!({"appMenuLayout": "mosaic", "floatingPanel": "yes"}));
        assert_eq!(config.menu_layout(), MenuLayout::Grid);
        assert!(config.floating_panel());
        assert_eq!(config.document().get("appMenuLayout"), Some(&json!("mosaic")));
    }

    #[test]
    fn setters_write_wire_strings() {
        let mut config = ServicesConfig::from(ConfigDocument::default());
        config.set_menu_layout(MenuLayout::List);
        config.set_panel_position(PanelPosition::Bottom);
        config.set_hover(HoverTarget::QuickAccess, true);
        assert_eq!(config.document().get("appMenuLayout"), Some(&json!("list")));
        assert_eq!(config.document().get("panelPosition"), Some(&json!("bottom")));
        assert_eq!(
            config.document().get("quickAccessHoverActivate"),
            Some(&json!(true))
        );
    }

    #[test]
    fn combo_indices_round_trip() {
        for layout in MenuLayout::ALL {
            assert_eq!(MenuLayout::from_index(layout.index()), layout);
        }
        assert_eq!(PanelPosition::from_index(1), PanelPosition::Bottom);
    }
}

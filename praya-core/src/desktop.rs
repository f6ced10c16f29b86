//! Desktop-environment settings that low-spec mode mirrors into.
use thiserror::Error;

/// Tiling extension that low-spec mode switches off.
pub const TILING_EXTENSION_ID: &str = "tilingshell@ferrarodomenico.com";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings schema {0} is not installed")]
    SchemaMissing(String),

    #[error("failed to write setting {key}: {message}")]
    Write { key: String, message: String },
}

/// Writes to the desktop settings store. Every method is attempted on its own;
/// callers treat failures as advisory.
pub trait DesktopSettings {
    fn set_animations_enabled(&self, enabled: bool) -> Result<(), SettingsError>;
    fn extension_lists(&self) -> Result<ExtensionLists, SettingsError>;
    fn set_extension_lists(&self, lists: &ExtensionLists) -> Result<(), SettingsError>;
}

/// The shell's `enabled-extensions` and `disabled-extensions` lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionLists {
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
}

impl ExtensionLists {
    /// Move `id` into the disabled list.
    pub fn disable(&mut self, id: &str) {
        move_between(&mut self.enabled, &mut self.disabled, id);
    }

    /// Move `id` into the enabled list.
    pub fn enable(&mut self, id: &str) {
        move_between(&mut self.disabled, &mut self.enabled, id);
    }
}

fn move_between(from: &mut Vec<String>, to: &mut Vec<String>, id: &str) {
    from.retain(|entry| entry != id);
    let mut seen = false;
    to.retain(|entry| {
        if entry != id {
            return true;
        }
        let keep = !seen;
        seen = true;
        keep
    });
    if !seen {
        to.push(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::ExtensionLists;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn disable_moves_identifier_and_keeps_order() {
        let mut lists = ExtensionLists {
            enabled: strings(&["a@x", "tiling@x", "b@x"]),
            disabled: strings(&["c@x"]),
        };
        lists.disable("tiling@x");
        assert_eq!(lists.enabled, strings(&["a@x", "b@x"]));
        assert_eq!(lists.disabled, strings(&["c@x", "tiling@x"]));
    }

    #[test]
    fn repeated_moves_never_duplicate() {
        let mut lists = ExtensionLists {
            enabled: strings(&["tiling@x", "tiling@x"]),
            disabled: strings(&["tiling@x", "tiling@x"]),
        };
        for _ in 0..3 {
            lists.disable("tiling@x");
            lists.disable("tiling@x");
            lists.enable("tiling@x");
        }
        assert_eq!(lists.enabled, strings(&["tiling@x"]));
        assert!(lists.disabled.is_empty());

        lists.disable("tiling@x");
        assert!(lists.enabled.is_empty());
        assert_eq!(lists.disabled, strings(&["tiling@x"]));
    }
}

//! GSettings-backed implementation of the low-spec desktop mirrors.
use gtk4::gio;
use gtk4::prelude::*;
use praya_core::{DesktopSettings, ExtensionLists, SettingsError};

const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";
const SHELL_SCHEMA: &str = "org.gnome.shell";
const KEY_ENABLE_ANIMATIONS: &str = "enable-animations";
const KEY_ENABLED_EXTENSIONS: &str = "enabled-extensions";
const KEY_DISABLED_EXTENSIONS: &str = "disabled-extensions";

#[derive(Debug, Default, Clone, Copy)]
pub struct GioDesktopSettings;

// gio::Settings::new aborts on an unknown schema, so look it up first.
fn open(schema_id: &str) -> Result<gio::Settings, SettingsError> {
    let installed = gio::SettingsSchemaSource::default()
        .and_then(|source| source.lookup(schema_id, true))
        .is_some();
    if !installed {
        return Err(SettingsError::SchemaMissing(schema_id.to_string()));
    }
    Ok(gio::Settings::new(schema_id))
}

fn write_error(key: &str, err: impl std::fmt::Display) -> SettingsError {
    SettingsError::Write {
        key: key.to_string(),
        message: err.to_string(),
    }
}

fn read_strv(settings: &gio::Settings, key: &str) -> Vec<String> {
    settings.strv(key).iter().map(|id| id.to_string()).collect()
}

fn write_strv(settings: &gio::Settings, key: &str, values: &[String]) -> Result<(), SettingsError> {
    let values: Vec<&str> = values.iter().map(String::as_str).collect();
    settings
        .set_strv(key, values.as_slice())
        .map_err(|err| write_error(key, err))
}

impl DesktopSettings for GioDesktopSettings {
    fn set_animations_enabled(&self, enabled: bool) -> Result<(), SettingsError> {
        let settings = open(INTERFACE_SCHEMA)?;
        settings
            .set_boolean(KEY_ENABLE_ANIMATIONS, enabled)
            .map_err(|err| write_error(KEY_ENABLE_ANIMATIONS, err))?;
        gio::Settings::sync();
        log::debug!("desktop animations set to {enabled}");
        Ok(())
    }

    fn extension_lists(&self) -> Result<ExtensionLists, SettingsError> {
        let settings = open(SHELL_SCHEMA)?;
        Ok(ExtensionLists {
            enabled: read_strv(&settings, KEY_ENABLED_EXTENSIONS),
            disabled: read_strv(&settings, KEY_DISABLED_EXTENSIONS),
        })
    }

    fn set_extension_lists(&self, lists: &ExtensionLists) -> Result<(), SettingsError> {
        let settings = open(SHELL_SCHEMA)?;
        write_strv(&settings, KEY_ENABLED_EXTENSIONS, &lists.enabled)?;
        write_strv(&settings, KEY_DISABLED_EXTENSIONS, &lists.disabled)?;
        gio::Settings::sync();
        Ok(())
    }
}

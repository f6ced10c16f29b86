//! JSON documents shared with the shell extension.
//!
//! The extension watches these files and only ever reads them, so every save
//! goes through a temporary file that is renamed into place.
use serde_json::{Map, Value};
use std::fs::{self, DirBuilder};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const SERVICES_FILE: &str = "services.json";
pub const CHATBOT_FILE: &str = "chatbot.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error while writing {path:?}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("failed to encode config document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        ConfigError::Io {
            source: err,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// An untyped JSON object. Keys the tools do not know about are carried
/// through untouched so newer extension versions can add settings freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    values: Map<String, Value>,
}

impl ConfigDocument {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }
}

impl From<Map<String, Value>> for ConfigDocument {
    fn from(values: Map<String, Value>) -> Self {
        ConfigDocument { values }
    }
}

/// Shallow key union of `defaults` and `parsed`; `parsed` wins per key.
pub fn merge(defaults: &ConfigDocument, parsed: &Map<String, Value>) -> ConfigDocument {
    let mut values = defaults.values.clone();
    for (key, value) in parsed {
        values.insert(key.clone(), value.clone());
    }
    ConfigDocument { values }
}

/// One JSON file plus the defaults it is backfilled from.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    defaults: ConfigDocument,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>, defaults: ConfigDocument) -> Self {
        ConfigStore {
            path: path.into(),
            defaults,
        }
    }

    /// Read the document, falling back to the defaults on any read or parse
    /// failure.
    pub fn load(&self) -> ConfigDocument {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("{} does not exist yet, using defaults", self.path.display());
                return self.defaults.clone();
            }
            Err(err) => {
                log::warn!("failed to read {}: {err}", self.path.display());
                return self.defaults.clone();
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(parsed)) => merge(&self.defaults, &parsed),
            Ok(_) => {
                log::warn!(
                    "{} does not hold a JSON object, using defaults",
                    self.path.display()
                );
                self.defaults.clone()
            }
            Err(err) => {
                log::warn!("failed to parse {}: {err}", self.path.display());
                self.defaults.clone()
            }
        }
    }

    /// Replace the file with `document`, pretty-printed with a trailing newline.
    pub fn save(&self, document: &ConfigDocument) -> Result<()> {
        let mut encoded = serde_json::to_string_pretty(document.as_map())?;
        encoded.push('\n');

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        ensure_dir(parent)?;

        let mut tmp =
            NamedTempFile::new_in(parent).map_err(|err| ConfigError::from_io(parent, err))?;
        let tmp_path = tmp.path().to_path_buf();
        tmp.write_all(encoded.as_bytes())
            .map_err(|err| ConfigError::from_io(&tmp_path, err))?;
        tmp.as_file()
            .sync_all()
            .map_err(|err| ConfigError::from_io(&tmp_path, err))?;
        tmp.persist(&self.path)
            .map_err(|err| ConfigError::from_io(&self.path, err.error))?;

        log::debug!("saved {}", self.path.display());
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .map_err(|err| ConfigError::from_io(dir, err))
}

/// Locations of the two documents inside the Praya config directory.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    dir: PathBuf,
}

impl ConfigPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ConfigPaths { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn services(&self) -> PathBuf {
        self.dir.join(SERVICES_FILE)
    }

    pub fn chatbot(&self) -> PathBuf {
        self.dir.join(CHATBOT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigDocument, ConfigStore, merge};
    use serde_json::{Map, Value, json};
    use std::os::unix::fs::PermissionsExt;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn defaults() -> ConfigDocument {
        ConfigDocument::from(object(json!({
            "ai": false,
            "appMenuLayout": "grid",
            "floatingPanel": true,
        })))
    }

    #[test]
    fn merge_prefers_parsed_values_and_keeps_extras() {
        let merged = merge(&defaults(), &object(json!({"ai": true, "foo": "bar"})));
        assert_eq!(
            Value::Object(merged.as_map().clone()),
            json!({"ai": true, "appMenuLayout": "grid", "floatingPanel": true, "foo": "bar"})
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let partials = [
            json!({}),
            json!({"ai": true}),
            json!({"floatingPanel": false, "extra": [1, 2]}),
            json!({"appMenuLayout": "list", "ai": "weird"}),
        ];
        for partial in partials {
            let once = merge(&defaults(), &object(partial));
            let twice = merge(&defaults(), once.as_map());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn merge_keeps_default_key_order() {
        let merged = merge(&defaults(), &object(json!({"zzz": 1, "floatingPanel": false})));
        let keys: Vec<&str> = merged.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, ["ai", "appMenuLayout", "floatingPanel", "zzz"]);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("services.json"), defaults());
        assert_eq!(store.load(), defaults());
    }

    #[test]
    fn malformed_or_non_object_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.json");
        let store = ConfigStore::new(&path, defaults());

        std::fs::write(&path, "{\"ai\": tru").unwrap();
        assert_eq!(store.load(), defaults());

        std::fs::write(&path, "[1, 2, 3]\n").unwrap();
        assert_eq!(store.load(), defaults());
    }

    #[test]
    fn unknown_keys_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.json");
        std::fs::write(&path, "{\"foo\": \"bar\", \"ai\": true}").unwrap();
        let store = ConfigStore::new(&path, defaults());

        let mut doc = store.load();
        doc.set("floatingPanel", false);
        store.save(&doc).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["foo"], json!("bar"));
        assert_eq!(written["ai"], json!(true));
        assert_eq!(written["floatingPanel"], json!(false));
    }

    #[test]
    fn save_writes_indented_json_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatbot.json");
        let store = ConfigStore::new(&path, defaults());
        store.save(&defaults()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "{\n  \"ai\": false,\n  \"appMenuLayout\": \"grid\",\n  \"floatingPanel\": true\n}\n"
        );
    }

    #[test]
    fn save_creates_private_config_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("config").join("praya");
        let store = ConfigStore::new(config_dir.join("services.json"), defaults());
        store.save(&defaults()).unwrap();

        let mode = std::fs::metadata(&config_dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
        assert!(config_dir.join("services.json").is_file());
        let leftovers = std::fs::read_dir(&config_dir).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn save_reports_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = ConfigStore::new(blocker.join("services.json"), defaults());
        assert!(store.save(&defaults()).is_err());
    }
}

//! `chatbot.json` and the static provider registry.
use crate::config::ConfigDocument;
use serde_json::Map;

pub const KEY_PROVIDER: &str = "provider";
pub const KEY_MODEL: &str = "model";
pub const KEY_API_KEY: &str = "apiKey";

#[derive(Debug, PartialEq, Eq)]
pub struct Provider {
    pub key: &'static str,
    pub name: &'static str,
    pub models: &'static [&'static str],
}

/// Must match the provider table in the shell extension's constants.js.
pub static PROVIDERS: &[Provider] = &[
    Provider {
        key: "anthropic",
        name: "Anthropic",
        models: &[
            "claude-sonnet-4-20250514",
            "claude-opus-4-20250514",
            "claude-3-5-haiku-20241022",
        ],
    },
    Provider {
        key: "openai",
        name: "ChatGPT",
        models: &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo"],
    },
];

impl Provider {
    pub fn by_key(key: &str) -> Option<&'static Provider> {
        PROVIDERS.iter().find(|provider| provider.key == key)
    }

    pub fn by_index(index: usize) -> Option<&'static Provider> {
        PROVIDERS.get(index)
    }

    pub fn index(&self) -> usize {
        PROVIDERS
            .iter()
            .position(|provider| provider.key == self.key)
            .unwrap_or(0)
    }

    /// `current` if this provider offers it, else the provider's first model.
    pub fn resolve_model(&self, current: &str) -> &'static str {
        self.models
            .iter()
            .copied()
            .find(|model| *model == current)
            .unwrap_or(self.models[0])
    }

    pub fn model_index(&self, model: &str) -> usize {
        self.models
            .iter()
            .position(|candidate| *candidate == model)
            .unwrap_or(0)
    }
}

pub fn default_chatbot() -> ConfigDocument {
    let mut map = Map::new();
    map.insert(KEY_PROVIDER.to_string(), "anthropic".into());
    map.insert(KEY_MODEL.to_string(), "claude-sonnet-4-20250514".into());
    map.insert(KEY_API_KEY.to_string(), "".into());
    ConfigDocument::from(map)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatbotConfig {
    doc: ConfigDocument,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        ChatbotConfig {
            doc: default_chatbot(),
        }
    }
}

impl From<ConfigDocument> for ChatbotConfig {
    fn from(doc: ConfigDocument) -> Self {
        ChatbotConfig { doc }
    }
}

impl ChatbotConfig {
    pub fn document(&self) -> &ConfigDocument {
        &self.doc
    }

    pub fn provider_key(&self) -> &str {
        self.doc.str_or(KEY_PROVIDER, "anthropic")
    }

    /// The stored provider, or the first registry entry if the key is unknown.
    pub fn provider(&self) -> &'static Provider {
        Provider::by_key(self.provider_key()).unwrap_or(&PROVIDERS[0])
    }

    pub fn model(&self) -> &str {
        self.doc.str_or(KEY_MODEL, "")
    }

    pub fn api_key(&self) -> &str {
        self.doc.str_or(KEY_API_KEY, "")
    }

    /// Switch provider and re-resolve the model against its list.
    pub fn select_provider(&mut self, provider: &'static Provider) -> &'static str {
        let model = provider.resolve_model(self.model());
        self.doc.set(KEY_PROVIDER, provider.key);
        self.doc.set(KEY_MODEL, model);
        model
    }

    pub fn set_model(&mut self, model: &str) {
        self.doc.set(KEY_MODEL, model);
    }

    pub fn set_api_key(&mut self, api_key: &str) {
        self.doc.set(KEY_API_KEY, api_key);
    }
}

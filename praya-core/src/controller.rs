//! Binds preference-window events to config mutations and side effects.
//!
//! Every event updates one field of one document and saves that document
//! immediately. Two events reach further: low-spec mode mirrors itself into
//! the desktop settings, and the provider choice re-resolves the model.
use crate::chatbot::{ChatbotConfig, Provider, default_chatbot};
use crate::config::{ConfigError, ConfigPaths, ConfigStore};
use crate::desktop::{DesktopSettings, SettingsError, TILING_EXTENSION_ID};
use crate::posture::POSTURE_FEATURE;
use crate::services::{HoverTarget, MenuLayout, PanelPosition, ServicesConfig, default_services};
use crate::status::ServiceStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceEvent {
    MenuLayout(MenuLayout),
    PanelPosition(PanelPosition),
    FloatingPanel(bool),
    Hover(HoverTarget, bool),
    Lowspec(bool),
    Posture(bool),
    Ai(bool),
    /// Index into [`crate::PROVIDERS`].
    Provider(usize),
    /// Index into the current provider's model list.
    Model(usize),
    ApiKey(String),
}

/// Work the front-end has to do after an event was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ShowMenuLayout(MenuLayout),
    ShowModels {
        models: &'static [&'static str],
        selected: usize,
    },
    /// Fire-and-forget `EnableService`/`DisableService` call.
    SetFeature {
        feature: &'static str,
        enabled: bool,
    },
}

#[derive(Debug)]
pub struct Outcome {
    pub effects: Vec<Effect>,
    /// The in-memory change is kept even when this is an error.
    pub saved: Result<(), ConfigError>,
}

impl Outcome {
    fn unchanged() -> Self {
        Outcome {
            effects: Vec::new(),
            saved: Ok(()),
        }
    }
}

#[derive(Clone, Copy)]
enum Document {
    Services,
    Chatbot,
}

pub struct PreferencesController<S: DesktopSettings> {
    services_store: ConfigStore,
    chatbot_store: ConfigStore,
    services: ServicesConfig,
    chatbot: ChatbotConfig,
    settings: S,
    service_status: ServiceStatus,
    bus_available: bool,
}

impl<S: DesktopSettings> PreferencesController<S> {
    pub fn load(paths: &ConfigPaths, settings: S) -> Self {
        Self::with_stores(
            ConfigStore::new(paths.services(), default_services()),
            ConfigStore::new(paths.chatbot(), default_chatbot()),
            settings,
        )
    }

    pub fn with_stores(services_store: ConfigStore, chatbot_store: ConfigStore, settings: S) -> Self {
        let services = ServicesConfig::from(services_store.load());
        let chatbot = ChatbotConfig::from(chatbot_store.load());
        PreferencesController {
            services_store,
            chatbot_store,
            services,
            chatbot,
            settings,
            service_status: ServiceStatus::default(),
            bus_available: false,
        }
    }

    pub fn services(&self) -> &ServicesConfig {
        &self.services
    }

    pub fn chatbot(&self) -> &ChatbotConfig {
        &self.chatbot
    }

    pub fn service_status(&self) -> &ServiceStatus {
        &self.service_status
    }

    pub fn set_service_status(&mut self, status: ServiceStatus) {
        log::debug!("praya service status: {status:?}");
        self.service_status = status;
    }

    pub fn set_bus_available(&mut self, available: bool) {
        self.bus_available = available;
    }

    /// Models offered for the displayed provider and the one to preselect.
    pub fn model_choices(&self) -> (&'static [&'static str], usize) {
        let provider = self.chatbot.provider();
        (provider.models, provider.model_index(self.chatbot.model()))
    }

    pub fn handle(&mut self, event: PreferenceEvent) -> Outcome {
        let mut effects = Vec::new();
        let document = match event {
            PreferenceEvent::MenuLayout(layout) => {
                self.services.set_menu_layout(layout);
                Document::Services
            }
            PreferenceEvent::PanelPosition(position) => {
                self.services.set_panel_position(position);
                Document::Services
            }
            PreferenceEvent::FloatingPanel(floating) => {
                self.services.set_floating_panel(floating);
                Document::Services
            }
            PreferenceEvent::Hover(target, enabled) => {
                self.services.set_hover(target, enabled);
                Document::Services
            }
            PreferenceEvent::Ai(enabled) => {
                self.services.set_ai(enabled);
                Document::Services
            }
            PreferenceEvent::Lowspec(enabled) => {
                effects.push(self.apply_lowspec(enabled));
                Document::Services
            }
            PreferenceEvent::Posture(enabled) => {
                self.services.set_posture(enabled);
                if self.bus_available && self.service_status.is_running() {
                    effects.push(Effect::SetFeature {
                        feature: POSTURE_FEATURE,
                        enabled,
                    });
                }
                Document::Services
            }
            PreferenceEvent::Provider(index) => {
                let Some(provider) = Provider::by_index(index) else {
                    log::warn!("ignoring unknown provider index {index}");
                    return Outcome::unchanged();
                };
                let model = self.chatbot.select_provider(provider);
                effects.push(Effect::ShowModels {
                    models: provider.models,
                    selected: provider.model_index(model),
                });
                Document::Chatbot
            }
            PreferenceEvent::Model(index) => {
                let provider = self.chatbot.provider();
                let Some(model) = provider.models.get(index) else {
                    return Outcome::unchanged();
                };
                self.chatbot.set_model(model);
                Document::Chatbot
            }
            PreferenceEvent::ApiKey(api_key) => {
                self.chatbot.set_api_key(&api_key);
                Document::Chatbot
            }
        };

        let saved = match document {
            Document::Services => self.services_store.save(self.services.document()),
            Document::Chatbot => self.chatbot_store.save(self.chatbot.document()),
        };
        if let Err(err) = &saved {
            log::error!("failed to save preferences: {err}");
        }
        Outcome { effects, saved }
    }

    fn apply_lowspec(&mut self, enabled: bool) -> Effect {
        if let Err(err) = self.settings.set_animations_enabled(!enabled) {
            log::warn!("could not update desktop animations: {err}");
        }
        if let Err(err) = self.mirror_tiling_extension(enabled) {
            log::warn!("could not update {TILING_EXTENSION_ID}: {err}");
        }

        let layout = if enabled {
            MenuLayout::List
        } else {
            MenuLayout::Grid
        };
        self.services.set_lowspec_enabled(enabled);
        self.services.set_menu_layout(layout);
        Effect::ShowMenuLayout(layout)
    }

    fn mirror_tiling_extension(&self, lowspec: bool) -> Result<(), SettingsError> {
        let mut lists = self.settings.extension_lists()?;
        if lowspec {
            lists.disable(TILING_EXTENSION_ID);
        } else {
            lists.enable(TILING_EXTENSION_ID);
        }
        self.settings.set_extension_lists(&lists)
    }
}

#[cfg(test)]
mod tests {
    use super::{Effect, PreferenceEvent, PreferencesController};
    use crate::config::ConfigPaths;
    use crate::desktop::{DesktopSettings, ExtensionLists, SettingsError, TILING_EXTENSION_ID};
    use crate::services::{HoverTarget, MenuLayout};
    use crate::status::ServiceStatus;
    use serde_json::Value;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeSettings {
        animations: Cell<Option<bool>>,
        lists: RefCell<ExtensionLists>,
        fail_animations: bool,
        fail_extensions: bool,
    }

    impl DesktopSettings for FakeSettings {
        fn set_animations_enabled(&self, enabled: bool) -> Result<(), SettingsError> {
            if self.fail_animations {
                return Err(SettingsError::SchemaMissing(
                    "org.gnome.desktop.interface".into(),
                ));
            }
            self.animations.set(Some(enabled));
            Ok(())
        }

        fn extension_lists(&self) -> Result<ExtensionLists, SettingsError> {
            if self.fail_extensions {
                return Err(SettingsError::SchemaMissing("org.gnome.shell".into()));
            }
            Ok(self.lists.borrow().clone())
        }

        fn set_extension_lists(&self, lists: &ExtensionLists) -> Result<(), SettingsError> {
            *self.lists.borrow_mut() = lists.clone();
            Ok(())
        }
    }

    fn read_json(path: &std::path::Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn count(list: &[String]) -> usize {
        list.iter().filter(|id| *id == TILING_EXTENSION_ID).count()
    }

    #[test]
    fn simple_toggles_persist_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path());
        let mut controller = PreferencesController::load(&paths, FakeSettings::default());

        let outcome = controller.handle(PreferenceEvent::Hover(HoverTarget::Taskbar, true));
        assert!(outcome.saved.is_ok());
        assert!(outcome.effects.is_empty());
        assert_eq!(read_json(&paths.services())["taskbarHoverActivate"], true);

        controller.handle(PreferenceEvent::ApiKey("sk-test".into()));
        assert_eq!(read_json(&paths.chatbot())["apiKey"], "sk-test");
    }

    #[test]
    fn lowspec_toggle_is_symmetric() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path());
        let settings = FakeSettings::default();
        settings.lists.borrow_mut().enabled = vec![TILING_EXTENSION_ID.to_string()];
        let mut controller = PreferencesController::load(&paths, settings);
        assert_eq!(controller.services().menu_layout(), MenuLayout::Grid);

        let outcome = controller.handle(PreferenceEvent::Lowspec(true));
        assert_eq!(outcome.effects, vec![Effect::ShowMenuLayout(MenuLayout::List)]);
        assert_eq!(controller.settings.animations.get(), Some(false));
        {
            let lists = controller.settings.lists.borrow();
            assert_eq!(count(&lists.enabled), 0);
            assert_eq!(count(&lists.disabled), 1);
        }
        let written = read_json(&paths.services());
        assert_eq!(written["lowspecEnabled"], true);
        assert_eq!(written["appMenuLayout"], "list");

        let outcome = controller.handle(PreferenceEvent::Lowspec(false));
        assert_eq!(outcome.effects, vec![Effect::ShowMenuLayout(MenuLayout::Grid)]);
        assert_eq!(controller.settings.animations.get(), Some(true));
        {
            let lists = controller.settings.lists.borrow();
            assert_eq!(count(&lists.enabled), 1);
            assert_eq!(count(&lists.disabled), 0);
        }
        assert_eq!(read_json(&paths.services())["appMenuLayout"], "grid");
    }

    #[test]
    fn repeated_lowspec_toggles_never_duplicate_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller =
            PreferencesController::load(&ConfigPaths::new(dir.path()), FakeSettings::default());
        for enabled in [true, true, false, true, false, false, true] {
            controller.handle(PreferenceEvent::Lowspec(enabled));
        }
        let lists = controller.settings.lists.borrow();
        assert_eq!(count(&lists.enabled), 0);
        assert_eq!(count(&lists.disabled), 1);
    }

    #[test]
    fn settings_writes_are_independent_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path());
        let settings = FakeSettings {
            fail_animations: true,
            ..FakeSettings::default()
        };
        let mut controller = PreferencesController::load(&paths, settings);
        let outcome = controller.handle(PreferenceEvent::Lowspec(true));
        assert!(outcome.saved.is_ok());
        assert_eq!(count(&controller.settings.lists.borrow().disabled), 1);

        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path());
        let settings = FakeSettings {
            fail_extensions: true,
            ..FakeSettings::default()
        };
        let mut controller = PreferencesController::load(&paths, settings);
        let outcome = controller.handle(PreferenceEvent::Lowspec(true));
        assert!(outcome.saved.is_ok());
        assert_eq!(controller.settings.animations.get(), Some(false));
        assert_eq!(read_json(&paths.services())["lowspecEnabled"], true);
    }

    #[test]
    fn provider_change_re_resolves_model() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path());
        std::fs::write(
            paths.chatbot(),
            r#"{"provider": "anthropic", "model": "claude-opus-4-20250514", "apiKey": "k"}"#,
        )
        .unwrap();
        let mut controller = PreferencesController::load(&paths, FakeSettings::default());
        assert_eq!(controller.model_choices().1, 1);

        let outcome = controller.handle(PreferenceEvent::Provider(1));
        assert!(matches!(
            outcome.effects.as_slice(),
            [Effect::ShowModels { selected: 0, models }] if models[0] == "gpt-4o"
        ));
        let written = read_json(&paths.chatbot());
        assert_eq!(written["provider"], "openai");
        assert_eq!(written["model"], "gpt-4o");
        assert_eq!(written["apiKey"], "k");

        controller.handle(PreferenceEvent::Model(2));
        assert_eq!(read_json(&paths.chatbot())["model"], "gpt-4-turbo");
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path());
        let mut controller = PreferencesController::load(&paths, FakeSettings::default());
        assert!(controller.handle(PreferenceEvent::Provider(9)).effects.is_empty());
        assert!(controller.handle(PreferenceEvent::Model(9)).saved.is_ok());
        assert!(!paths.chatbot().exists());
    }

    #[test]
    fn posture_rpc_requires_bus_and_running_service() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path());
        let mut controller = PreferencesController::load(&paths, FakeSettings::default());

        let outcome = controller.handle(PreferenceEvent::Posture(true));
        assert!(outcome.effects.is_empty());
        assert_eq!(read_json(&paths.services())["posture"], true);

        controller.set_bus_available(true);
        controller.set_service_status(ServiceStatus::Stopped);
        assert!(controller.handle(PreferenceEvent::Posture(false)).effects.is_empty());

        controller.set_service_status(ServiceStatus::Running);
        let outcome = controller.handle(PreferenceEvent::Posture(true));
        assert_eq!(
            outcome.effects,
            vec![Effect::SetFeature {
                feature: "posture",
                enabled: true
            }]
        );
    }

    #[test]
    fn save_failure_is_reported_but_change_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("praya");
        std::fs::write(&blocker, "").unwrap();
        let mut controller =
            PreferencesController::load(&ConfigPaths::new(&blocker), FakeSettings::default());

        let outcome = controller.handle(PreferenceEvent::Ai(true));
        assert!(outcome.saved.is_err());
        assert!(controller.services().ai());
    }
}

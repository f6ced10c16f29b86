//! Core domain layer for the Praya preferences and low-spec dialog tools.
//!
//! Everything here is toolkit-free: the GTK front-ends feed widget events into
//! [`PreferencesController`] and render what it hands back.
pub mod chatbot;
pub mod config;
pub mod controller;
pub mod desktop;
pub mod lowspec;
pub mod posture;
pub mod services;
pub mod status;

pub use chatbot::{ChatbotConfig, PROVIDERS, Provider};
pub use config::{ConfigDocument, ConfigError, ConfigPaths, ConfigStore, merge};
pub use controller::{Effect, Outcome, PreferenceEvent, PreferencesController};
pub use desktop::{DesktopSettings, ExtensionLists, SettingsError};
pub use lowspec::LowspecDecision;
pub use posture::{
    PollTimer, PostureError, PostureReading, PostureSample, PostureTiming, PostureTracker,
    TimerHandle,
};
pub use services::{HoverTarget, MenuLayout, PanelPosition, ServicesConfig};
pub use status::{ProbeError, ServiceProbe, ServiceStatus};

/// Version shown on the About page; kept in lockstep with the shell extension.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

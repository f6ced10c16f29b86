//! Liveness of the `praya` user service as reported by systemd.
use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SERVICE_UNIT: &str = "praya";
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

static UNIT_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9:_.@-]*$").unwrap());

/// Result of the last `systemctl --user is-active` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Running,
    Stopped,
    /// systemd answered with something other than active/inactive.
    Unknown {
        raw: String,
    },
    /// The query could not be run or timed out.
    Error {
        message: String,
    },
}

impl Default for ServiceStatus {
    fn default() -> Self {
        ServiceStatus::Unknown { raw: String::new() }
    }
}

impl ServiceStatus {
    pub fn from_is_active(stdout: &str) -> Self {
        match stdout.trim() {
            "active" => ServiceStatus::Running,
            "inactive" => ServiceStatus::Stopped,
            other => ServiceStatus::Unknown {
                raw: other.to_string(),
            },
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ServiceStatus::Running)
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid unit name: {0:?}")]
    InvalidUnit(String),
}

/// Describes the `systemctl` invocation; the GUI runs it asynchronously.
#[derive(Debug, Clone)]
pub struct ServiceProbe {
    unit: String,
    program: PathBuf,
    timeout: Duration,
}

impl ServiceProbe {
    pub fn new(unit: impl Into<String>) -> Result<Self, ProbeError> {
        let unit = unit.into();
        if !UNIT_NAME_REGEX.is_match(&unit) {
            return Err(ProbeError::InvalidUnit(unit));
        }
        Ok(ServiceProbe {
            unit,
            program: PathBuf::from("systemctl"),
            timeout: PROBE_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn argv(&self) -> Vec<OsString> {
        vec![
            self.program.clone().into_os_string(),
            OsString::from("--user"),
            OsString::from("is-active"),
            OsString::from(&self.unit),
        ]
    }
}

impl Default for ServiceProbe {
    fn default() -> Self {
        ServiceProbe {
            unit: DEFAULT_SERVICE_UNIT.to_string(),
            program: PathBuf::from("systemctl"),
            timeout: PROBE_TIMEOUT,
        }
    }
}

use praya_core::{PostureReading, ServiceStatus};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusLevel {
    Good,
    Warning,
    Critical,
    Neutral,
}

pub const CHECKING_LABEL: &str = "Checking…";

pub fn service_status_label(status: &ServiceStatus) -> String {
    match status {
        ServiceStatus::Running => "Running".to_string(),
        ServiceStatus::Stopped => "Stopped".to_string(),
        ServiceStatus::Unknown { raw } if raw.is_empty() => "Unknown".to_string(),
        ServiceStatus::Unknown { raw } => raw.clone(),
        ServiceStatus::Error { .. } => "Error checking status".to_string(),
    }
}

pub fn service_status_tooltip(status: &ServiceStatus) -> Option<String> {
    match status {
        ServiceStatus::Error { message } => Some(message.clone()),
        _ => None,
    }
}

pub fn service_status_level(status: &ServiceStatus) -> StatusLevel {
    match status {
        ServiceStatus::Running => StatusLevel::Good,
        ServiceStatus::Stopped => StatusLevel::Neutral,
        ServiceStatus::Unknown { .. } => StatusLevel::Warning,
        ServiceStatus::Error { .. } => StatusLevel::Critical,
    }
}

pub fn posture_label(reading: &PostureReading) -> String {
    match reading {
        PostureReading::Waiting => "Waiting for data…".to_string(),
        PostureReading::Sample(sample) => sample.to_string(),
        PostureReading::Unavailable => "Service unavailable".to_string(),
        PostureReading::BusUnavailable => "D-Bus not available".to_string(),
    }
}

//! Calls out of the preferences window: the Praya daemon over the session
//! bus and `systemctl` for the unit status. Everything here is async on the
//! main context; nothing blocks the UI for longer than a call timeout.
use gtk4::prelude::*;
use gtk4::{gio, glib};
use humantime::format_duration;
use praya_core::posture::{BUS_NAME, MAIN_INTERFACE, MAIN_PATH, POSTURE_INTERFACE, POSTURE_PATH};
use praya_core::{PostureError, PostureSample, ServiceProbe, ServiceStatus};
use std::ffi::{OsStr, OsString};
use std::time::Duration;

const NO_TIMEOUT: i32 = -1;

#[derive(Clone)]
pub struct ExternalActions {
    connection: Option<gio::DBusConnection>,
    probe: ServiceProbe,
}

impl ExternalActions {
    pub fn connect(probe: ServiceProbe) -> Self {
        let connection = match gio::bus_get_sync(gio::BusType::Session, gio::Cancellable::NONE) {
            Ok(connection) => Some(connection),
            Err(err) => {
                log::warn!("session bus unavailable: {err}");
                None
            }
        };
        ExternalActions { connection, probe }
    }

    pub fn bus_available(&self) -> bool {
        self.connection.is_some()
    }

    pub async fn fetch_posture(&self, timeout: Duration) -> Result<PostureSample, PostureError> {
        let connection = self
            .connection
            .as_ref()
            .ok_or(PostureError::BusUnavailable)?;
        let reply = connection
            .call_future(
                Some(BUS_NAME),
                POSTURE_PATH,
                POSTURE_INTERFACE,
                "GetUserPosture",
                None,
                None,
                gio::DBusCallFlags::NONE,
                timeout_msec(timeout),
            )
            .await
            .map_err(call_error)?;

        let (status, score) = reply
            .get::<(String, f64)>()
            .ok_or_else(|| PostureError::Malformed(reply.type_().to_string()))?;
        Ok(PostureSample { status, score })
    }

    pub fn recalibrate(&self) {
        self.fire(POSTURE_PATH, POSTURE_INTERFACE, "Recalibrate", None);
    }

    pub fn set_feature(&self, feature: &str, enabled: bool) {
        let method = if enabled {
            "EnableService"
        } else {
            "DisableService"
        };
        let parameters = (feature.to_string(),).to_variant();
        self.fire(MAIN_PATH, MAIN_INTERFACE, method, Some(parameters));
    }

    fn fire(
        &self,
        path: &'static str,
        interface: &'static str,
        method: &'static str,
        parameters: Option<glib::Variant>,
    ) {
        let Some(connection) = self.connection.clone() else {
            log::debug!("skipping {interface}.{method}: no session bus");
            return;
        };
        glib::MainContext::default().spawn_local(async move {
            let result = connection
                .call_future(
                    Some(BUS_NAME),
                    path,
                    interface,
                    method,
                    parameters.as_ref(),
                    None,
                    gio::DBusCallFlags::NONE,
                    NO_TIMEOUT,
                )
                .await;
            if let Err(err) = result {
                log::warn!("{interface}.{method} failed: {err}");
            }
        });
    }

    /// Run `systemctl --user is-active` without blocking the main loop.
    pub async fn service_status(&self) -> ServiceStatus {
        let argv = self.probe.argv();
        let argv_refs: Vec<&OsStr> = argv.iter().map(OsString::as_os_str).collect();
        let process = match gio::Subprocess::newv(
            &argv_refs,
            gio::SubprocessFlags::STDOUT_PIPE | gio::SubprocessFlags::STDERR_SILENCE,
        ) {
            Ok(process) => process,
            Err(err) => {
                return ServiceStatus::Error {
                    message: format!("failed to run {}: {err}", self.probe.program().display()),
                };
            }
        };

        let timeout = self.probe.timeout();
        match glib::future_with_timeout(timeout, process.communicate_utf8_future(None)).await {
            Ok(Ok((stdout, _))) => {
                ServiceStatus::from_is_active(stdout.as_ref().map(|s| s.as_str()).unwrap_or_default())
            }
            Ok(Err(err)) => ServiceStatus::Error {
                message: err.message().to_string(),
            },
            Err(_) => {
                process.force_exit();
                ServiceStatus::Error {
                    message: format!(
                        "{} did not answer within {}",
                        self.probe.program().display(),
                        format_duration(timeout)
                    ),
                }
            }
        }
    }
}

fn timeout_msec(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX)
}

fn call_error(err: glib::Error) -> PostureError {
    if err.matches(gio::IOErrorEnum::TimedOut) {
        PostureError::Timeout
    } else {
        PostureError::Call(err.message().to_string())
    }
}

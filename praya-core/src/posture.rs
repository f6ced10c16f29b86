//! Live posture readings polled from the Praya daemon.
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const BUS_NAME: &str = "com.github.blankon.praya";
pub const MAIN_INTERFACE: &str = "com.github.blankon.Praya";
pub const MAIN_PATH: &str = "/com/github/blankon/Praya";
pub const POSTURE_INTERFACE: &str = "com.github.blankon.Praya.Posture";
pub const POSTURE_PATH: &str = "/com/github/blankon/Praya/Posture";
pub const POSTURE_FEATURE: &str = "posture";

pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(200);
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(50);
/// Largest period a glib millisecond timeout can carry.
pub const MAX_POLL_PERIOD: Duration = Duration::from_millis(u32::MAX as u64);

#[derive(Debug, Clone, PartialEq)]
pub struct PostureSample {
    pub status: String,
    pub score: f64,
}

impl PostureSample {
    /// Score bounded to the gauge range; the daemon does not guarantee [0, 1].
    pub fn gauge(&self) -> f64 {
        if self.score.is_nan() {
            0.0
        } else {
            self.score.clamp(0.0, 1.0)
        }
    }
}

impl fmt::Display for PostureSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.status, self.score)
    }
}

#[derive(Debug, Error)]
pub enum PostureError {
    #[error("no session bus connection")]
    BusUnavailable,

    #[error("posture call timed out")]
    Timeout,

    #[error("posture call failed: {0}")]
    Call(String),

    #[error("unexpected posture reply: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PostureReading {
    #[default]
    Waiting,
    Sample(PostureSample),
    Unavailable,
    BusUnavailable,
}

impl PostureReading {
    pub fn gauge(&self) -> f64 {
        match self {
            PostureReading::Sample(sample) => sample.gauge(),
            _ => 0.0,
        }
    }
}

impl From<Result<PostureSample, PostureError>> for PostureReading {
    fn from(result: Result<PostureSample, PostureError>) -> Self {
        match result {
            Ok(sample) => PostureReading::Sample(sample),
            Err(PostureError::BusUnavailable) => PostureReading::BusUnavailable,
            Err(_) => PostureReading::Unavailable,
        }
    }
}

/// Poll period and the per-call timeout derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostureTiming {
    period: Duration,
    call_timeout: Duration,
}

impl Default for PostureTiming {
    fn default() -> Self {
        PostureTiming {
            period: DEFAULT_POLL_PERIOD,
            call_timeout: call_timeout_for(DEFAULT_POLL_PERIOD),
        }
    }
}

impl PostureTiming {
    /// The call timeout is 90% of the period so a slow call always resolves
    /// before the next tick.
    pub fn from_period(period: Duration) -> Option<Self> {
        if !(MIN_POLL_PERIOD..=MAX_POLL_PERIOD).contains(&period) {
            return None;
        }
        Some(PostureTiming {
            period,
            call_timeout: call_timeout_for(period),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }
}

fn call_timeout_for(period: Duration) -> Duration {
    period - period / 10
}

/// Current reading plus an in-flight gate so ticks never overlap.
#[derive(Debug, Default)]
pub struct PostureTracker {
    reading: PostureReading,
    in_flight: bool,
}

impl PostureTracker {
    pub fn reading(&self) -> &PostureReading {
        &self.reading
    }

    /// Claim the tick. Returns false while the previous call is still pending.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn complete(&mut self, result: Result<PostureSample, PostureError>) -> &PostureReading {
        if let Err(err) = &result {
            log::trace!("posture poll failed: {err}");
        }
        self.in_flight = false;
        self.reading = PostureReading::from(result);
        &self.reading
    }
}

/// A scheduled source that can be cancelled once.
pub trait TimerHandle {
    fn cancel(self);
}

/// Owns the recurring poll source. Stopping is idempotent.
#[derive(Debug)]
pub struct PollTimer<H: TimerHandle> {
    handle: Option<H>,
}

impl<H: TimerHandle> Default for PollTimer<H> {
    fn default() -> Self {
        PollTimer { handle: None }
    }
}

impl<H: TimerHandle> PollTimer<H> {
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(&mut self, handle: H) {
        self.stop();
        self.handle = Some(handle);
    }

    /// Cancel the source if one is scheduled. Returns whether anything was
    /// cancelled.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}

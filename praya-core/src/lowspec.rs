//! Answer of the first-run low-spec dialog, reported as an exit status.

pub const RESPONSE_IGNORE: &str = "ignore";
pub const RESPONSE_APPLY: &str = "apply";
/// Escape and the dialog's close action. Deliberately not mapped to `ignore`.
pub const RESPONSE_CLOSE: &str = "close";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LowspecDecision {
    /// User kept the full feature set.
    Ignore,
    /// User asked for low-spec mode; the caller applies it.
    Apply,
    /// The dialog went away without a choice.
    #[default]
    Undecided,
}

impl LowspecDecision {
    pub fn from_response(response: &str) -> Self {
        match response {
            RESPONSE_IGNORE => LowspecDecision::Ignore,
            RESPONSE_APPLY => LowspecDecision::Apply,
            _ => LowspecDecision::Undecided,
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            LowspecDecision::Ignore => 0,
            LowspecDecision::Apply => 1,
            LowspecDecision::Undecided => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LowspecDecision;

    #[test]
    fn responses_map_to_exit_codes() {
        assert_eq!(LowspecDecision::from_response("ignore").exit_code(), 0);
        assert_eq!(LowspecDecision::from_response("apply").exit_code(), 1);
        assert_eq!(LowspecDecision::from_response("close").exit_code(), 2);
        assert_eq!(LowspecDecision::default().exit_code(), 2);
    }
}

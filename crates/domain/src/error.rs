//! Common error type used across the workspace.

/// Errors surfaced by the control engine and its persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum TerraError {
    /// A device name that is not part of the configured catalog.
    #[error("unknown device: {0}")]
    UnknownDevice(String),

    /// A ruleset number outside the configured range (1-based).
    #[error("unknown ruleset: {0}")]
    UnknownRuleset(usize),

    /// A time-of-day string that is not `HH:MM`.
    #[error("invalid time of day: {0:?}")]
    InvalidTimeOfDay(String),

    /// Persisted configuration that cannot be interpreted.
    ///
    /// Fatal at startup: the device count and indices are derived from it.
    #[error("malformed settings: {0}")]
    Settings(String),

    /// File IO failure while reading or writing persisted state.
    #[error("storage error")]
    Storage(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_device_name_in_message() {
        let err = TerraError::UnknownDevice("heater".to_string());
        assert_eq!(err.to_string(), "unknown device: heater");
    }

    #[test]
    fn should_convert_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TerraError::from(io);
        assert!(matches!(err, TerraError::Storage(_)));
    }
}

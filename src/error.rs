use thiserror::Error;

/// Error type for the CLI test harness
///
/// Most of these conditions are "harness-fatal" from a test's point of
/// view: the panicking entry points (`Invocation::run`, `RunOutput::json`)
/// render them through `Display` so the failing command and both captured
/// streams land in the test output verbatim. The `try_*` twins return them
/// as values for callers that want explicit error flow.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("invocation requires at least one argument")]
    EmptyInvocation,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error(
        "running `{command}` resulted in a non-zero return code: {code} - stdout: {stdout}, stderr: {stderr}"
    )]
    NonZeroExit {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error(
        "unable to convert the response to valid json ({source}) - stdout: {stdout}, stderr: {stderr}"
    )]
    JsonDecode {
        stdout: String,
        stderr: String,
        source: serde_json::Error,
    },

    #[error("captured stream is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Create a spawn error for the given command line
    pub fn spawn<S: Into<String>>(command: S, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    /// The exit code of the failed invocation, if this error carries one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this error originated in the invoked program rather than
    /// the harness itself
    pub fn is_program_failure(&self) -> bool {
        matches!(self, Self::NonZeroExit { .. } | Self::JsonDecode { .. })
    }
}

/// Convenient result type for the harness
pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_non_zero_exit_message_shape() {
        let err = HarnessError::NonZeroExit {
            command: "sometool --version".to_string(),
            code: 2,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("resulted in a non-zero return code: 2"));
        assert!(message.contains("sometool --version"));
        assert!(message.contains("stdout: out"));
        assert!(message.contains("stderr: err"));
    }

    #[test]
    fn test_json_decode_message_embeds_streams() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = HarnessError::JsonDecode {
            stdout: "not json".to_string(),
            stderr: "warning: noise".to_string(),
            source,
        };

        let message = err.to_string();
        assert!(message.contains("valid json"));
        assert!(message.contains("stdout: not json"));
        assert!(message.contains("stderr: warning: noise"));
    }

    #[test]
    fn test_exit_code_accessor() {
        let err = HarnessError::NonZeroExit {
            command: "x".to_string(),
            code: 42,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.exit_code(), Some(42));
        assert_eq!(HarnessError::EmptyInvocation.exit_code(), None);
    }

    #[test]
    fn test_program_failure_classification() {
        let exit = HarnessError::NonZeroExit {
            command: "x".to_string(),
            code: 1,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(exit.is_program_failure());

        let spawn = HarnessError::spawn("missing-tool", io::Error::from(io::ErrorKind::NotFound));
        assert!(!spawn.is_program_failure());
        assert!(!HarnessError::EmptyInvocation.is_program_failure());
    }

    #[test]
    fn test_error_type_conversions() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let harness_error: HarnessError = io_error.into();
        assert!(matches!(harness_error, HarnessError::Io(_)));

        let utf8_error = String::from_utf8(vec![0xFF, 0xFE]).unwrap_err();
        let harness_error: HarnessError = utf8_error.into();
        assert!(matches!(harness_error, HarnessError::InvalidUtf8(_)));
    }
}

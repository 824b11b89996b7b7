use serde::de::DeserializeOwned;

use crate::error::{HarnessError, Result};

/// The outcome of one completed invocation
///
/// `RunOutput` owns the raw execution result and exposes its fields
/// directly (exit code, captured streams) alongside two structured views
/// over stdout. The views are computed on access, deterministically and
/// without side effects, so repeated calls return equal values.
///
/// The two views fail differently on purpose:
/// - [`json`](Self::json) treats malformed stdout as a defect in the
///   program under test and panics with a diagnostic embedding both
///   captured streams.
/// - [`yaml`](Self::yaml) degrades to `Null`, since YAML doubles as a
///   plain-text format in many invocations.
#[derive(Debug, Clone)]
pub struct RunOutput {
    command: String,
    exit_code: i32,
    stdout: Option<String>,
    stderr: Option<String>,
}

impl RunOutput {
    pub(crate) fn new(
        command: String,
        exit_code: i32,
        stdout: Option<String>,
        stderr: Option<String>,
    ) -> Self {
        Self {
            command,
            exit_code,
            stdout,
            stderr,
        }
    }

    /// The command line that produced this output
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Exit code of the invoked program
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Whether the program exited with code zero
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Captured stdout, if capture was requested
    pub fn stdout(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    /// Captured stderr, if capture was requested
    pub fn stderr(&self) -> Option<&str> {
        self.stderr.as_deref()
    }

    /// Decode captured stdout as a JSON document
    ///
    /// Harness-fatal on malformed input: JSON output is a strict contract
    /// for the programs this harness tests, so a decode failure aborts
    /// the test with both captured streams in the panic message rather
    /// than returning a default the caller might ignore.
    ///
    /// # Panics
    ///
    /// Panics if stdout was not captured or is not valid JSON.
    pub fn json(&self) -> serde_json::Value {
        match self.try_json() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible twin of [`json`](Self::json)
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::JsonDecode`] when stdout does not parse.
    pub fn try_json(&self) -> Result<serde_json::Value> {
        let stdout = self.stdout.as_deref().unwrap_or("");
        serde_json::from_str(stdout).map_err(|source| HarnessError::JsonDecode {
            stdout: stdout.to_string(),
            stderr: self.stderr.clone().unwrap_or_default(),
            source,
        })
    }

    /// Decode captured stdout as JSON into a concrete type
    ///
    /// # Panics
    ///
    /// Panics if stdout is not valid JSON for `T`, with the same
    /// diagnostic shape as [`json`](Self::json).
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        match self.try_json_as() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible twin of [`json_as`](Self::json_as)
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::JsonDecode`] when stdout does not parse
    /// as `T`.
    pub fn try_json_as<T: DeserializeOwned>(&self) -> Result<T> {
        let stdout = self.stdout.as_deref().unwrap_or("");
        serde_json::from_str(stdout).map_err(|source| HarnessError::JsonDecode {
            stdout: stdout.to_string(),
            stderr: self.stderr.clone().unwrap_or_default(),
            source,
        })
    }

    /// Decode captured stdout as a YAML document
    ///
    /// Lenient by policy: empty or malformed input yields
    /// `serde_yaml::Value::Null` instead of failing the test.
    pub fn yaml(&self) -> serde_yaml::Value {
        let stdout = self.stdout.as_deref().unwrap_or("");
        if stdout.trim().is_empty() {
            return serde_yaml::Value::Null;
        }
        serde_yaml::from_str(stdout).unwrap_or(serde_yaml::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn output_with_stdout(stdout: &str) -> RunOutput {
        RunOutput::new(
            "sometool --version".to_string(),
            0,
            Some(stdout.to_string()),
            Some(String::new()),
        )
    }

    #[test]
    fn test_forwarded_fields() {
        let out = RunOutput::new(
            "sometool run".to_string(),
            3,
            Some("out".to_string()),
            Some("err".to_string()),
        );
        assert_eq!(out.command(), "sometool run");
        assert_eq!(out.exit_code(), 3);
        assert!(!out.success());
        assert_eq!(out.stdout(), Some("out"));
        assert_eq!(out.stderr(), Some("err"));
    }

    #[test]
    fn test_json_view_matches_independent_parse() {
        let out = output_with_stdout(r#"{"ok": true, "count": 2}"#);
        let expected: serde_json::Value =
            serde_json::from_str(r#"{"ok": true, "count": 2}"#).unwrap();
        assert_eq!(out.json(), expected);
    }

    #[test]
    fn test_json_view_is_idempotent() {
        let out = output_with_stdout(r#"{"ok": true}"#);
        assert_eq!(out.json(), out.json());
        assert_eq!(out.json(), json!({"ok": true}));
    }

    #[test]
    #[should_panic(expected = "valid json")]
    fn test_json_view_aborts_on_malformed_input() {
        let out = output_with_stdout("this is not json");
        let _ = out.json();
    }

    #[test]
    fn test_try_json_reports_both_streams() {
        let out = RunOutput::new(
            "sometool run".to_string(),
            0,
            Some("oops".to_string()),
            Some("diagnostic noise".to_string()),
        );
        let err = out.try_json().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("stdout: oops"));
        assert!(message.contains("stderr: diagnostic noise"));
    }

    #[test]
    fn test_json_as_typed_decode() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Status {
            ok: bool,
        }

        let out = output_with_stdout(r#"{"ok": true}"#);
        assert_eq!(out.json_as::<Status>(), Status { ok: true });
    }

    #[test]
    fn test_yaml_view_parses_documents() {
        let out = output_with_stdout("ok: true\ncount: 2\n");
        let doc = out.yaml();
        assert_eq!(doc["ok"], serde_yaml::Value::Bool(true));
    }

    #[test]
    fn test_yaml_view_null_on_empty_stdout() {
        assert_eq!(output_with_stdout("").yaml(), serde_yaml::Value::Null);
        assert_eq!(output_with_stdout("   \n").yaml(), serde_yaml::Value::Null);
    }

    #[test]
    fn test_yaml_view_null_on_malformed_input() {
        let out = output_with_stdout("[unclosed sequence");
        assert_eq!(out.yaml(), serde_yaml::Value::Null);
    }

    #[test]
    fn test_yaml_view_null_when_stdout_not_captured() {
        let out = RunOutput::new("sometool".to_string(), 0, None, None);
        assert_eq!(out.yaml(), serde_yaml::Value::Null);
    }
}

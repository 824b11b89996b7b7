use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::config::{HarnessConfig, FORCED_LANG};
use crate::error::{HarnessError, Result};
use crate::output::RunOutput;

/// Capture target for one of the invoked program's output streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capture {
    /// Capture the stream into the returned [`RunOutput`] (default)
    #[default]
    Piped,
    /// Let the stream pass through to the test runner's output
    Inherit,
    /// Discard the stream
    Null,
}

impl Capture {
    fn to_stdio(self) -> Stdio {
        match self {
            Capture::Piped => Stdio::piped(),
            Capture::Inherit => Stdio::inherit(),
            Capture::Null => Stdio::null(),
        }
    }
}

/// Entry point for running the program under test
///
/// A `Harness` holds the session configuration and hands out
/// [`Invocation`] builders. Execution is synchronous and blocking: the
/// calling test suspends until the subprocess exits. Timeouts are not
/// owned at this layer.
///
/// # Examples
///
/// ```rust,no_run
/// use cli_harness_rs::Harness;
///
/// let harness = Harness::new("sometool");
/// let out = harness.invoke(["--version"]).run();
/// assert!(out.success());
/// ```
#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    /// Create a harness for the given program with default configuration
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            config: HarnessConfig::new(program),
        }
    }

    /// Create a harness from an existing configuration
    pub fn with_config(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// The session configuration backing this harness
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Build an invocation of the program under test
    ///
    /// Unless [`Invocation::bare`] is set, the configured program name is
    /// prefixed onto `args` at execution time, so callers pass only the
    /// subcommand and flags.
    pub fn invoke<I, S>(&self, args: I) -> Invocation<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            config: &self.config,
            args: args.into_iter().map(Into::into).collect(),
            bare: false,
            check: true,
            shell: false,
            env: Vec::new(),
            current_dir: None,
            stdout: Capture::Piped,
            stderr: Capture::Piped,
        }
    }
}

/// One command execution request: caller arguments plus harness defaults
///
/// Defaults applied unless overridden:
/// - the configured program name is prefixed onto the arguments
/// - both streams are captured ([`Capture::Piped`])
/// - a nonzero exit code is harness-fatal (`check` enabled)
/// - the caller's environment overrides are merged over the ambient
///   process environment, with `LANG` forced last
#[derive(Debug)]
pub struct Invocation<'a> {
    config: &'a HarnessConfig,
    args: Vec<String>,
    bare: bool,
    check: bool,
    shell: bool,
    env: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
    stdout: Capture,
    stderr: Capture,
}

impl Invocation<'_> {
    /// Treat the argument list as a complete command line; do not prefix
    /// the configured program name
    pub fn bare(mut self) -> Self {
        self.bare = true;
        self
    }

    /// Enable or disable fail-on-nonzero-exit (default: enabled)
    ///
    /// Tests that assert on a failing invocation pass `check(false)` and
    /// inspect [`RunOutput::exit_code`] themselves.
    pub fn check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Run the command line through `sh -c` instead of spawning the
    /// program directly
    ///
    /// Arguments are joined with spaces, so shell metacharacters become
    /// significant. Only for tests that genuinely need shell
    /// interpretation (globbing, pipes); the default argument-array path
    /// avoids quoting hazards.
    pub fn shell(mut self) -> Self {
        self.shell = true;
        self
    }

    /// Set one environment variable for the invocation
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Merge a map of environment variables into the invocation
    pub fn envs(mut self, vars: HashMap<String, String>) -> Self {
        self.env.extend(vars);
        self
    }

    /// Set the working directory for the invocation
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Override the stdout capture target
    pub fn stdout(mut self, capture: Capture) -> Self {
        self.stdout = capture;
        self
    }

    /// Override the stderr capture target
    pub fn stderr(mut self, capture: Capture) -> Self {
        self.stderr = capture;
        self
    }

    /// Execute the invocation and return its decorated result
    ///
    /// # Panics
    ///
    /// Harness-fatal conditions panic with a diagnostic embedding the
    /// command line and both captured streams: an empty argument list, a
    /// program that could not be spawned, captured output that is not
    /// UTF-8, or a nonzero exit code while `check` is enabled.
    pub fn run(self) -> RunOutput {
        match self.try_run() {
            Ok(output) => output,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible twin of [`run`](Self::run)
    ///
    /// # Errors
    ///
    /// Returns the same conditions [`run`](Self::run) panics on.
    pub fn try_run(self) -> Result<RunOutput> {
        if self.args.is_empty() {
            return Err(HarnessError::EmptyInvocation);
        }

        let mut full_args = Vec::with_capacity(self.args.len() + 1);
        if !self.bare {
            full_args.push(self.config.program.clone());
        }
        full_args.extend(self.args);

        let command_line = full_args.join(" ");
        debug!(command = %command_line, shell = self.shell, "spawning command");

        let mut command = if self.shell {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&command_line);
            c
        } else {
            let mut c = Command::new(&full_args[0]);
            c.args(&full_args[1..]);
            c
        };

        // Overrides merge over the inherited ambient environment; LANG
        // is forced last so captured output is locale-stable.
        command.envs(self.env);
        command.env("LANG", FORCED_LANG);

        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        command
            .stdin(Stdio::null())
            .stdout(self.stdout.to_stdio())
            .stderr(self.stderr.to_stdio());

        let raw = command
            .output()
            .map_err(|source| HarnessError::spawn(&command_line, source))?;

        let exit_code = raw.status.code().unwrap_or(-1);
        let stdout = match self.stdout {
            Capture::Piped => Some(String::from_utf8(raw.stdout)?),
            _ => None,
        };
        let stderr = match self.stderr {
            Capture::Piped => Some(String::from_utf8(raw.stderr)?),
            _ => None,
        };

        if self.check && !raw.status.success() {
            return Err(HarnessError::NonZeroExit {
                command: command_line,
                code: exit_code,
                stdout: stdout.unwrap_or_default(),
                stderr: stderr.unwrap_or_default(),
            });
        }

        Ok(RunOutput::new(command_line, exit_code, stdout, stderr))
    }
}

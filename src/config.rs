use std::path::PathBuf;

use crate::error::{HarnessError, Result};

/// Directory where tests under the harness accumulate output artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "test/integration/artifacts";

/// Locale forced into every invocation's environment so captured output
/// is stable across machines
pub const FORCED_LANG: &str = "en_US.UTF-8";

/// Environment variable set by parallel test runners on each worker.
/// Its presence means artifact cleanup must be skipped: there is no safe
/// way to know when the last worker has finished.
pub const PARALLEL_WORKER_VAR: &str = "HARNESS_PARALLEL_WORKER";

/// Configuration for a test harness session
///
/// One `HarnessConfig` describes how every invocation in a session is
/// built: which program gets prefixed onto argument lists, where shared
/// artifacts live, and whether this process is one of several parallel
/// test workers. Ambient environment inspection happens only in
/// [`HarnessConfig::from_env`], at session start; everything downstream
/// reads the explicit flags carried here.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Invocation name of the program under test
    pub program: String,
    /// Directory removed at session teardown (unless `parallel_worker`)
    pub artifacts_dir: PathBuf,
    /// True when running under a parallel-worker test distribution
    pub parallel_worker: bool,
}

impl HarnessConfig {
    /// Create a configuration with harness defaults for the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            parallel_worker: false,
        }
    }

    /// Create a configuration, detecting parallel-worker execution from
    /// the ambient environment
    ///
    /// This is the single place the harness consults
    /// [`PARALLEL_WORKER_VAR`]; call it once at session start and thread
    /// the resulting config through.
    pub fn from_env(program: impl Into<String>) -> Self {
        let mut config = Self::new(program);
        config.parallel_worker = std::env::var_os(PARALLEL_WORKER_VAR).is_some();
        config
    }

    /// Create a new configuration builder
    pub fn builder(program: impl Into<String>) -> HarnessConfigBuilder {
        HarnessConfigBuilder {
            config: Self::new(program),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the program name is empty.
    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(HarnessError::Configuration(
                "program name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`HarnessConfig`] instances with fluent configuration
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Override the artifacts directory
    pub fn artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.artifacts_dir = dir.into();
        self
    }

    /// Mark this session as one of several parallel workers
    pub fn parallel_worker(mut self, parallel: bool) -> Self {
        self.config.parallel_worker = parallel;
        self
    }

    /// Build the final configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn build(self) -> Result<HarnessConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

//! Test-execution harness for command-line programs.
//!
//! This crate turns "run this command with these options" into a uniform,
//! inspectable result object for integration tests. It handles:
//! - Executing a target program with harness-wide defaults (program-name
//!   prefixing, stream capture, forced locale, fail-on-nonzero-exit)
//! - Decorating the raw result with lazy JSON/YAML views over stdout
//! - Probing for an installed container runtime before dependent tests
//! - Cleaning up the shared artifacts directory between sessions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cli_harness_rs::Harness;
//!
//! let harness = Harness::new("sometool");
//!
//! // `sometool --version` with capture and fail-on-error enabled
//! let out = harness.invoke(["--version"]).run();
//! assert!(out.success());
//!
//! // Structured assertion over stdout
//! let doc = harness.invoke(["status", "--format", "json"]).run().json();
//! assert_eq!(doc["ok"], serde_json::json!(true));
//! ```
//!
//! A nonzero exit code (unless `check(false)` is set) and malformed JSON
//! under `json()` are harness-fatal: they panic with a diagnostic that
//! embeds the command line and both captured streams, aborting the test
//! at the point of detection. The YAML view degrades to `Null` instead.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod output;
pub mod probe;
pub mod runner;


// Re-export commonly used types
pub use artifacts::ArtifactCleanup;
pub use config::{HarnessConfig, HarnessConfigBuilder};
pub use error::{HarnessError, Result};
pub use output::RunOutput;
pub use probe::{installed_runtime, require_runtime, runtime_available};
pub use runner::{Capture, Harness, Invocation};

/// Version information for the harness
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

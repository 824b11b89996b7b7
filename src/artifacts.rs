use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::HarnessConfig;

/// Session-teardown guard for the shared artifacts directory
///
/// Construct one at session start and let it drop at teardown; the drop
/// removes the configured artifacts directory recursively. When the
/// session runs as one of several parallel test workers the guard does
/// nothing, because no worker can know it is the last one to finish.
///
/// Removal is idempotent: a missing directory is a no-op, and any other
/// teardown I/O failure is logged rather than raised so it cannot mask
/// the test outcome.
#[derive(Debug)]
pub struct ArtifactCleanup {
    dir: PathBuf,
    enabled: bool,
}

impl ArtifactCleanup {
    /// Create a cleanup guard from the session configuration
    ///
    /// The parallel-worker decision comes from
    /// [`HarnessConfig::parallel_worker`], threaded in explicitly rather
    /// than read from the ambient environment here.
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            dir: config.artifacts_dir.clone(),
            enabled: !config.parallel_worker,
        }
    }

    /// Whether this guard will remove anything at teardown
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn remove(&self) {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => debug!(dir = %self.dir.display(), "removed artifacts directory"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(dir = %self.dir.display(), error = %err, "failed to remove artifacts directory");
            }
        }
    }
}

impl Drop for ArtifactCleanup {
    fn drop(&mut self) {
        if self.enabled {
            self.remove();
        }
    }
}

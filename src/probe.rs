use std::io;
use std::process::{Command, Stdio};

use once_cell::sync::OnceCell;
use tracing::warn;

/// Container runtimes the harness knows about, in priority order
pub const RUNTIME_CANDIDATES: [&str; 2] = ["podman", "docker"];

static AVAILABILITY: OnceCell<RuntimeAvailability> = OnceCell::new();

/// Session-scoped fact: which container runtimes are invocable
///
/// Computed once per test process and cached; probing spawns a version
/// query per candidate, which is not something every test should repeat.
#[derive(Debug, Clone)]
struct RuntimeAvailability {
    present: Vec<(&'static str, bool)>,
}

impl RuntimeAvailability {
    fn detect() -> Self {
        let present = RUNTIME_CANDIDATES
            .iter()
            .map(|&name| {
                let found = is_invocable(name);
                if !found {
                    warn!(runtime = name, "container runtime not available");
                }
                (name, found)
            })
            .collect();
        Self { present }
    }

    fn all_present(&self) -> bool {
        self.present.iter().all(|&(_, found)| found)
    }

    fn first_present(&self) -> Option<&'static str> {
        self.present
            .iter()
            .find(|&&(_, found)| found)
            .map(|&(name, _)| name)
    }
}

fn availability() -> &'static RuntimeAvailability {
    AVAILABILITY.get_or_init(RuntimeAvailability::detect)
}

/// Whether a single runtime executable can be invoked
///
/// "Executable not found" is the only outcome treated as absence; a
/// runtime that resolves on `PATH` and spawns counts as present even if
/// its version query exits nonzero.
fn is_invocable(name: &str) -> bool {
    if which::which(name).is_err() {
        return false;
    }
    match Command::new(name)
        .arg("-v")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => true,
        Err(err) => err.kind() != io::ErrorKind::NotFound,
    }
}

/// First invocable candidate from `candidates`, in the given order
///
/// Uncached building block behind [`installed_runtime`]; exposed for
/// callers probing a non-default runtime list.
pub fn first_available<'a>(candidates: &'a [&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|name| is_invocable(name))
}

/// Non-fatal probe: are all known container runtimes available?
///
/// Emits one `tracing` warning per missing runtime on the first call;
/// the result is cached for the rest of the session. Informational only,
/// never fails the session.
pub fn runtime_available() -> bool {
    availability().all_present()
}

/// Blocking probe: the first available runtime in priority order
///
/// Returns `None` when no runtime is installed, in which case the
/// dependent test should return early (skip) rather than fail.
pub fn installed_runtime() -> Option<&'static str> {
    availability().first_present()
}

/// Like [`installed_runtime`], but harness-fatal when nothing is found
///
/// # Panics
///
/// Panics when no container runtime is available. Intended for tests
/// that are meaningless without one and want the missing precondition
/// reported loudly.
pub fn require_runtime() -> &'static str {
    match installed_runtime() {
        Some(runtime) => runtime,
        None => panic!("no container runtime is available"),
    }
}

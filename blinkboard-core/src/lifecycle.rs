//! Process-wide termination hooks, registered once at startup.

use std::io;
use std::panic;
use std::process::ExitCode;

use thiserror::Error;
use tracing::error;

const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Signal-initiated shutdown or end of input.
    Shutdown,
    /// Uncaught fault or unrecoverable I/O failure.
    Fault,
}

impl Termination {
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Shutdown => 0,
            Termination::Fault => 1,
        }
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.exit_code())
    }
}

impl From<Termination> for ExitCode {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::Shutdown => ExitCode::SUCCESS,
            Termination::Fault => ExitCode::FAILURE,
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        #[source]
        source: io::Error,
    },

    /// The listener thread could not be started.
    #[error("failed to start signal listener: {source}")]
    Spawn {
        #[source]
        source: io::Error,
    },
}

/// Any panic, on any thread, is logged and ends the process with a fault.
///
/// The previously installed hook still runs, so the fault reaches stderr even
/// when logging is filtered out.
pub fn install_fault_hook() {
    let report = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        error!(target: LIFECYCLE_TARGET, fault = %info, "uncaught fault");
        report(info);
        Termination::Fault.exit();
    }));
}

/// Spawns a thread that exits cleanly on SIGINT or SIGTERM.
///
/// Handlers are registered before this returns, so a signal delivered after
/// the call is never lost.
#[cfg(unix)]
pub fn spawn_signal_listener() -> Result<(), LifecycleError> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;
    use tracing::info;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).map_err(|source| LifecycleError::Install { source })?;

    std::thread::Builder::new()
        .name("signal-listener".into())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                info!(target: LIFECYCLE_TARGET, signal, "backend shutting down");
                Termination::Shutdown.exit();
            }
        })
        .map(|_| ())
        .map_err(|source| LifecycleError::Spawn { source })
}

// Ctrl+C keeps the platform default behaviour here.
#[cfg(not(unix))]
pub fn spawn_signal_listener() -> Result<(), LifecycleError> {
    tracing::debug!(target: LIFECYCLE_TARGET, "signal listener not supported on this platform");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(Termination::Shutdown.exit_code(), 0);
        assert_eq!(Termination::Fault.exit_code(), 1);
    }

    #[test]
    fn converts_to_exit_code() {
        assert_eq!(ExitCode::from(Termination::Shutdown), ExitCode::SUCCESS);
        assert_eq!(ExitCode::from(Termination::Fault), ExitCode::FAILURE);
    }

    // Set when this test binary is re-run to host a fault.
    const FAULT_CHILD_ENV: &str = "BLINKBOARD_FAULT_CHILD";
    const FAULT_TEXT: &str = "breadboard short circuit";

    fn is_fault_child() -> bool {
        std::env::var_os(FAULT_CHILD_ENV).is_some()
    }

    fn panic_on_helper_thread() {
        install_fault_hook();
        let _ = std::thread::spawn(|| panic!("{FAULT_TEXT}")).join();
    }

    fn run_fault_child(test_name: &str) -> std::process::Output {
        let exe = std::env::current_exe().expect("test binary path");
        std::process::Command::new(exe)
            .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
            .env(FAULT_CHILD_ENV, "1")
            .output()
            .expect("run fault child")
    }

    #[test]
    fn fault_on_helper_thread_exits_with_failure() {
        if is_fault_child() {
            crate::telemetry::initialise(&crate::config::Config::default())
                .expect("install telemetry");
            panic_on_helper_thread();
            return;
        }

        let output = run_fault_child("lifecycle::tests::fault_on_helper_thread_exits_with_failure");
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
        assert!(stderr.contains("uncaught fault"), "stderr: {stderr}");
        assert!(stderr.contains(FAULT_TEXT), "stderr: {stderr}");
    }

    #[test]
    fn fault_is_printed_without_telemetry() {
        if is_fault_child() {
            panic_on_helper_thread();
            return;
        }

        let output = run_fault_child("lifecycle::tests::fault_is_printed_without_telemetry");
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
        assert!(stderr.contains(FAULT_TEXT), "stderr: {stderr}");
    }
}

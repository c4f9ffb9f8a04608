use std::time::Instant;

use once_cell::sync::Lazy;
use serde::Serialize;

static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// Snapshot returned by the `getStatus` command.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StatusReport {
    /// Seconds since the process started.
    pub uptime: f64,
    pub memory: MemoryUsage,
    pub platform: &'static str,
    /// The UI reads the runtime version under this key.
    #[serde(rename = "nodeVersion")]
    pub node_version: String,
}

/// Resident and virtual size in bytes, `None` where the host does not expose them.
#[derive(Debug, Serialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    pub rss: Option<u64>,
    #[serde(rename = "virtual")]
    pub virtual_size: Option<u64>,
}

/// Pins the uptime origin. Called once at startup.
pub fn mark_started() {
    Lazy::force(&STARTED_AT);
}

pub fn snapshot() -> StatusReport {
    StatusReport {
        uptime: STARTED_AT.elapsed().as_secs_f64(),
        memory: memory_usage(),
        platform: platform(),
        node_version: runtime_version(),
    }
}

/// Platform names as the UI already knows them.
pub fn platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

fn runtime_version() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(target_os = "linux")]
fn memory_usage() -> MemoryUsage {
    match std::fs::read_to_string("/proc/self/status") {
        Ok(text) => parse_proc_status(&text),
        Err(error) => {
            tracing::debug!(%error, "process memory unavailable");
            MemoryUsage::default()
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn memory_usage() -> MemoryUsage {
    MemoryUsage::default()
}

// VmRSS / VmSize lines are reported in kB.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_status(text: &str) -> MemoryUsage {
    let mut usage = MemoryUsage::default();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let bytes = value
            .split_whitespace()
            .next()
            .and_then(|kb| kb.parse::<u64>().ok())
            .and_then(|kb| kb.checked_mul(1024));

        match key {
            "VmRSS" => usage.rss = bytes,
            "VmSize" => usage.virtual_size = bytes,
            _ => {}
        }
    }

    usage
}

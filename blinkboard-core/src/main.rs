use std::io;
use std::process::ExitCode;

use tracing::{error, info};

mod config;
mod lifecycle;
mod model;
mod protocol;
mod services;
mod telemetry;

use lifecycle::Termination;

fn main() -> ExitCode {
    services::status::mark_started();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("blinkboard-core: {error}");
            return Termination::Fault.into();
        }
    };

    if let Err(error) = telemetry::initialise(&config) {
        eprintln!("blinkboard-core: {error}");
        return Termination::Fault.into();
    }

    lifecycle::install_fault_hook();
    if let Err(error) = lifecycle::spawn_signal_listener() {
        error!(%error, "cannot watch for shutdown signals");
        return Termination::Fault.into();
    }

    info!("BlinkBoard backend started");
    info!("waiting for commands");

    let stdin = io::stdin();
    let stdout = io::stdout();

    match protocol::stream::serve(stdin.lock(), stdout.lock()) {
        Ok(answered) => {
            info!(answered, "input closed, backend exiting");
            Termination::Shutdown.into()
        }
        Err(error) => {
            error!(%error, "request stream failed");
            Termination::Fault.into()
        }
    }
}

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use devbot::cli::{self, Cli};
use devbot::ui::output;

/// Log filter override, e.g. `DEVBOT_LOG=devbot=trace`.
const LOG_ENV: &str = "DEVBOT_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_logging(cli.debug);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(debug: bool) {
    let fallback = if debug { "devbot=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

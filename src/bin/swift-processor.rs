//! The processor binary: loads configuration, wires the runtime, and runs
//! the processing, status, command and generator tasks until interrupted.
//!
//! Exit codes: 0 clean stop, 1 fatal configuration error, 2 fatal
//! unrecoverable runtime error.

use std::process::ExitCode;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use swift_processor::config::AppConfig;
use swift_processor::runtime::Runtime;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_arg = std::env::args().nth(1);
    let config = match AppConfig::resolve(config_arg.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "configuration error");
            return ExitCode::from(1);
        }
    };

    let runtime = match Runtime::from_config(config) {
        Ok(runtime) => Arc::new(runtime),
        Err(err) => {
            error!(error = %err, "configuration error");
            return ExitCode::from(1);
        }
    };

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
                shutdown.cancel();
            }
        });
    }

    match runtime.run(shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "unrecoverable runtime error");
            ExitCode::from(2)
        }
    }
}

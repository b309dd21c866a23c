use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use pythia_http_server::HttpServerError;
use tracing_subscriber::EnvFilter;

use pythia_lsp::{serve, Backend, PythiaEngine};

/// HTTP front-end for Python code completion and syntax diagnostics.
#[derive(Debug, Parser)]
#[command(name = "pythia-lsp", version)]
struct Args {
    /// Address to bind.
    #[arg(long, env = "PYTHIA_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PYTHIA_PORT", default_value_t = 8000)]
    port: u16,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), HttpServerError> {
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| HttpServerError::new(format!("invalid listen address: {err}")))?;

    let backend = Arc::new(Backend::new(Arc::new(PythiaEngine::new())));
    let server = serve(addr, backend)?;
    tracing::info!(%addr, "pythia-lsp listening");

    let handle = server.runtime_handle();
    handle
        .block_on(tokio::signal::ctrl_c())
        .map_err(|err| HttpServerError::new(format!("failed to wait for ctrl-c: {err}")))?;
    tracing::info!("shutting down");
    server.stop()
}

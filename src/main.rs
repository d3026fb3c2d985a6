use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod feed;
mod handler;
mod http;
mod logger;
mod server;
mod upload;
mod view;

/// Minimal web bulletin board
#[derive(Parser)]
#[command(name = "feedboard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file path without extension (`config` loads `config.toml`)
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::Config::load_from(&cli.config)?;
    logger::init(&cfg)?;

    // Tokio runtime; worker count from config, CPU cores by default
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Uploads are written here; make sure it exists before the first request
    tokio::fs::create_dir_all(&cfg.board.upload_dir).await?;

    let listener = server::create_listener(addr)?;
    let state = Arc::new(config::AppState::new(&cfg));
    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown))?;

    // Connections are served with spawn_local, one request at a time per task
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, shutdown))
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_flag() {
        let cli = Cli::try_parse_from(["feedboard"]).unwrap();
        assert_eq!(cli.config, "config");

        let cli = Cli::try_parse_from(["feedboard", "-c", "board"]).unwrap();
        assert_eq!(cli.config, "board");

        let cli = Cli::try_parse_from(["feedboard", "--config", "/etc/board"]).unwrap();
        assert_eq!(cli.config, "/etc/board");
    }

    #[test]
    fn test_unknown_argument() {
        assert!(Cli::try_parse_from(["feedboard", "-c"]).is_err());
        assert!(Cli::try_parse_from(["feedboard", "--port", "80"]).is_err());
    }
}

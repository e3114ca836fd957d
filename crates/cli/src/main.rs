// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use roost::command::{self, Command};
use roost::config::Config;

#[derive(Debug, Parser)]
#[command(name = "roost", version, about = "Credential keeper for the Beds24 API")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    // reqwest carries no TLS provider of its own; install ring before any
    // client is built.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();

    if let Err(e) = cli.config.validate() {
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    init_tracing(&cli.config);

    std::process::exit(command::run(&cli.config, &cli.command).await);
}

// Logs go to stderr so `roost token` stays pipeable.
fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.log_format.as_str() {
        "json" => {
            fmt::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            fmt::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

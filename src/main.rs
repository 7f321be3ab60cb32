// src/main.rs
use std::process::exit;
use clap::Parser;
use tracing::{debug, Level};

use makes::cli::{execute_command, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    debug!("Verbose mode enabled");

    match execute_command(&args).await {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    }
}

use clap::Parser;
use colored::Colorize;
use std::io::{self, Write};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod client;
mod config;
mod output;

use cli::Cli;
use client::{ApiError, API_KEY_ENV};

fn init_logging(verbose: bool) {
    let default = if verbose { "usda_fas=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ApiError>()
        .map(ApiError::exit_code)
        .unwrap_or(1)
}

fn report<W: Write>(out: &mut W, err: &anyhow::Error) -> io::Result<()> {
    writeln!(out, "{} {:#}", "Error:".red().bold(), err)?;
    if let Some(ApiError::MissingApiKey) = err.downcast_ref::<ApiError>() {
        writeln!(
            out,
            "  Please set it using: export {}='your_api_key'",
            API_KEY_ENV
        )?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = cli.run().await {
        let _ = report(&mut io::stderr(), &err);
        std::process::exit(exit_code(&err));
    }
}

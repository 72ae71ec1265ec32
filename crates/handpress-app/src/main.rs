// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Handpress — typed or scanned documents rewritten as handwriting.
//
// Entry point. Initialises logging, reads the credential from the environment
// (optionally via `.env`), builds the configuration and runs the pipeline.

mod cli;
mod services;

use std::process::ExitCode;

use clap::Parser;
use handpress_core::ApiKey;
use handpress_core::error::Result;

use cli::Cli;
use services::{Pipeline, RunSummary};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // A missing .env is normal; the variables may come from the shell.
    if dotenv::dotenv().is_ok() {
        tracing::debug!("Loaded environment from .env");
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(Some(summary)) => {
            tracing::info!(
                source = %summary.source_kind,
                words = summary.words,
                pages = summary.pages_written,
                pdf = ?summary.pdf_path,
                "Conversion finished"
            );
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Conversion failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Option<RunSummary>> {
    let print_config = cli.print_config;
    let config = cli.into_config()?;

    if print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(None);
    }

    tracing::info!(input = %config.input_path.display(), "Handpress starting");
    let pipeline = Pipeline::new(config, ApiKey::from_env());
    pipeline.run().map(Some)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// FARO command-line front-end for the blockchain certificate registry.
//
// Entry point. Initialises logging, loads services and the stored session,
// runs one command, then persists the session again.

mod cli;
mod pages;
mod services;
mod state;

use std::process::ExitCode;

use clap::Parser;
use faro_core::alerts::Severity;
use faro_core::types::LoginSurface;

use cli::Cli;
use services::app_services::AppServices;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("FARO starting");

    let services = match AppServices::init(cli.api_url) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "service initialisation failed");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = pages::run(&services, cli.command).await;

    // 401 responses clear the session, so persist after failures as well.
    if let Err(e) = services.persist_session() {
        tracing::warn!(error = %e, "failed to persist session");
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            tracing::debug!(error = %failure.error, "command failed");
            let alert = failure.alert();
            eprintln!("Error: {}", alert.message);
            if let Severity::SignInRequired(surface) = alert.severity {
                let command = match surface {
                    LoginSurface::Issuer => "faro login",
                    LoginSurface::Student => "faro student login",
                };
                eprintln!("Sign in again with `{command}`.");
            }
            ExitCode::FAILURE
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page: show or edit `config.json`.

use faro_core::AppConfig;
use faro_core::error::FaroError;

use super::{OrAlert, PageResult};
use crate::cli::ConfigArgs;
use crate::services::app_services::AppServices;

pub fn run(services: &AppServices, args: ConfigArgs) -> PageResult {
    if args.is_empty() {
        print_config(services.config());
        println!("Data directory:  {}", services.data_dir().display());
        return Ok(());
    }

    if args.timeout == Some(0) {
        return Err(FaroError::InvalidInput(
            "Timeout must be at least one second".into(),
        ))
        .or_alert("Failed to save settings");
    }

    let saved = services
        .update_config(|config| apply(config, args))
        .or_alert("Failed to save settings")?;
    println!("Settings saved");
    print_config(&saved);
    Ok(())
}

fn apply(config: &mut AppConfig, args: ConfigArgs) {
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }
    if let Some(origin) = args.public_origin {
        config.public_origin = origin;
    }
    if let Some(secs) = args.timeout {
        config.request_timeout_secs = secs;
    }
    if let Some(dir) = args.downloads_dir {
        config.downloads_dir = Some(dir);
    }
    if let Some(viewer) = args.viewer {
        config.viewer_command = Some(viewer).filter(|v| !v.trim().is_empty());
    }
}

fn print_config(config: &AppConfig) {
    println!("API base URL:    {}", config.api_base_url);
    println!("Public origin:   {}", config.public_origin);
    println!("Timeout:         {}s", config.request_timeout_secs);
    println!(
        "Downloads:       {}",
        config
            .downloads_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "(data directory)".into())
    );
    println!(
        "Viewer:          {}",
        config.viewer_command.as_deref().unwrap_or("(system default)")
    );
}

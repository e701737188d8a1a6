// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer. Loads configuration and the stored session, then
// hands the API client, the certificate renderer and file delivery to the
// command pages.

use std::path::{Path, PathBuf};

use faro_client::ApiClient;
use faro_core::AppConfig;
use faro_core::error::Result;
use faro_core::types::CertificateRenderRequest;
use faro_document::{
    CertificateRenderer, DirectorySink, DownloadSink, TempFileHost, download_certificate,
    view_certificate,
};
use tracing::info;

use super::data_dir;
use crate::state;

/// Everything a command needs, built once per run.
pub struct AppServices {
    api: ApiClient,
    renderer: CertificateRenderer,
    config: AppConfig,
    data_dir: PathBuf,
}

impl AppServices {
    /// Initialise services. `api_url` overrides the configured API base URL.
    pub fn init(api_url: Option<String>) -> Result<Self> {
        let dir = data_dir::data_dir()?;
        info!(path = %dir.display(), "initialising app services");

        let mut config = AppConfig::load(&dir)?;
        if let Some(url) = api_url {
            config.api_base_url = url;
        }

        let session = state::load_session(&dir);
        let api = ApiClient::from_config(&config, session)?;
        let renderer = CertificateRenderer::new(config.public_origin.clone());

        info!(api = %api.base_url(), signed_in = api.session().token().is_some(), "app services initialised");
        Ok(Self {
            api,
            renderer,
            config,
            data_dir: dir,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Effective configuration, with environment and flag overrides applied.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Apply `change` to the stored configuration file and write it back.
    ///
    /// Works on the file as written, so overrides active for this run are not
    /// persisted. Takes effect from the next run.
    pub fn update_config(&self, change: impl FnOnce(&mut AppConfig)) -> Result<AppConfig> {
        let mut stored = AppConfig::load_stored(&self.data_dir)?;
        change(&mut stored);
        stored.save(&self.data_dir)?;
        info!(path = %self.data_dir.display(), "configuration saved");
        Ok(stored)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Save the session for the next run.
    pub fn persist_session(&self) -> Result<()> {
        state::save_session(&self.data_dir, self.api.session())
    }

    /// Configured downloads directory, else `<data dir>/downloads`.
    pub fn downloads_dir(&self) -> PathBuf {
        self.config
            .downloads_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("downloads"))
    }

    // -- Delivery --------------------------------------------------------------

    /// Render `request` and open it in the configured viewer.
    pub async fn view(&self, request: &CertificateRenderRequest) -> Result<()> {
        let host = TempFileHost::new(self.config.viewer_command.as_deref())?;
        view_certificate(&self.renderer, &host, request).await
    }

    /// Render `request` into the downloads directory.
    pub async fn download(&self, request: &CertificateRenderRequest) -> Result<PathBuf> {
        let sink = DirectorySink::new(self.downloads_dir());
        download_certificate(&self.renderer, &sink, request).await
    }

    /// Save arbitrary bytes under `file_name` in `dir` (downloads directory
    /// when `None`).
    pub fn save_file(&self, dir: Option<&Path>, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let sink = DirectorySink::new(dir.map(Path::to_path_buf).unwrap_or_else(|| self.downloads_dir()));
        sink.save(file_name, bytes)
    }
}

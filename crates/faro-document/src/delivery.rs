// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate delivery: open a rendered certificate in a viewer, or save it
// under a generated file name.
//
// Viewing goes through an `ObjectUrlHost`: the bytes are published under a
// temporary URL, handed to a viewer, and the URL is released after a short
// delay whether or not the viewer could be launched. Downloads go through a
// `DownloadSink`. Both are traits so the CLI can use the filesystem while
// tests record what happened.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use faro_core::error::{FaroError, Result};
use faro_core::types::CertificateRenderRequest;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::format::dash_whitespace;
use crate::pdf::certificate::CertificateRenderer;

/// MIME type of rendered certificates.
pub const PDF_MIME: &str = "application/pdf";

/// Default time a published object URL stays alive after the viewer opens it.
pub const OBJECT_URL_RELEASE_DELAY: Duration = Duration::from_millis(100);

/// Viewer that reads from a file and needs a moment to do so.
const FILE_VIEWER_RELEASE_DELAY: Duration = Duration::from_secs(2);

/// Publishes bytes under a short-lived URL and opens it in a viewer.
#[async_trait]
pub trait ObjectUrlHost: Send + Sync {
    /// Make `bytes` reachable under a new URL.
    fn create_object_url(&self, bytes: &[u8], mime: &str) -> Result<String>;

    /// Open `url` in a viewer.
    async fn open(&self, url: &str) -> Result<()>;

    /// Release `url`. Releasing an unknown URL is a no-op.
    fn revoke_object_url(&self, url: &str);

    /// How long to keep the URL alive after `open`.
    fn release_delay(&self) -> Duration {
        OBJECT_URL_RELEASE_DELAY
    }
}

/// Stores a downloaded file.
pub trait DownloadSink: Send + Sync {
    /// Save `bytes` as `file_name`, returning where they ended up.
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Render `request` and show it in the host's viewer.
///
/// The object URL is always released after the host's delay, including when
/// the viewer fails to start; that failure is then returned.
#[instrument(skip_all, fields(certificate_id = request.certificate_id()))]
pub async fn view_certificate(
    renderer: &CertificateRenderer,
    host: &dyn ObjectUrlHost,
    request: &CertificateRenderRequest,
) -> Result<()> {
    let rendered = renderer.render(request).await?;
    let url = host.create_object_url(&rendered.bytes, PDF_MIME)?;
    debug!(%url, "certificate published");

    let opened = host.open(&url).await;
    if let Err(e) = &opened {
        warn!(error = %e, "viewer failed to open certificate");
    }

    tokio::time::sleep(host.release_delay()).await;
    host.revoke_object_url(&url);

    opened
}

/// Render `request` and save it through `sink` as
/// `certificate-<student name>-<unix millis>.pdf`.
#[instrument(skip_all, fields(certificate_id = request.certificate_id()))]
pub async fn download_certificate(
    renderer: &CertificateRenderer,
    sink: &dyn DownloadSink,
    request: &CertificateRenderRequest,
) -> Result<PathBuf> {
    let rendered = renderer.render(request).await?;
    let file_name = certificate_file_name(request.student_name(), Utc::now().timestamp_millis());
    let path = sink.save(&file_name, &rendered.bytes)?;
    info!(path = %path.display(), bytes = rendered.bytes.len(), "certificate saved");
    Ok(path)
}

/// `certificate-<name with whitespace runs dashed>-<timestamp_ms>.pdf`, with
/// `unknown` standing in for a missing or empty name. Leading and trailing
/// whitespace is dashed like any other run.
pub fn certificate_file_name(student_name: Option<&str>, timestamp_ms: i64) -> String {
    let name = student_name
        .filter(|n| !n.is_empty())
        .map(dash_whitespace)
        .unwrap_or_else(|| "unknown".into());
    // Keep the result a single path component.
    let name = name.replace(['/', '\\'], "_");
    format!("certificate-{name}-{timestamp_ms}.pdf")
}

// ---------------------------------------------------------------------------
// Filesystem implementations
// ---------------------------------------------------------------------------

/// Publishes certificates as files in a private temporary directory and opens
/// them with an external viewer (`xdg-open` unless configured otherwise).
pub struct TempFileHost {
    dir: TempDir,
    viewer: String,
    counter: AtomicU64,
}

impl TempFileHost {
    pub fn new(viewer_command: Option<&str>) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("faro-").tempdir()?;
        Ok(Self {
            dir,
            viewer: viewer_command
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or("xdg-open")
                .to_owned(),
            counter: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    fn next_name(&self, mime: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let ext = if mime == PDF_MIME { "pdf" } else { "bin" };
        format!("object-{n}.{ext}")
    }
}

#[async_trait]
impl ObjectUrlHost for TempFileHost {
    fn create_object_url(&self, bytes: &[u8], mime: &str) -> Result<String> {
        let path = self.dir.path().join(self.next_name(mime));
        std::fs::write(&path, bytes)?;
        let url = Url::from_file_path(&path)
            .map_err(|()| FaroError::Viewer(format!("not an absolute path: {}", path.display())))?;
        Ok(url.into())
    }

    async fn open(&self, url: &str) -> Result<()> {
        let status = Command::new(&self.viewer)
            .arg(url)
            .status()
            .await
            .map_err(|e| FaroError::Viewer(format!("failed to launch '{}': {e}", self.viewer)))?;
        if status.success() {
            Ok(())
        } else {
            Err(FaroError::Viewer(format!("'{}' exited with {status}", self.viewer)))
        }
    }

    fn revoke_object_url(&self, url: &str) {
        let Some(path) = Url::parse(url).ok().and_then(|u| u.to_file_path().ok()) else {
            return;
        };
        // Only files we created.
        if !path.starts_with(self.dir.path()) {
            return;
        }
        if let Err(e) = std::fs::remove_file(&path) {
            debug!(path = %path.display(), error = %e, "object file already gone");
        }
    }

    fn release_delay(&self) -> Duration {
        FILE_VIEWER_RELEASE_DELAY
    }
}

/// Saves downloads into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| FaroError::InvalidInput(format!("invalid file name '{file_name}'")))?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

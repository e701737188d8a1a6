// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for FARO.

use thiserror::Error;

use crate::types::LoginSurface;

/// Top-level error type for all FARO operations.
#[derive(Debug, Error)]
pub enum FaroError {
    // -- API errors --
    #[error("network request failed: {0}")]
    Network(String),

    /// The API answered with a non-success status or `success: false`.
    ///
    /// `message` carries the server-provided text when the body had one.
    #[error("API request failed ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// HTTP 401. The session has already been cleared; the caller decides
    /// where to send the user.
    #[error("session expired, sign in again via the {surface} login")]
    Unauthorized { surface: LoginSurface },

    #[error("response did not contain the expected data: {0}")]
    MissingData(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The certificate exists or was looked up, but did not verify.
    #[error("{0}")]
    Unverified(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("QR code generation failed: {0}")]
    QrCode(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("could not open document viewer: {0}")]
    Viewer(String),

    // -- Storage / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FaroError {
    /// Server-provided message, if this error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FaroError>;

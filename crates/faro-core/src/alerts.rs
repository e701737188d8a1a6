// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing alert text.
//
// Every failed action is shown as one inline alert. The server's own message
// wins when the API sent one; otherwise the action supplies a generic
// fallback ("Failed to issue certificate", ...). Nothing is retried
// automatically: the user re-submits.

use crate::error::FaroError;
use crate::types::LoginSurface;

/// How the front-end should present an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The action failed; the user may re-submit.
    Error,
    /// The user must sign in again before continuing.
    SignInRequired(LoginSurface),
    /// The form input was rejected before anything was sent.
    InvalidInput,
}

/// A message ready to be shown next to the form that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
}

/// Alert text for `err`: the server-provided message, else `fallback`.
pub fn alert_message(err: &FaroError, fallback: &str) -> String {
    alert(err, fallback).message
}

/// Convert an error from a user action into an [`Alert`].
pub fn alert(err: &FaroError, fallback: &str) -> Alert {
    match err {
        FaroError::Unauthorized { surface } => Alert {
            message: "Your session has expired. Please sign in again.".into(),
            severity: Severity::SignInRequired(*surface),
        },
        FaroError::InvalidInput(detail) => Alert {
            message: detail.clone(),
            severity: Severity::InvalidInput,
        },
        FaroError::Unverified(detail) => Alert {
            message: detail.clone(),
            severity: Severity::Error,
        },
        other => Alert {
            message: other
                .server_message()
                .map(str::to_owned)
                .unwrap_or_else(|| fallback.to_owned()),
            severity: Severity::Error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins() {
        let err = FaroError::Api {
            status: 400,
            message: Some("Student already has this certificate".into()),
        };
        assert_eq!(
            alert_message(&err, "Failed to issue certificate"),
            "Student already has this certificate"
        );
    }

    #[test]
    fn missing_message_uses_fallback() {
        let err = FaroError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(
            alert_message(&err, "Failed to issue certificate"),
            "Failed to issue certificate"
        );
    }

    #[test]
    fn blank_server_message_uses_fallback() {
        let err = FaroError::Api {
            status: 500,
            message: Some("  ".into()),
        };
        assert_eq!(alert_message(&err, "Login failed"), "Login failed");
    }

    #[test]
    fn network_error_uses_fallback() {
        let err = FaroError::Network("connection refused".into());
        assert_eq!(
            alert_message(&err, "Failed to verify certificate"),
            "Failed to verify certificate"
        );
    }

    #[test]
    fn unauthorized_requires_sign_in() {
        let err = FaroError::Unauthorized {
            surface: LoginSurface::Student,
        };
        let alert = alert(&err, "Failed to load dashboard data");
        assert_eq!(alert.severity, Severity::SignInRequired(LoginSurface::Student));
    }

    #[test]
    fn failed_verification_shows_the_outcome() {
        let err = FaroError::Unverified("Certificate not found".into());
        let alert = alert(&err, "Failed to verify certificate");
        assert_eq!(alert.message, "Certificate not found");
        assert_eq!(alert.severity, Severity::Error);
    }

    #[test]
    fn invalid_input_shows_its_own_text() {
        let err = FaroError::InvalidInput("Please enter a certificate ID".into());
        let alert = alert(&err, "Failed to verify certificate");
        assert_eq!(alert.message, "Please enter a certificate ID");
        assert_eq!(alert.severity, Severity::InvalidInput);
    }
}

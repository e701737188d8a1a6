// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Student self-service: first-time password, login, own certificates,
// share links and blockchain receipts.

use faro_core::error::{FaroError, Result};
use faro_core::types::{
    BlockchainReceipt, Certificate, EmailCheck, ShareLink, Student, StudentAuth, StudentDashboard,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::api::ApiClient;
use crate::validation::{require, validate_new_password};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// `GET /students/auth/check-email/{email}`.
    #[instrument(skip(self))]
    pub async fn check_email(&self, email: &str) -> Result<EmailCheck> {
        let email = require(email, "Please enter your college email")?;
        let envelope = self
            .get::<EmailCheck>(&["students", "auth", "check-email", email], &[])
            .await?;
        if !envelope.success {
            return Err(FaroError::Api {
                status: 200,
                message: Some("Unable to check email. Please try again.".into()),
            });
        }
        envelope.into_data("check email")
    }

    /// `POST /students/auth/set-password`, after checking length and
    /// confirmation locally.
    #[instrument(skip(self, password, confirmation))]
    pub async fn set_password(&self, email: &str, password: &str, confirmation: &str) -> Result<()> {
        let email = require(email, "Please enter your college email")?;
        validate_new_password(password, confirmation)?;
        self.post::<_, Value>(
            &["students", "auth", "set-password"],
            &Credentials { email, password },
        )
        .await?
        .ensure_success()
    }

    /// `POST /students/auth/login`. Stores the student token and profile.
    #[instrument(skip(self, password))]
    pub async fn student_login(&self, email: &str, password: &str) -> Result<Student> {
        let email = require(email, "Please enter your college email")?;
        if password.is_empty() {
            return Err(FaroError::InvalidInput("Please enter your password".into()));
        }
        let auth: StudentAuth = self
            .post(&["students", "auth", "login"], &Credentials { email, password })
            .await?
            .into_data("student login")?;
        let student = auth.student.clone();
        self.session().login_student(auth);
        Ok(student)
    }

    /// Forget the student login. Local only.
    pub fn student_logout(&self) {
        self.session().logout();
    }

    /// `GET /students/dashboard`.
    #[instrument(skip(self))]
    pub async fn student_dashboard(&self) -> Result<StudentDashboard> {
        self.get(&["students", "dashboard"], &[])
            .await?
            .into_data("student dashboard")
    }

    /// `GET /students/certificate/{id}`.
    #[instrument(skip(self))]
    pub async fn student_certificate(&self, certificate_id: &str) -> Result<Certificate> {
        self.get(&["students", "certificate", certificate_id], &[])
            .await?
            .into_data("student certificate")
    }

    /// `POST /students/certificate/{id}/share`.
    #[instrument(skip(self))]
    pub async fn share_certificate(&self, certificate_id: &str) -> Result<ShareLink> {
        self.post(&["students", "certificate", certificate_id, "share"], &json!({}))
            .await?
            .into_data("share link")
    }

    /// `GET /students/public/share/{token}`. Public; no login needed.
    #[instrument(skip(self, token))]
    pub async fn shared_certificate(&self, token: &str) -> Result<Certificate> {
        let token = require(token, "Please enter a share link")?;
        let envelope = self
            .get::<Certificate>(&["students", "public", "share", token], &[])
            .await?;
        if !envelope.success {
            return Err(FaroError::Api {
                status: 200,
                message: Some("Certificate not found or link has expired".into()),
            });
        }
        envelope.into_data("shared certificate")
    }

    /// `GET /students/certificate/{id}/blockchain-receipt`.
    #[instrument(skip(self))]
    pub async fn blockchain_receipt(&self, certificate_id: &str) -> Result<BlockchainReceipt> {
        self.get(
            &["students", "certificate", certificate_id, "blockchain-receipt"],
            &[],
        )
        .await?
        .into_data("blockchain receipt")
    }
}

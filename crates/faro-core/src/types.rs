// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the FARO certificate registry.
//
// Every record mirrors the JSON the registry API returns (camelCase keys).
// Fields the API may omit are `Option` with `#[serde(default)]` so that
// partially populated records still decode.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FaroError, Result};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Which kind of account a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Issuer,
    Student,
}

/// Where a user has to go to sign in again after their session expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginSurface {
    /// Institution login (`/login`).
    Issuer,
    /// Student self-service login (`/student/auth`).
    Student,
}

impl LoginSurface {
    /// Route of the login surface in the web front-end.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Issuer => "/login",
            Self::Student => "/student/auth",
        }
    }
}

impl From<UserKind> for LoginSurface {
    fn from(kind: UserKind) -> Self {
        match kind {
            UserKind::Issuer => Self::Issuer,
            UserKind::Student => Self::Student,
        }
    }
}

impl fmt::Display for LoginSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issuer => f.write_str("issuer"),
            Self::Student => f.write_str("student"),
        }
    }
}

/// An institution account that creates and issues certificates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issuer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Approval status of the institution (e.g. "active", "pending").
    #[serde(default)]
    pub status: Option<String>,
}

/// A student record held by an issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `POST /students` and one entry of `POST /students/bulk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Certificates
// ---------------------------------------------------------------------------

/// A certificate as stored by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    /// ISO-8601 timestamp as sent by the API.
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    /// Older records carry the transaction hash under this name.
    #[serde(default)]
    pub blockchain_tx_hash: Option<String>,
    /// Content fingerprint anchored on-chain.
    #[serde(default)]
    pub certificate_hash: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "metadataURI")]
    pub metadata_uri: Option<String>,
    #[serde(default)]
    pub student: Option<Student>,
    #[serde(default)]
    pub issuer: Option<Issuer>,
}

impl Certificate {
    /// Transaction hash, falling back to the legacy field name.
    pub fn transaction(&self) -> Option<&str> {
        self.transaction_hash
            .as_deref()
            .or(self.blockchain_tx_hash.as_deref())
    }
}

/// The value the certificate renderer consumes.
///
/// All parts are optional; the renderer substitutes placeholder text for
/// anything missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRenderRequest {
    #[serde(default)]
    pub certificate: Option<Certificate>,
    #[serde(default)]
    pub student: Option<Student>,
    #[serde(default)]
    pub issuer: Option<Issuer>,
}

impl CertificateRenderRequest {
    /// Build a request from a certificate that embeds its student and issuer
    /// (the shape returned by `GET /certificates/{id}`).
    pub fn from_certificate(certificate: Certificate) -> Self {
        let student = certificate.student.clone();
        let issuer = certificate.issuer.clone();
        Self {
            certificate: Some(certificate),
            student,
            issuer,
        }
    }

    /// Build a request for a certificate shown to its own student.
    pub fn for_student(certificate: Certificate, student: Student) -> Self {
        let issuer = certificate.issuer.clone();
        Self {
            certificate: Some(certificate),
            student: Some(student),
            issuer,
        }
    }

    pub fn certificate_id(&self) -> Option<&str> {
        self.certificate
            .as_ref()
            .and_then(|c| c.id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn student_name(&self) -> Option<&str> {
        self.student
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// Body of `POST /certificates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCertificateRequest {
    pub student_id: String,
    pub course_name: String,
    pub grade: String,
    pub issue_date: DateTime<Utc>,
}

/// On-chain anchoring details returned after issuance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainAnchor {
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

/// `data` of a successful `POST /certificates`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCertificate {
    #[serde(default)]
    pub certificate: Option<Certificate>,
    #[serde(default)]
    pub blockchain: BlockchainAnchor,
}

// ---------------------------------------------------------------------------
// Bulk upload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUploadSummary {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub successful: u32,
    #[serde(default)]
    pub failed: u32,
}

/// One row of a bulk upload report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadResult {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_email: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub certificate: Option<Certificate>,
    #[serde(default)]
    pub student: Option<Student>,
}

impl BulkUploadResult {
    /// Render request for this row.
    ///
    /// Rows without a full certificate record get a synthetic one built from
    /// the row's own columns, stamped with `now` as issue date.
    pub fn render_request(&self, now: DateTime<Utc>) -> CertificateRenderRequest {
        let certificate = self.certificate.clone().unwrap_or_else(|| Certificate {
            id: self.certificate_id.clone(),
            course_name: Some("Course Name".into()),
            grade: Some("N/A".into()),
            issue_date: Some(now.to_rfc3339()),
            transaction_hash: self.transaction_hash.clone(),
            ..Certificate::default()
        });

        let embedded_issuer = certificate.issuer.clone().unwrap_or_default();
        let issuer = Issuer {
            name: embedded_issuer.name.or_else(|| Some("Institution".into())),
            email: embedded_issuer.email.or_else(|| Some(String::new())),
            ..embedded_issuer
        };

        let student = Student {
            id: None,
            name: self
                .student_name
                .clone()
                .or_else(|| self.student.as_ref().and_then(|s| s.name.clone())),
            email: self
                .student_email
                .clone()
                .or_else(|| self.student.as_ref().and_then(|s| s.email.clone())),
        };

        CertificateRenderRequest {
            certificate: Some(certificate),
            student: Some(student),
            issuer: Some(issuer),
        }
    }
}

/// `data` of `POST /certificates/bulk-upload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUploadReport {
    #[serde(default)]
    pub summary: BulkUploadSummary,
    #[serde(default)]
    pub results: Vec<BulkUploadResult>,
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub pages: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPage {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificatePage {
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Figures on the issuer dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: u64,
    pub total_certificates: u64,
    pub recent_certificates: u64,
}

// ---------------------------------------------------------------------------
// Authentication payloads
// ---------------------------------------------------------------------------

/// `data` of issuer login/register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerAuth {
    pub token: String,
    #[serde(default)]
    pub issuer: Issuer,
}

/// `data` of student login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAuth {
    pub token: String,
    #[serde(default)]
    pub student: Student,
}

/// `data` of `GET /students/auth/check-email/{email}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailCheck {
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub has_password: bool,
    #[serde(default)]
    pub name: Option<String>,
}

/// `data` of `GET /students/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDashboard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
}

// ---------------------------------------------------------------------------
// Verification & sharing
// ---------------------------------------------------------------------------

/// `data` of `POST /verification/verify-hash`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashVerification {
    #[serde(default)]
    pub valid: bool,
}

/// Result of checking a certificate id against the registry and the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Found and its hash is valid on-chain.
    Verified(Certificate),
    /// The registry does not know this id.
    NotFound,
    /// The record has no certificate hash to check.
    MissingHash(Certificate),
    /// The hash did not verify.
    Invalid(Certificate),
}

impl VerificationOutcome {
    /// Alert text shown when verification did not succeed.
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            Self::Verified(_) => None,
            Self::NotFound => Some("Certificate not found"),
            Self::MissingHash(_) => {
                Some("Certificate hash not found. This certificate cannot be verified.")
            }
            Self::Invalid(_) => Some(
                "Certificate verification failed. This certificate may not be valid on the blockchain.",
            ),
        }
    }

    /// The verified certificate, or `Unverified` carrying the alert text.
    pub fn into_verified(self) -> Result<Certificate> {
        match self {
            Self::Verified(cert) => Ok(cert),
            failed => Err(FaroError::Unverified(
                failed.failure_message().unwrap_or_default().to_owned(),
            )),
        }
    }
}

/// `data` of `POST /students/certificate/{id}/share`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub shareable_url: String,
}

// ---------------------------------------------------------------------------
// Blockchain receipt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptChain {
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub blockchain_explorer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptVerification {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "verificationURL")]
    pub verification_url: Option<String>,
    #[serde(default, rename = "shareableURL")]
    pub shareable_url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptMetadata {
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub blockchain_type: Option<String>,
    #[serde(default)]
    pub chainpoint_version: Option<String>,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub tamper_proof: bool,
}

/// `data` of `GET /students/certificate/{id}/blockchain-receipt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainReceipt {
    #[serde(default, rename = "@context")]
    pub context: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub target_hash: Option<String>,
    #[serde(default)]
    pub certificate: Certificate,
    #[serde(default)]
    pub student: Student,
    #[serde(default)]
    pub issuer: Issuer,
    #[serde(default)]
    pub blockchain: ReceiptChain,
    #[serde(default)]
    pub verification: ReceiptVerification,
    #[serde(default)]
    pub metadata: ReceiptMetadata,
    #[serde(default)]
    pub issued_at: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

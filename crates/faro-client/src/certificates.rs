// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate issuance and listings, plus the issuer dashboard figures.

use faro_core::error::{FaroError, Result};
use faro_core::types::{
    BulkUploadReport, Certificate, CertificatePage, DashboardStats, IssueCertificateRequest,
    IssuedCertificate, LoginSurface,
};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::validation::require;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateRequest<'a> {
    student_ids: &'a [String],
}

impl ApiClient {
    /// `POST /certificates`. Issues one certificate and anchors it on-chain.
    #[instrument(skip(self, request), fields(student_id = %request.student_id))]
    pub async fn issue_certificate(
        &self,
        request: &IssueCertificateRequest,
    ) -> Result<IssuedCertificate> {
        require(&request.student_id, "Please select a student")?;
        require(&request.course_name, "Please enter the course name")?;
        let issued: IssuedCertificate = self
            .post(&["certificates"], request)
            .await?
            .into_data("issue certificate")?;
        info!(
            tx = issued.blockchain.transaction_hash.as_deref(),
            "certificate issued"
        );
        Ok(issued)
    }

    /// `POST /certificates/download-template`: the spreadsheet template for
    /// bulk issuance, pre-filled with `student_ids`.
    #[instrument(skip(self, student_ids), fields(count = student_ids.len()))]
    pub async fn download_template(&self, student_ids: &[String]) -> Result<Vec<u8>> {
        self.post_for_bytes(
            &["certificates", "download-template"],
            &TemplateRequest { student_ids },
        )
        .await
    }

    /// `POST /certificates/bulk-upload` with the filled template as the
    /// multipart field `file`.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn bulk_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<BulkUploadReport> {
        if bytes.is_empty() {
            return Err(FaroError::InvalidInput("Please select a file to upload".into()));
        }
        let part = Part::bytes(bytes).file_name(file_name.to_owned());
        let form = Form::new().part("file", part);
        let report: BulkUploadReport = self
            .post_multipart(&["certificates", "bulk-upload"], form)
            .await?
            .into_data("bulk upload")?;
        info!(
            total = report.summary.total,
            successful = report.summary.successful,
            failed = report.summary.failed,
            "bulk upload processed"
        );
        Ok(report)
    }

    /// `GET /certificates/{id}`.
    #[instrument(skip(self))]
    pub async fn certificate(&self, certificate_id: &str) -> Result<Certificate> {
        self.get(&["certificates", certificate_id], &[])
            .await?
            .into_data("certificate")
    }

    /// `GET /certificates/issuer/{id}?page&limit[&status]`.
    #[instrument(skip(self))]
    pub async fn issuer_certificates(
        &self,
        issuer_id: &str,
        page: u32,
        limit: u32,
        status: Option<&str>,
    ) -> Result<CertificatePage> {
        let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(status) = status.filter(|s| !s.is_empty()) {
            params.push(("status", status.to_owned()));
        }
        self.get(&["certificates", "issuer", issuer_id], &params)
            .await?
            .into_data("issuer certificates")
    }

    /// Figures for the signed-in issuer's dashboard, from two one-item page
    /// requests sent concurrently.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let issuer_id = self
            .session()
            .current_issuer()
            .and_then(|issuer| issuer.id)
            .ok_or(FaroError::Unauthorized {
                surface: LoginSurface::Issuer,
            })?;

        let (students, certificates) = tokio::join!(
            self.list_students(1, 1),
            self.issuer_certificates(&issuer_id, 1, 1, None)
        );
        let (students, certificates) = (students?, certificates?);

        Ok(DashboardStats {
            total_students: students.pagination.total,
            total_certificates: certificates.pagination.total,
            recent_certificates: certificates.certificates.len() as u64,
        })
    }
}

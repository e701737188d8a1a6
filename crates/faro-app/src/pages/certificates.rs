// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Issuance pages: single and bulk issuance, listings, rendering.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime, Utc};
use faro_core::error::FaroError;
use faro_core::types::{CertificateRenderRequest, IssueCertificateRequest, LoginSurface};

use super::{OrAlert, PageResult, deliver, print_certificate, print_certificate_rows};
use crate::cli::DeliveryArgs;
use crate::services::app_services::AppServices;

const TEMPLATE_FILE: &str = "certificate-template.xlsx";

pub async fn issue(
    services: &AppServices,
    student_id: String,
    course_name: String,
    grade: String,
    date: Option<NaiveDate>,
    delivery: DeliveryArgs,
) -> PageResult {
    let issue_date = match date {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    };
    let issued = services
        .api()
        .issue_certificate(&IssueCertificateRequest {
            student_id,
            course_name,
            grade,
            issue_date,
        })
        .await
        .or_alert("Failed to issue certificate")?;

    println!("Certificate issued successfully");
    if let Some(tx) = issued.blockchain.transaction_hash.as_deref() {
        println!("Transaction: {tx}");
    }
    if let Some(cert) = issued.certificate {
        print_certificate(&cert);
        deliver(services, &CertificateRenderRequest::from_certificate(cert), delivery).await?;
    }
    Ok(())
}

pub async fn template(
    services: &AppServices,
    student_ids: &[String],
    output: Option<&Path>,
) -> PageResult {
    let bytes = services
        .api()
        .download_template(student_ids)
        .await
        .or_alert("Failed to download template")?;
    let path = match output {
        Some(path) => {
            std::fs::write(path, &bytes).or_alert("Failed to save template")?;
            path.to_path_buf()
        }
        None => services
            .save_file(None, TEMPLATE_FILE, &bytes)
            .or_alert("Failed to save template")?,
    };
    println!("Template saved to {}", path.display());
    Ok(())
}

pub async fn bulk_upload(services: &AppServices, file: &Path, download_all: bool) -> PageResult {
    let bytes = std::fs::read(file).or_alert("Please select a file to upload")?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(TEMPLATE_FILE);

    let report = services
        .api()
        .bulk_upload(file_name, bytes)
        .await
        .or_alert("Failed to upload certificates")?;

    println!(
        "Successfully issued {} out of {} certificates",
        report.summary.successful, report.summary.total
    );
    for row in &report.results {
        let name = row.student_name.as_deref().unwrap_or("-");
        if row.success.unwrap_or(false) {
            println!(
                "  ok    {name:<28} {}",
                row.certificate_id.as_deref().unwrap_or("-")
            );
        } else {
            println!(
                "  fail  {name:<28} {}",
                row.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if download_all {
        let now = Utc::now();
        for row in report.results.iter().filter(|r| r.success.unwrap_or(false)) {
            let path = services
                .download(&row.render_request(now))
                .await
                .or_alert("Failed to download PDF")?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

pub async fn list(
    services: &AppServices,
    page: u32,
    limit: u32,
    status: Option<&str>,
) -> PageResult {
    let issuer_id = services
        .api()
        .session()
        .current_issuer()
        .and_then(|i| i.id)
        .ok_or(FaroError::Unauthorized {
            surface: LoginSurface::Issuer,
        })
        .or_alert("Failed to fetch certificates")?;
    let listing = services
        .api()
        .issuer_certificates(&issuer_id, page, limit, status)
        .await
        .or_alert("Failed to fetch certificates")?;
    print_certificate_rows(&listing.certificates);
    let p = listing.pagination;
    println!(
        "Page {} of {} ({} certificates)",
        p.page.max(1),
        p.pages.max(1),
        p.total
    );
    Ok(())
}

/// Render from a request file or a registry id. Without `--view` the PDF is
/// saved.
pub async fn render(
    services: &AppServices,
    request_file: Option<&Path>,
    certificate_id: Option<&str>,
    delivery: DeliveryArgs,
) -> PageResult {
    let request = match (request_file, certificate_id) {
        (Some(path), _) => read_request(path).or_alert("Failed to read certificate request")?,
        (None, Some(id)) => {
            let cert = services
                .api()
                .certificate(id)
                .await
                .or_alert("Failed to fetch certificate")?;
            CertificateRenderRequest::from_certificate(cert)
        }
        (None, None) => {
            return Err(FaroError::InvalidInput(
                "Give a request file or a certificate id".into(),
            ))
            .or_alert("Failed to generate PDF");
        }
    };

    let delivery = if delivery.view {
        delivery
    } else {
        DeliveryArgs {
            view: false,
            download: true,
        }
    };
    deliver(services, &request, delivery).await
}

fn read_request(path: &Path) -> Result<CertificateRenderRequest, FaroError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

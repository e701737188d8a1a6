// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Public pages: certificate verification and shared certificates.

use faro_core::types::{Certificate, CertificateRenderRequest, VerificationOutcome};

use super::{Failure, OrAlert, PageResult, deliver, print_certificate};
use crate::cli::DeliveryArgs;
use crate::services::app_services::AppServices;

pub async fn verify(services: &AppServices, certificate_id: &str, delivery: DeliveryArgs) -> PageResult {
    let outcome = services
        .api()
        .verify_certificate(certificate_id)
        .await
        .or_alert("Failed to verify certificate")?;
    let cert = verified(outcome)?;

    println!("Certificate verified on the blockchain");
    print_certificate(&cert);
    deliver(services, &CertificateRenderRequest::from_certificate(cert), delivery).await
}

/// Anything short of a verified certificate fails the command.
fn verified(outcome: VerificationOutcome) -> Result<Certificate, Failure> {
    outcome.into_verified().or_alert("Failed to verify certificate")
}

pub async fn shared(services: &AppServices, token: &str, delivery: DeliveryArgs) -> PageResult {
    let cert = services
        .api()
        .shared_certificate(token)
        .await
        .or_alert("Failed to load certificate")?;
    print_certificate(&cert);
    deliver(services, &CertificateRenderRequest::from_certificate(cert), delivery).await
}

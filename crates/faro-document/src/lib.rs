// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// faro-document: Certificate documents for the FARO registry client.
//
// Renders certificates as one-page landscape PDFs with a verification QR code,
// delivers them to a viewer or a download directory, and formats the
// plain-text blockchain receipt.

pub mod delivery;
pub mod format;
pub mod pdf;
pub mod qr;
pub mod receipt;

// Re-export the primary entry points so callers can use `faro_document::CertificateRenderer` etc.
pub use delivery::{
    DirectorySink, DownloadSink, ObjectUrlHost, TempFileHost, certificate_file_name,
    download_certificate, view_certificate,
};
pub use pdf::{CertificateLayout, CertificateRenderer, RenderedCertificate};
pub use qr::{QrCodeGenEncoder, QrEncoder, verification_url};
pub use receipt::{format_receipt, receipt_file_name};

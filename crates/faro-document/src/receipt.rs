// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-text blockchain receipt offered from the student dashboard.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Utc};
use faro_core::types::BlockchainReceipt;

use crate::format::{dash_whitespace, date_time, long_date};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const DOUBLE_RULE: &str = "═══════════════════════════════════════════════════════════════════════════";

/// Width of the label column, including the trailing colon.
const LABEL_WIDTH: usize = 22;

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or("N/A")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}

struct Receipt {
    out: String,
}

impl Receipt {
    fn section(&mut self, title: &str) {
        let _ = writeln!(self.out, "{title}\n{RULE}");
    }

    fn field(&mut self, label: &str, value: &str) {
        let _ = writeln!(self.out, "{:<width$}{value}", format!("{label}:"), width = LABEL_WIDTH);
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

/// Render `receipt` as text. `now` supplies the copyright year.
pub fn format_receipt(receipt: &BlockchainReceipt, now: DateTime<Utc>) -> String {
    let cert = &receipt.certificate;
    let mut r = Receipt { out: String::new() };

    r.out.push_str(
        "╔═══════════════════════════════════════════════════════════════════════════╗\n\
         ║                        BLOCKCHAIN RECEIPT                                 ║\n\
         ║                     FARO Certificate Verification                         ║\n\
         ╚═══════════════════════════════════════════════════════════════════════════╝\n\n",
    );

    r.section("CERTIFICATE INFORMATION");
    r.field("Certificate ID", or_na(&cert.id));
    r.field("Course Name", or_na(&cert.course_name));
    r.field("Grade", or_na(&cert.grade));
    let issued = cert.issue_date.as_deref().map(long_date);
    r.field("Issue Date", or_na(&issued));
    r.blank();

    r.section("STUDENT INFORMATION");
    r.field("Name", or_na(&receipt.student.name));
    r.field("Email", or_na(&receipt.student.email));
    r.blank();

    r.section("ISSUER INFORMATION");
    r.field("Institution", or_na(&receipt.issuer.name));
    r.field("Email", or_na(&receipt.issuer.email));
    r.field("Issuer ID", or_na(&receipt.issuer.id));
    r.blank();

    r.section("BLOCKCHAIN VERIFICATION");
    r.field("Network", or_na(&receipt.blockchain.network));
    r.field("Type", or_na(&receipt.blockchain.kind));
    r.field("Certificate Hash", or_na(&receipt.target_hash));
    r.field("Transaction Hash", or_na(&receipt.blockchain.transaction_hash));
    r.field("Blockchain Explorer", or_na(&receipt.blockchain.blockchain_explorer));
    r.field("Status", or_na(&receipt.verification.status));
    r.blank();

    r.section("VERIFICATION DETAILS");
    r.field("Verification URL", or_na(&receipt.verification.verification_url));
    r.field(
        "Shareable URL",
        receipt
            .verification
            .shareable_url
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or("Not generated yet"),
    );
    r.field("Verification Method", or_na(&receipt.verification.method));
    r.blank();

    r.section("SECURITY METADATA");
    r.field("Algorithm", or_na(&receipt.metadata.algorithm));
    r.field("Blockchain Type", or_na(&receipt.metadata.blockchain_type));
    r.field("Chainpoint Version", or_na(&receipt.metadata.chainpoint_version));
    r.field("Immutable", yes_no(receipt.metadata.immutable));
    r.field("Tamper-Proof", yes_no(receipt.metadata.tamper_proof));
    r.blank();

    r.section("RECEIPT INFORMATION");
    r.field("Receipt Type", or_na(&receipt.kind));
    r.field("Context", or_na(&receipt.context));
    let issued_at = receipt.issued_at.as_deref().map(date_time);
    let generated_at = receipt.generated_at.as_deref().map(date_time);
    r.field("Certificate Issued", or_na(&issued_at));
    r.field("Receipt Generated", or_na(&generated_at));
    r.blank();

    let _ = write!(
        r.out,
        "{DOUBLE_RULE}\n\n\
         WHAT IS THIS RECEIPT?\n{RULE}\n\
         This blockchain receipt serves as cryptographic proof that your certificate\n\
         has been permanently recorded on the Polygon blockchain network. The certificate\n\
         hash above is a unique digital fingerprint that can be independently verified\n\
         on the blockchain, ensuring authenticity and preventing tampering.\n\n\
         HOW TO VERIFY:\n\
         1. Visit the Blockchain Explorer URL above\n\
         2. Check the transaction hash on PolygonScan\n\
         3. Use the Verification URL to verify the certificate online\n\
         4. The certificate hash will match the blockchain record\n\n\
         This receipt can be shared with employers, educational institutions, or anyone\n\
         who needs to verify the authenticity of your certificate.\n\n\
         {DOUBLE_RULE}\n\
         Powered by FARO - Blockchain Certificate Management System\n\
         © {year} FARO. All rights reserved.\n\
         {DOUBLE_RULE}\n",
        year = now.year(),
    );

    r.out
}

/// `blockchain-receipt-<course dashed>-<certificate id>.txt`.
pub fn receipt_file_name(course_name: Option<&str>, certificate_id: &str) -> String {
    let course = dash_whitespace(course_name.unwrap_or("certificate").trim());
    let name = format!("blockchain-receipt-{course}-{certificate_id}.txt");
    name.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use faro_core::types::{
        Certificate, Issuer, ReceiptChain, ReceiptMetadata, ReceiptVerification, Student,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid time")
    }

    fn receipt() -> BlockchainReceipt {
        BlockchainReceipt {
            context: Some("https://w3id.org/chainpoint/v3".into()),
            kind: Some("ChainpointSHA256v3".into()),
            target_hash: Some("0xfeedface".into()),
            certificate: Certificate {
                id: Some("abc123".into()),
                course_name: Some("Blockchain 101".into()),
                issue_date: Some("2024-01-01T00:00:00Z".into()),
                ..Certificate::default()
            },
            student: Student {
                name: Some("Jane Doe".into()),
                email: Some("jane@example.edu".into()),
                ..Student::default()
            },
            issuer: Issuer {
                id: Some("iss-1".into()),
                name: Some("MIT".into()),
                email: Some("registrar@mit.edu".into()),
                ..Issuer::default()
            },
            blockchain: ReceiptChain {
                network: Some("Polygon Amoy".into()),
                kind: Some("Ethereum".into()),
                transaction_hash: Some("0xdeadbeef".into()),
                blockchain_explorer: Some("https://amoy.polygonscan.com/tx/0xdeadbeef".into()),
            },
            verification: ReceiptVerification {
                status: Some("verified".into()),
                verification_url: Some("https://faro.example/verify?id=abc123".into()),
                shareable_url: None,
                method: Some("blockchain".into()),
            },
            metadata: ReceiptMetadata {
                algorithm: Some("SHA-256".into()),
                blockchain_type: Some("Polygon".into()),
                chainpoint_version: Some("3".into()),
                immutable: true,
                tamper_proof: false,
            },
            issued_at: Some("2024-01-01T13:05:09Z".into()),
            generated_at: None,
        }
    }

    #[test]
    fn receipt_lists_every_section() {
        let text = format_receipt(&receipt(), now());
        for heading in [
            "CERTIFICATE INFORMATION",
            "STUDENT INFORMATION",
            "ISSUER INFORMATION",
            "BLOCKCHAIN VERIFICATION",
            "VERIFICATION DETAILS",
            "SECURITY METADATA",
            "RECEIPT INFORMATION",
            "WHAT IS THIS RECEIPT?",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
        assert!(text.contains("© 2026 FARO"));
    }

    #[test]
    fn fields_are_aligned_and_formatted() {
        let text = format_receipt(&receipt(), now());
        assert!(text.contains("Certificate ID:       abc123\n"));
        assert!(text.contains("Issue Date:           January 1, 2024\n"));
        assert!(text.contains("Certificate Hash:     0xfeedface\n"));
        assert!(text.contains("Certificate Issued:   1/1/2024, 1:05:09 PM\n"));
    }

    #[test]
    fn missing_values_have_fallbacks() {
        let text = format_receipt(&receipt(), now());
        assert!(text.contains("Grade:                N/A\n"));
        assert!(text.contains("Shareable URL:        Not generated yet\n"));
        assert!(text.contains("Receipt Generated:    N/A\n"));
        assert!(text.contains("Immutable:            YES\n"));
        assert!(text.contains("Tamper-Proof:         NO\n"));
    }

    #[test]
    fn file_name_dashes_course() {
        assert_eq!(
            receipt_file_name(Some("Blockchain  101"), "abc123"),
            "blockchain-receipt-Blockchain-101-abc123.txt"
        );
        assert_eq!(
            receipt_file_name(None, "abc123"),
            "blockchain-receipt-certificate-abc123.txt"
        );
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Student self-service pages.

use chrono::Utc;
use faro_core::types::CertificateRenderRequest;
use faro_document::{format_receipt, receipt_file_name};

use super::{OrAlert, PageResult, deliver, print_certificate_rows};
use crate::cli::StudentCommand;
use crate::services::app_services::AppServices;

pub async fn run(services: &AppServices, command: StudentCommand) -> PageResult {
    let api = services.api();
    match command {
        StudentCommand::Check { email } => {
            let check = api.check_email(&email).await.or_alert("Failed to verify email")?;
            if !check.exists {
                println!(
                    "No certificate found for this email. Please check your email or contact your institution."
                );
            } else if check.has_password {
                println!(
                    "Welcome back, {}. Sign in with `faro student login`.",
                    check.name.as_deref().unwrap_or("student")
                );
            } else {
                println!(
                    "Welcome, {}. Set a password with `faro student set-password`.",
                    check.name.as_deref().unwrap_or("student")
                );
            }
        }
        StudentCommand::SetPassword {
            email,
            password,
            confirm,
        } => {
            api.set_password(&email, &password, &confirm)
                .await
                .or_alert("Failed to set password")?;
            println!("Password set successfully. You can now sign in.");
        }
        StudentCommand::Login { email, password } => {
            let student = api
                .student_login(&email, &password)
                .await
                .or_alert("Login failed")?;
            println!("Signed in as {}", student.name.as_deref().unwrap_or(&email));
        }
        StudentCommand::Dashboard => {
            let dashboard = api
                .student_dashboard()
                .await
                .or_alert("Failed to load dashboard")?;
            println!(
                "{} <{}>",
                dashboard.name.as_deref().unwrap_or("-"),
                dashboard.email.as_deref().unwrap_or("-")
            );
            print_certificate_rows(&dashboard.certificates);
        }
        StudentCommand::Certificate {
            certificate_id,
            delivery,
        } => {
            let cert = api
                .student_certificate(&certificate_id)
                .await
                .or_alert("Failed to load certificate")?;
            let student = api.session().current_student().unwrap_or_default();
            let student = cert.student.clone().unwrap_or(student);
            super::print_certificate(&cert);
            deliver(services, &CertificateRenderRequest::for_student(cert, student), delivery).await?;
        }
        StudentCommand::Share { certificate_id } => {
            let link = api
                .share_certificate(&certificate_id)
                .await
                .or_alert("Failed to generate shareable link")?;
            println!("{}", link.shareable_url);
        }
        StudentCommand::Receipt {
            certificate_id,
            output,
        } => {
            let receipt = api
                .blockchain_receipt(&certificate_id)
                .await
                .or_alert("Failed to download blockchain receipt")?;
            let text = format_receipt(&receipt, Utc::now());
            let id = receipt.certificate.id.as_deref().unwrap_or(&certificate_id);
            let name = receipt_file_name(receipt.certificate.course_name.as_deref(), id);
            let path = services
                .save_file(output.as_deref(), &name, text.as_bytes())
                .or_alert("Failed to download blockchain receipt")?;
            println!("Blockchain receipt downloaded to {}", path.display());
        }
        StudentCommand::Logout => {
            api.student_logout();
            println!("Signed out");
        }
    }
    Ok(())
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command pages. One module per area of the registry, each turning a parsed
// subcommand into API calls and printed output.
//
// Failures leave a page as a `Failure`: the error plus the generic text the
// page shows when the server gave no message of its own.

pub mod account;
pub mod certificates;
pub mod settings;
pub mod student;
pub mod students;
pub mod verify;

use faro_core::alerts::{Alert, alert};
use faro_core::error::FaroError;
use faro_core::types::{Certificate, CertificateRenderRequest};
use faro_document::format::short_date;

use crate::cli::{Commands, DeliveryArgs};
use crate::services::app_services::AppServices;

/// A failed command, ready to be shown as an alert.
#[derive(Debug)]
pub struct Failure {
    pub error: FaroError,
    pub fallback: &'static str,
}

impl Failure {
    pub fn alert(&self) -> Alert {
        alert(&self.error, self.fallback)
    }
}

pub type PageResult = Result<(), Failure>;

/// Attach a page's fallback alert text to an error.
pub trait OrAlert<T> {
    fn or_alert(self, fallback: &'static str) -> Result<T, Failure>;
}

impl<T, E: Into<FaroError>> OrAlert<T> for Result<T, E> {
    fn or_alert(self, fallback: &'static str) -> Result<T, Failure> {
        self.map_err(|e| Failure {
            error: e.into(),
            fallback,
        })
    }
}

/// Run one command.
pub async fn run(services: &AppServices, command: Commands) -> PageResult {
    match command {
        Commands::Login { email, password } => account::login(services, &email, &password).await,
        Commands::Register {
            name,
            email,
            password,
        } => account::register(services, &name, &email, &password).await,
        Commands::Logout => account::logout(services),
        Commands::Whoami => account::whoami(services).await,
        Commands::Dashboard => account::dashboard(services).await,
        Commands::Students(cmd) => students::run(services, cmd).await,
        Commands::Issue {
            student_id,
            course,
            grade,
            date,
            delivery,
        } => certificates::issue(services, student_id, course, grade, date, delivery).await,
        Commands::Template {
            student_ids,
            output,
        } => certificates::template(services, &student_ids, output.as_deref()).await,
        Commands::BulkUpload { file, download_all } => {
            certificates::bulk_upload(services, &file, download_all).await
        }
        Commands::Certificates {
            page,
            limit,
            status,
        } => certificates::list(services, page, limit, status.as_deref()).await,
        Commands::Render {
            request,
            id,
            delivery,
        } => certificates::render(services, request.as_deref(), id.as_deref(), delivery).await,
        Commands::Verify {
            certificate_id,
            delivery,
        } => verify::verify(services, &certificate_id, delivery).await,
        Commands::Shared { token, delivery } => verify::shared(services, &token, delivery).await,
        Commands::Student(cmd) => student::run(services, cmd).await,
        Commands::Config(args) => settings::run(services, args),
    }
}

// ---------------------------------------------------------------------------
// Shared output
// ---------------------------------------------------------------------------

/// View or download `request` as asked; nothing when neither flag is set.
pub async fn deliver(
    services: &AppServices,
    request: &CertificateRenderRequest,
    delivery: DeliveryArgs,
) -> PageResult {
    if delivery.view {
        services
            .view(request)
            .await
            .or_alert("Failed to open certificate")?;
        println!("Certificate opened in viewer");
    } else if delivery.download {
        let path = services
            .download(request)
            .await
            .or_alert("Failed to download certificate")?;
        println!("Certificate saved to {}", path.display());
    }
    Ok(())
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or("-")
}

/// Multi-line description of a certificate.
pub fn print_certificate(cert: &Certificate) {
    println!("Certificate ID:   {}", or_dash(&cert.id));
    println!("Course:           {}", or_dash(&cert.course_name));
    println!("Grade:            {}", or_dash(&cert.grade));
    println!(
        "Issue date:       {}",
        cert.issue_date.as_deref().map(short_date).unwrap_or_else(|| "-".into())
    );
    if let Some(student) = &cert.student {
        println!("Student:          {} <{}>", or_dash(&student.name), or_dash(&student.email));
    }
    if let Some(issuer) = &cert.issuer {
        println!("Issued by:        {}", or_dash(&issuer.name));
    }
    println!("Status:           {}", or_dash(&cert.status));
    println!("Transaction:      {}", cert.transaction().unwrap_or("-"));
    println!("Certificate hash: {}", or_dash(&cert.certificate_hash));
}

/// One table row per certificate.
pub fn print_certificate_rows(certificates: &[Certificate]) {
    if certificates.is_empty() {
        println!("No certificates");
        return;
    }
    println!("{:<26} {:<30} {:<6} {:<10}", "ID", "COURSE", "GRADE", "ISSUED");
    for cert in certificates {
        println!(
            "{:<26} {:<30} {:<6} {:<10}",
            or_dash(&cert.id),
            or_dash(&cert.course_name),
            or_dash(&cert.grade),
            cert.issue_date.as_deref().map(short_date).unwrap_or_else(|| "-".into()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_take_the_page_fallback() {
        let read: std::io::Result<Vec<u8>> = std::fs::read("/nonexistent/faro/template.xlsx");
        let failure = read.or_alert("Please select a file to upload").unwrap_err();
        assert!(matches!(failure.error, FaroError::Io(_)));
        assert_eq!(failure.alert().message, "Please select a file to upload");
    }

    #[test]
    fn server_message_beats_the_fallback() {
        let sent: faro_core::error::Result<()> = Err(FaroError::Api {
            status: 400,
            message: Some("Student already has this certificate".into()),
        });
        let failure = sent.or_alert("Failed to issue certificate").unwrap_err();
        assert_eq!(failure.alert().message, "Student already has this certificate");
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Issuer account pages: login, registration, profile and dashboard.

use faro_core::types::UserKind;

use super::{OrAlert, PageResult};
use crate::services::app_services::AppServices;

pub async fn login(services: &AppServices, email: &str, password: &str) -> PageResult {
    let issuer = services
        .api()
        .login(email, password)
        .await
        .or_alert("Login failed")?;
    println!(
        "Signed in as {}",
        issuer.name.as_deref().unwrap_or(email)
    );
    Ok(())
}

pub async fn register(
    services: &AppServices,
    name: &str,
    email: &str,
    password: &str,
) -> PageResult {
    let issuer = services
        .api()
        .register(name, email, password)
        .await
        .or_alert("Registration failed")?;
    println!(
        "Registered and signed in as {}",
        issuer.name.as_deref().unwrap_or(name)
    );
    if let Some(status) = issuer.status.as_deref().filter(|s| *s != "active") {
        println!("Institution status: {status}");
    }
    Ok(())
}

pub fn logout(services: &AppServices) -> PageResult {
    services.api().logout();
    println!("Signed out");
    Ok(())
}

/// Show the signed-in account; issuers get a fresh profile from the server.
pub async fn whoami(services: &AppServices) -> PageResult {
    let session = services.api().session();
    match session.user_kind() {
        None => println!("Not signed in"),
        Some(UserKind::Student) => {
            let student = session.current_student().unwrap_or_default();
            println!(
                "Student {} <{}>",
                student.name.as_deref().unwrap_or("-"),
                student.email.as_deref().unwrap_or("-")
            );
        }
        Some(UserKind::Issuer) => {
            let issuer = services
                .api()
                .profile()
                .await
                .or_alert("Failed to load profile")?;
            println!(
                "Issuer {} <{}>",
                issuer.name.as_deref().unwrap_or("-"),
                issuer.email.as_deref().unwrap_or("-")
            );
            if let Some(status) = issuer.status.as_deref() {
                println!("Status: {status}");
            }
        }
    }
    Ok(())
}

pub async fn dashboard(services: &AppServices) -> PageResult {
    let stats = services
        .api()
        .dashboard_stats()
        .await
        .or_alert("Failed to load dashboard data")?;
    println!("Total students:      {}", stats.total_students);
    println!("Total certificates:  {}", stats.total_certificates);
    println!("Recent certificates: {}", stats.recent_certificates);
    Ok(())
}

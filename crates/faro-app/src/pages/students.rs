// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Student record pages.

use std::io::Read;
use std::path::Path;

use faro_client::parse_bulk_students;
use faro_core::error::FaroError;
use faro_core::types::{NewStudent, StudentPage};

use super::{OrAlert, PageResult, print_certificate_rows};
use crate::cli::StudentsCommand;
use crate::services::app_services::AppServices;

pub async fn run(services: &AppServices, command: StudentsCommand) -> PageResult {
    let api = services.api();
    match command {
        StudentsCommand::List { page, limit } => {
            let page = api
                .list_students(page, limit)
                .await
                .or_alert("Failed to fetch students")?;
            print_page(&page);
        }
        StudentsCommand::Search { query, page, limit } => {
            let page = api
                .search_students(&query, page, limit)
                .await
                .or_alert("Failed to search students")?;
            print_page(&page);
        }
        StudentsCommand::Add { name, email } => {
            let student = api
                .create_student(&NewStudent { name, email })
                .await
                .or_alert("Failed to create student")?;
            println!(
                "Student created: {}",
                student.id.as_deref().unwrap_or("(no id returned)")
            );
        }
        StudentsCommand::Bulk { file } => {
            let text = read_rows(file.as_deref()).or_alert("Failed to read student list")?;
            let students = parse_bulk_students(&text).or_alert("Failed to create students")?;
            let created = api
                .bulk_create_students(&students)
                .await
                .or_alert("Failed to create students")?;
            println!("{created} students created successfully");
        }
        StudentsCommand::Show { student_id } => {
            let student = api
                .student(&student_id)
                .await
                .or_alert("Failed to fetch student")?;
            println!("ID:    {}", student.id.as_deref().unwrap_or("-"));
            println!("Name:  {}", student.name.as_deref().unwrap_or("-"));
            println!("Email: {}", student.email.as_deref().unwrap_or("-"));
        }
        StudentsCommand::Certificates { student_id } => {
            let certificates = api
                .student_certificates(&student_id)
                .await
                .or_alert("Failed to fetch certificates")?;
            print_certificate_rows(&certificates);
        }
    }
    Ok(())
}

fn read_rows(file: Option<&Path>) -> Result<String, FaroError> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_page(page: &StudentPage) {
    if page.students.is_empty() {
        println!("No students");
    } else {
        println!("{:<26} {:<28} EMAIL", "ID", "NAME");
        for student in &page.students {
            println!(
                "{:<26} {:<28} {}",
                student.id.as_deref().unwrap_or("-"),
                student.name.as_deref().unwrap_or("-"),
                student.email.as_deref().unwrap_or("-"),
            );
        }
    }
    let p = page.pagination;
    println!(
        "Page {} of {} ({} students)",
        p.page.max(1),
        p.pages.max(1),
        p.total
    );
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Student records managed by an issuer.

use faro_core::error::Result;
use faro_core::types::{Certificate, NewStudent, Student, StudentPage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::validation::require;

#[derive(Serialize)]
struct BulkStudents<'a> {
    students: &'a [NewStudent],
}

#[derive(Deserialize)]
struct StudentCertificates {
    #[serde(default)]
    certificates: Vec<Certificate>,
}

fn paging(page: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("limit", limit.to_string())]
}

impl ApiClient {
    /// `POST /students`.
    #[instrument(skip(self))]
    pub async fn create_student(&self, student: &NewStudent) -> Result<Student> {
        require(&student.name, "Please enter the student's name")?;
        require(&student.email, "Please enter the student's email")?;
        self.post(&["students"], student).await?.into_data("create student")
    }

    /// `POST /students/bulk`. Returns how many rows were submitted.
    #[instrument(skip(self, students), fields(count = students.len()))]
    pub async fn bulk_create_students(&self, students: &[NewStudent]) -> Result<usize> {
        self.post::<_, Value>(&["students", "bulk"], &BulkStudents { students })
            .await?
            .ensure_success()?;
        info!(count = students.len(), "students created");
        Ok(students.len())
    }

    /// `GET /students?page&limit`.
    #[instrument(skip(self))]
    pub async fn list_students(&self, page: u32, limit: u32) -> Result<StudentPage> {
        self.get(&["students"], &paging(page, limit))
            .await?
            .into_data("list students")
    }

    /// `GET /students/search?query&page&limit`.
    #[instrument(skip(self))]
    pub async fn search_students(&self, query: &str, page: u32, limit: u32) -> Result<StudentPage> {
        let mut params = vec![("query", query.to_owned())];
        params.extend(paging(page, limit));
        self.get(&["students", "search"], &params)
            .await?
            .into_data("search students")
    }

    /// `GET /students/{id}`.
    #[instrument(skip(self))]
    pub async fn student(&self, student_id: &str) -> Result<Student> {
        self.get(&["students", student_id], &[])
            .await?
            .into_data("student")
    }

    /// `GET /students/{id}/certificates`.
    #[instrument(skip(self))]
    pub async fn student_certificates(&self, student_id: &str) -> Result<Vec<Certificate>> {
        let list: StudentCertificates = self
            .get(&["students", student_id, "certificates"], &[])
            .await?
            .into_data("student certificates")?;
        Ok(list.certificates)
    }
}

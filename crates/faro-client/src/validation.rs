// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Form checks run before anything is sent to the API.

use faro_core::error::{FaroError, Result};
use faro_core::types::NewStudent;

/// Minimum length of a student password, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// `value` trimmed, or `InvalidInput(message)` when it is blank.
pub fn require<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(FaroError::InvalidInput(message.to_owned()))
    } else {
        Ok(value)
    }
}

/// Check a new password and its confirmation.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(FaroError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters long"
        )));
    }
    if password != confirmation {
        return Err(FaroError::InvalidInput("Passwords do not match".into()));
    }
    Ok(())
}

/// Parse pasted student rows, one `Name,Email` per line.
///
/// Rows missing either value are dropped; extra columns are ignored. Nothing
/// usable at all is an input error.
pub fn parse_bulk_students(text: &str) -> Result<Vec<NewStudent>> {
    let students: Vec<NewStudent> = text
        .lines()
        .filter_map(|line| {
            let mut cols = line.split(',').map(str::trim);
            let name = cols.next().filter(|v| !v.is_empty())?;
            let email = cols.next().filter(|v| !v.is_empty())?;
            Some(NewStudent {
                name: name.to_owned(),
                email: email.to_owned(),
            })
        })
        .collect();

    if students.is_empty() {
        return Err(FaroError::InvalidInput(
            "Invalid format. Use: Name,Email (one per line)".into(),
        ));
    }
    Ok(students)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_rows_are_trimmed_and_filtered() {
        let text = "Jane Doe, jane@uni.edu\n\nNo Email\n ,ghost@uni.edu\nJohn Roe,john@uni.edu,extra\r\n";
        let students = parse_bulk_students(text).expect("parse");
        assert_eq!(
            students,
            vec![
                NewStudent {
                    name: "Jane Doe".into(),
                    email: "jane@uni.edu".into()
                },
                NewStudent {
                    name: "John Roe".into(),
                    email: "john@uni.edu".into()
                },
            ]
        );
    }

    #[test]
    fn bulk_without_valid_rows_is_rejected() {
        let err = parse_bulk_students("just names\nanother").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: Invalid format. Use: Name,Email (one per line)"
        );
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(matches!(
            validate_new_password("short", "short"),
            Err(FaroError::InvalidInput(m)) if m == "Password must be at least 8 characters long"
        ));
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        assert!(matches!(
            validate_new_password("correct horse", "correct house"),
            Err(FaroError::InvalidInput(m)) if m == "Passwords do not match"
        ));
        assert!(validate_new_password("correct horse", "correct horse").is_ok());
    }

    #[test]
    fn blank_required_value_is_rejected() {
        assert_eq!(require("  abc123 ", "Please enter a certificate ID").ok(), Some("abc123"));
        assert!(require("   ", "Please enter a certificate ID").is_err());
    }
}

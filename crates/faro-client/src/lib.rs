// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// FARO Client: session context and typed REST client for the certificate
// registry API. Each endpoint group lives in its own module as an
// `impl ApiClient` block; `faro-core` supplies the records they exchange.

pub mod api;
pub mod auth;
pub mod certificates;
pub mod session;
pub mod student_auth;
pub mod students;
pub mod validation;
pub mod verification;

pub use api::{ApiClient, ApiEnvelope};
pub use session::{Session, SessionState};
pub use validation::{parse_bulk_students, validate_new_password};

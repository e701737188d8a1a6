// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: certificate layout and rendering.

pub mod certificate;
pub mod layout;

pub use certificate::{CertificateRenderer, RenderedCertificate};
pub use layout::CertificateLayout;

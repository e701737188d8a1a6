// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Public certificate verification.
//
// Checking an id takes two requests: the registry lookup, then the on-chain
// hash check. The outcome distinguishes an unknown id, a record without a
// hash, and a hash the chain does not confirm.

use faro_core::error::{FaroError, Result};
use faro_core::types::{Certificate, HashVerification, VerificationOutcome};
use serde::Serialize;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::validation::require;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashQuery<'a> {
    certificate_hash: &'a str,
}

impl ApiClient {
    /// `POST /verification/verify-hash`. `valid` is false when the server
    /// declined the check.
    #[instrument(skip(self))]
    pub async fn verify_hash(&self, certificate_hash: &str) -> Result<HashVerification> {
        let envelope = self
            .post::<_, HashVerification>(
                &["verification", "verify-hash"],
                &HashQuery { certificate_hash },
            )
            .await?;
        Ok(match envelope.data {
            Some(result) if envelope.success => result,
            _ => HashVerification { valid: false },
        })
    }

    /// Look `certificate_id` up and check its hash on-chain.
    #[instrument(skip(self))]
    pub async fn verify_certificate(&self, certificate_id: &str) -> Result<VerificationOutcome> {
        let certificate_id = require(certificate_id, "Please enter a certificate ID")?;

        let Some(certificate) = self.lookup_for_verification(certificate_id).await? else {
            info!("certificate not found");
            return Ok(VerificationOutcome::NotFound);
        };

        let hash = match certificate.certificate_hash.clone().filter(|h| !h.is_empty()) {
            Some(hash) => hash,
            None => return Ok(VerificationOutcome::MissingHash(certificate)),
        };

        let outcome = if self.verify_hash(&hash).await?.valid {
            VerificationOutcome::Verified(certificate)
        } else {
            VerificationOutcome::Invalid(certificate)
        };
        info!(verified = matches!(outcome, VerificationOutcome::Verified(_)), "verification finished");
        Ok(outcome)
    }

    /// The certificate, or `None` when the registry does not know it.
    async fn lookup_for_verification(&self, certificate_id: &str) -> Result<Option<Certificate>> {
        let envelope = match self.get::<Certificate>(&["certificates", certificate_id], &[]).await {
            Ok(envelope) => envelope,
            Err(FaroError::Api { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        if !envelope.success {
            return Ok(None);
        }
        Ok(envelope.data)
    }
}

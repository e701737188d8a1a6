// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Issuer authentication: login, registration, profile.

use faro_core::error::Result;
use faro_core::types::{Issuer, IssuerAuth};
use serde::Serialize;
use tracing::instrument;

use crate::api::ApiClient;
use crate::validation::require;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// `POST /auth/login`. Stores the token and issuer in the session.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Issuer> {
        let email = require(email, "Please enter your email")?;
        let auth: IssuerAuth = self
            .post(&["auth", "login"], &Credentials { email, password })
            .await?
            .into_data("login")?;
        let issuer = auth.issuer.clone();
        self.session().login_issuer(auth);
        Ok(issuer)
    }

    /// `POST /auth/register`. A successful registration signs the issuer in.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Issuer> {
        let name = require(name, "Please enter the institution name")?;
        let email = require(email, "Please enter your email")?;
        let auth: IssuerAuth = self
            .post(
                &["auth", "register"],
                &Registration {
                    name,
                    email,
                    password,
                },
            )
            .await?
            .into_data("register")?;
        let issuer = auth.issuer.clone();
        self.session().login_issuer(auth);
        Ok(issuer)
    }

    /// `GET /auth/me`. Refreshes the stored issuer.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Issuer> {
        let issuer: Issuer = self.get(&["auth", "me"], &[]).await?.into_data("profile")?;
        self.session().set_issuer(issuer.clone());
        Ok(issuer)
    }

    /// Forget the issuer login. Local only.
    pub fn logout(&self) {
        self.session().logout();
    }
}

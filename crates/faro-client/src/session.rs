// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Login session shared by the API client and the front-end.
//
// One session holds at most one login, either an issuer or a student. Clones
// share the same state, so the client clearing the session on a 401 is seen
// by every holder. The state is serialisable so a front-end can keep it
// between runs.

use std::sync::{Arc, RwLock};

use faro_core::types::{Issuer, IssuerAuth, LoginSurface, Student, StudentAuth, UserKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What a signed-in session carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Bearer token attached to every request.
    pub token: String,
    pub user_kind: UserKind,
    #[serde(default)]
    pub issuer: Option<Issuer>,
    #[serde(default)]
    pub student: Option<Student>,
}

/// Cloneable handle to the current login.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<Option<SessionState>>>,
}

impl Session {
    /// A signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from a [`snapshot`](Self::snapshot).
    pub fn restore(state: Option<SessionState>) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Copy of the current state, for persistence.
    pub fn snapshot(&self) -> Option<SessionState> {
        self.state.read().expect("session lock poisoned").clone()
    }

    /// Store an issuer login, replacing any previous one.
    pub fn login_issuer(&self, auth: IssuerAuth) {
        info!(issuer = auth.issuer.email.as_deref(), "issuer signed in");
        self.replace(Some(SessionState {
            token: auth.token,
            user_kind: UserKind::Issuer,
            issuer: Some(auth.issuer),
            student: None,
        }));
    }

    /// Store a student login, replacing any previous one.
    pub fn login_student(&self, auth: StudentAuth) {
        info!(student = auth.student.email.as_deref(), "student signed in");
        self.replace(Some(SessionState {
            token: auth.token,
            user_kind: UserKind::Student,
            issuer: None,
            student: Some(auth.student),
        }));
    }

    /// Refresh the stored issuer profile. Ignored unless an issuer is signed in.
    pub fn set_issuer(&self, issuer: Issuer) {
        let mut guard = self.state.write().expect("session lock poisoned");
        if let Some(state) = guard.as_mut().filter(|s| s.user_kind == UserKind::Issuer) {
            state.issuer = Some(issuer);
        }
    }

    pub fn logout(&self) {
        debug!("session cleared by logout");
        self.replace(None);
    }

    /// Clear the session after the server rejected its token, returning the
    /// login surface the user has to go back to.
    pub fn expire(&self) -> LoginSurface {
        let previous = self.state.write().expect("session lock poisoned").take();
        let surface = previous
            .map(|s| LoginSurface::from(s.user_kind))
            .unwrap_or(LoginSurface::Issuer);
        info!(%surface, "session expired");
        surface
    }

    pub fn token(&self) -> Option<String> {
        self.read(|s| s.token.clone())
    }

    pub fn user_kind(&self) -> Option<UserKind> {
        self.read(|s| s.user_kind)
    }

    pub fn current_issuer(&self) -> Option<Issuer> {
        self.read(|s| s.issuer.clone()).flatten()
    }

    pub fn current_student(&self) -> Option<Student> {
        self.read(|s| s.student.clone()).flatten()
    }

    /// An issuer is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user_kind() == Some(UserKind::Issuer)
    }

    /// A student is signed in.
    pub fn is_student_authenticated(&self) -> bool {
        self.user_kind() == Some(UserKind::Student)
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> Option<T> {
        self.state.read().expect("session lock poisoned").as_ref().map(f)
    }

    fn replace(&self, state: Option<SessionState>) {
        *self.state.write().expect("session lock poisoned") = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer_auth() -> IssuerAuth {
        IssuerAuth {
            token: "issuer-token".into(),
            issuer: Issuer {
                id: Some("iss-1".into()),
                name: Some("MIT".into()),
                ..Issuer::default()
            },
        }
    }

    fn student_auth() -> StudentAuth {
        StudentAuth {
            token: "student-token".into(),
            student: Student {
                name: Some("Jane Doe".into()),
                ..Student::default()
            },
        }
    }

    #[test]
    fn starts_signed_out() {
        let session = Session::new();
        assert!(session.token().is_none());
        assert!(!session.is_authenticated());
        assert!(!session.is_student_authenticated());
    }

    #[test]
    fn issuer_login_is_shared_between_clones() {
        let session = Session::new();
        let other = session.clone();
        session.login_issuer(issuer_auth());

        assert_eq!(other.token().as_deref(), Some("issuer-token"));
        assert!(other.is_authenticated());
        assert_eq!(
            other.current_issuer().and_then(|i| i.name).as_deref(),
            Some("MIT")
        );
        assert!(other.current_student().is_none());
    }

    #[test]
    fn student_login_replaces_issuer() {
        let session = Session::new();
        session.login_issuer(issuer_auth());
        session.login_student(student_auth());

        assert!(session.is_student_authenticated());
        assert!(!session.is_authenticated());
        assert!(session.current_issuer().is_none());
    }

    #[test]
    fn expire_reports_surface_and_clears() {
        let session = Session::new();
        session.login_student(student_auth());
        assert_eq!(session.expire(), LoginSurface::Student);
        assert!(session.snapshot().is_none());

        session.login_issuer(issuer_auth());
        assert_eq!(session.expire(), LoginSurface::Issuer);

        // Nothing stored: back to the issuer login.
        assert_eq!(session.expire(), LoginSurface::Issuer);
    }

    #[test]
    fn profile_refresh_only_applies_to_issuers() {
        let session = Session::new();
        session.login_student(student_auth());
        session.set_issuer(Issuer::default());
        assert!(session.current_issuer().is_none());

        session.login_issuer(issuer_auth());
        session.set_issuer(Issuer {
            name: Some("Massachusetts Institute of Technology".into()),
            ..Issuer::default()
        });
        assert_eq!(
            session.current_issuer().and_then(|i| i.name).as_deref(),
            Some("Massachusetts Institute of Technology")
        );
    }

    #[test]
    fn snapshot_survives_json() {
        let session = Session::new();
        session.login_issuer(issuer_auth());
        let json = serde_json::to_string(&session.snapshot()).expect("serialize");
        let restored = Session::restore(serde_json::from_str(&json).expect("deserialize"));
        assert_eq!(restored.snapshot(), session.snapshot());
        assert!(json.contains("\"userKind\":\"issuer\""));
    }
}

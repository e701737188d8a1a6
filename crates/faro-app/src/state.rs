// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Login state persisted between runs in `<data dir>/session.json`.

use std::path::Path;

use faro_client::{Session, SessionState};
use faro_core::error::Result;
use tracing::{debug, warn};

pub const SESSION_FILE: &str = "session.json";

/// Restore the session saved in `dir`. A missing or unreadable file gives a
/// signed-out session.
pub fn load_session(dir: &Path) -> Session {
    let path = dir.join(SESSION_FILE);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no stored session");
            return Session::new();
        }
    };
    match serde_json::from_str::<Option<SessionState>>(&data) {
        Ok(state) => Session::restore(state),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
            Session::new()
        }
    }
}

/// Write the session to `dir`, or remove the file when signed out.
pub fn save_session(dir: &Path, session: &Session) -> Result<()> {
    let path = dir.join(SESSION_FILE);
    match session.snapshot() {
        Some(state) => {
            std::fs::write(&path, serde_json::to_string_pretty(&state)?)?;
        }
        None => match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faro_core::types::{Issuer, IssuerAuth};

    #[test]
    fn round_trip_through_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = Session::new();
        session.login_issuer(IssuerAuth {
            token: "t-1".into(),
            issuer: Issuer {
                name: Some("MIT".into()),
                ..Issuer::default()
            },
        });
        save_session(dir.path(), &session).expect("save");

        let restored = load_session(dir.path());
        assert_eq!(restored.token().as_deref(), Some("t-1"));
        assert!(restored.is_authenticated());
    }

    #[test]
    fn signing_out_removes_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = Session::new();
        session.login_issuer(IssuerAuth {
            token: "t-1".into(),
            issuer: Issuer::default(),
        });
        save_session(dir.path(), &session).expect("save");
        session.logout();
        save_session(dir.path(), &session).expect("save signed out");
        assert!(!dir.path().join(SESSION_FILE).exists());
        // Saving a signed-out session twice is fine.
        save_session(dir.path(), &session).expect("save again");
    }

    #[test]
    fn corrupt_file_gives_signed_out_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(SESSION_FILE), "{not json").expect("write");
        assert!(load_session(dir.path()).snapshot().is_none());
    }
}

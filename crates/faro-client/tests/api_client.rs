// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ApiClient against a canned HTTP/1.1 server on a loopback port.

use std::sync::{Arc, Mutex};

use faro_client::{ApiClient, Session};
use faro_core::alerts::alert_message;
use faro_core::error::FaroError;
use faro_core::types::{LoginSurface, StudentAuth, Student, VerificationOutcome};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ---------------------------------------------------------------------------
// Canned server
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct Route {
    method: &'static str,
    path: String,
    status: u16,
    body: String,
}

fn route(method: &'static str, path: &str, status: u16, body: &str) -> Route {
    Route {
        method,
        path: path.into(),
        status,
        body: body.into(),
    }
}

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    /// Path plus query string.
    target: String,
    authorization: Option<String>,
    body: String,
}

struct CannedServer {
    base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl CannedServer {
    async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let log = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                let log = Arc::clone(&log);
                tokio::spawn(async move { handle(stream, &routes, &log).await });
            }
        });

        Self {
            base: format!("http://{addr}/api"),
            requests,
        }
    }

    fn client(&self, session: Session) -> ApiClient {
        ApiClient::new(&self.base, session).expect("client")
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("request log lock poisoned").clone()
    }

    fn request_to(&self, path: &str) -> Recorded {
        self.requests()
            .into_iter()
            .find(|r| r.target.split('?').next() == Some(path))
            .unwrap_or_else(|| panic!("no request to {path}"))
    }
}

async fn handle(mut stream: TcpStream, routes: &[Route], log: &Mutex<Vec<Recorded>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.expect("read");
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_owned();
    let target = request_line.next().unwrap_or_default().to_owned();

    let mut content_length = 0usize;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_owned()),
                _ => {}
            }
        }
    }

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.expect("read body");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[body_start..]).into_owned();

    let path = target.split('?').next().unwrap_or_default().to_owned();
    log.lock().expect("request log lock poisoned").push(Recorded {
        method: method.clone(),
        target: target.clone(),
        authorization,
        body,
    });

    let (status, body) = routes
        .iter()
        .find(|r| r.method == method && r.path == path)
        .map(|r| (r.status, r.body.clone()))
        .unwrap_or((404, r#"{"success":false,"message":"Route not found"}"#.to_owned()));

    let response = format!(
        "HTTP/1.1 {status} Canned\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.flush().await;
}

fn student_session() -> Session {
    let session = Session::new();
    session.login_student(StudentAuth {
        token: "student-token".into(),
        student: Student {
            name: Some("Jane Doe".into()),
            ..Student::default()
        },
    });
    session
}

// ---------------------------------------------------------------------------
// Authentication & session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_stores_session_and_later_requests_carry_bearer() {
    let server = CannedServer::start(vec![
        route(
            "POST",
            "/api/auth/login",
            200,
            r#"{"success":true,"data":{"token":"t-123","issuer":{"id":"iss-1","name":"MIT","email":"registrar@mit.edu"}}}"#,
        ),
        route(
            "GET",
            "/api/auth/me",
            200,
            r#"{"success":true,"data":{"id":"iss-1","name":"MIT","email":"registrar@mit.edu","status":"active"}}"#,
        ),
    ])
    .await;
    let api = server.client(Session::new());

    let issuer = api.login("registrar@mit.edu", "hunter22").await.expect("login");
    assert_eq!(issuer.name.as_deref(), Some("MIT"));
    assert!(api.session().is_authenticated());
    assert_eq!(api.session().token().as_deref(), Some("t-123"));

    let login = server.request_to("/api/auth/login");
    assert!(login.authorization.is_none());
    let sent: serde_json::Value = serde_json::from_str(&login.body).expect("json body");
    assert_eq!(sent["email"], "registrar@mit.edu");
    assert_eq!(sent["password"], "hunter22");

    let profile = api.profile().await.expect("profile");
    assert_eq!(profile.status.as_deref(), Some("active"));
    assert_eq!(
        server.request_to("/api/auth/me").authorization.as_deref(),
        Some("Bearer t-123")
    );
    assert_eq!(
        api.session().current_issuer().and_then(|i| i.status).as_deref(),
        Some("active")
    );
}

#[tokio::test]
async fn rejected_token_clears_session_and_names_login_surface() {
    let server = CannedServer::start(vec![route(
        "GET",
        "/api/students/dashboard",
        401,
        r#"{"success":false,"message":"Token expired"}"#,
    )])
    .await;
    let session = student_session();
    let api = server.client(session.clone());

    let err = api.student_dashboard().await.unwrap_err();
    assert!(matches!(
        err,
        FaroError::Unauthorized {
            surface: LoginSurface::Student
        }
    ));
    assert!(session.snapshot().is_none());
    assert_eq!(
        server.request_to("/api/students/dashboard").authorization.as_deref(),
        Some("Bearer student-token")
    );
}

#[tokio::test]
async fn failed_login_is_an_api_error_with_server_message() {
    let server = CannedServer::start(vec![route(
        "POST",
        "/api/students/auth/login",
        401,
        r#"{"success":false,"message":"Invalid credentials"}"#,
    )])
    .await;
    let api = server.client(Session::new());

    let err = api.student_login("jane@uni.edu", "wrong-pass").await.unwrap_err();
    assert!(matches!(err, FaroError::Api { status: 401, .. }));
    assert_eq!(alert_message(&err, "Login failed"), "Invalid credentials");
    assert!(!api.session().is_student_authenticated());
}

#[tokio::test]
async fn student_login_stores_student_profile() {
    let server = CannedServer::start(vec![route(
        "POST",
        "/api/students/auth/login",
        200,
        r#"{"success":true,"data":{"token":"s-9","student":{"id":"stu-1","name":"Jane Doe","email":"jane@uni.edu"}}}"#,
    )])
    .await;
    let api = server.client(Session::new());

    api.student_login("jane@uni.edu", "correct horse").await.expect("login");
    assert!(api.session().is_student_authenticated());
    assert_eq!(
        api.session().current_student().and_then(|s| s.name).as_deref(),
        Some("Jane Doe")
    );
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_keeps_server_message_or_falls_back() {
    let server = CannedServer::start(vec![
        route(
            "POST",
            "/api/certificates",
            400,
            r#"{"success":false,"message":"Student already has this certificate"}"#,
        ),
        route("GET", "/api/students", 500, "<html>oops</html>"),
    ])
    .await;
    let api = server.client(Session::new());

    let issue = faro_core::types::IssueCertificateRequest {
        student_id: "stu-1".into(),
        course_name: "Blockchain 101".into(),
        grade: "A".into(),
        issue_date: chrono::Utc::now(),
    };
    let err = api.issue_certificate(&issue).await.unwrap_err();
    assert_eq!(
        alert_message(&err, "Failed to issue certificate"),
        "Student already has this certificate"
    );
    let sent: serde_json::Value =
        serde_json::from_str(&server.request_to("/api/certificates").body).expect("json");
    assert_eq!(sent["studentId"], "stu-1");
    assert_eq!(sent["courseName"], "Blockchain 101");

    let err = api.list_students(1, 10).await.unwrap_err();
    assert!(matches!(err, FaroError::Api { status: 500, message: None }));
    assert_eq!(alert_message(&err, "Failed to fetch students"), "Failed to fetch students");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = ApiClient::new(&format!("http://{addr}/api"), Session::new()).expect("client");
    assert!(matches!(
        api.list_students(1, 10).await,
        Err(FaroError::Network(_))
    ));
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_query_and_paging() {
    let server = CannedServer::start(vec![route(
        "GET",
        "/api/students/search",
        200,
        r#"{"success":true,"data":{"students":[{"id":"stu-1","name":"Jane Doe","email":"jane@uni.edu"}],"pagination":{"total":1,"page":1,"limit":10,"pages":1}}}"#,
    )])
    .await;
    let api = server.client(Session::new());

    let page = api.search_students("jane doe", 1, 10).await.expect("search");
    assert_eq!(page.students.len(), 1);
    assert_eq!(page.pagination.total, 1);
    assert_eq!(
        server.request_to("/api/students/search").target,
        "/api/students/search?query=jane+doe&page=1&limit=10"
    );
}

#[tokio::test]
async fn bulk_students_are_posted_together() {
    let server = CannedServer::start(vec![route(
        "POST",
        "/api/students/bulk",
        201,
        r#"{"success":true,"data":[]}"#,
    )])
    .await;
    let api = server.client(Session::new());

    let students =
        faro_client::parse_bulk_students("Jane Doe,jane@uni.edu\nJohn Roe,john@uni.edu").expect("parse");
    assert_eq!(api.bulk_create_students(&students).await.expect("bulk"), 2);

    let sent: serde_json::Value =
        serde_json::from_str(&server.request_to("/api/students/bulk").body).expect("json");
    assert_eq!(sent["students"][1]["email"], "john@uni.edu");
}

#[tokio::test]
async fn bulk_upload_sends_multipart_file() {
    let server = CannedServer::start(vec![route(
        "POST",
        "/api/certificates/bulk-upload",
        200,
        r#"{"success":true,"data":{"summary":{"total":2,"successful":1,"failed":1},"results":[{"success":true,"certificateId":"c1","studentName":"Jane Doe"},{"success":false,"studentName":"John Roe","error":"Duplicate"}]}}"#,
    )])
    .await;
    let api = server.client(Session::new());

    let report = api
        .bulk_upload("certificates.xlsx", b"PK\x03\x04fake".to_vec())
        .await
        .expect("upload");
    assert_eq!(report.summary.successful, 1);
    assert_eq!(report.results[1].error.as_deref(), Some("Duplicate"));

    let body = server.request_to("/api/certificates/bulk-upload").body;
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"certificates.xlsx\""));
}

#[tokio::test]
async fn template_download_returns_raw_bytes() {
    let server = CannedServer::start(vec![route(
        "POST",
        "/api/certificates/download-template",
        200,
        "PK-template-bytes",
    )])
    .await;
    let api = server.client(Session::new());

    let bytes = api
        .download_template(&["stu-1".into(), "stu-2".into()])
        .await
        .expect("template");
    assert_eq!(bytes, b"PK-template-bytes");
    let sent: serde_json::Value = serde_json::from_str(
        &server.request_to("/api/certificates/download-template").body,
    )
    .expect("json");
    assert_eq!(sent["studentIds"][1], "stu-2");
}

#[tokio::test]
async fn dashboard_stats_combine_both_listings() {
    let server = CannedServer::start(vec![
        route(
            "GET",
            "/api/students",
            200,
            r#"{"success":true,"data":{"students":[{"id":"stu-1"}],"pagination":{"total":42,"page":1,"limit":1,"pages":42}}}"#,
        ),
        route(
            "GET",
            "/api/certificates/issuer/iss-1",
            200,
            r#"{"success":true,"data":{"certificates":[{"id":"c1"}],"pagination":{"total":17,"page":1,"limit":1,"pages":17}}}"#,
        ),
    ])
    .await;
    let session = Session::new();
    session.login_issuer(faro_core::types::IssuerAuth {
        token: "t-1".into(),
        issuer: faro_core::types::Issuer {
            id: Some("iss-1".into()),
            ..Default::default()
        },
    });
    let api = server.client(session);

    let stats = api.dashboard_stats().await.expect("stats");
    assert_eq!(stats.total_students, 42);
    assert_eq!(stats.total_certificates, 17);
    assert_eq!(stats.recent_certificates, 1);
    assert_eq!(
        server.request_to("/api/certificates/issuer/iss-1").target,
        "/api/certificates/issuer/iss-1?page=1&limit=1"
    );
}

#[tokio::test]
async fn dashboard_requires_signed_in_issuer() {
    let server = CannedServer::start(Vec::new()).await;
    let api = server.client(Session::new());
    assert!(matches!(
        api.dashboard_stats().await,
        Err(FaroError::Unauthorized {
            surface: LoginSurface::Issuer
        })
    ));
    assert!(server.requests().is_empty());
}

// ---------------------------------------------------------------------------
// Verification flow
// ---------------------------------------------------------------------------

const HASHED_CERT: &str = r#"{"success":true,"data":{"id":"abc123","courseName":"Blockchain 101","certificateHash":"0xfeedface","student":{"name":"Jane Doe"}}}"#;

#[tokio::test]
async fn verify_confirms_hash_on_chain() {
    let server = CannedServer::start(vec![
        route("GET", "/api/certificates/abc123", 200, HASHED_CERT),
        route(
            "POST",
            "/api/verification/verify-hash",
            200,
            r#"{"success":true,"data":{"valid":true}}"#,
        ),
    ])
    .await;
    let api = server.client(Session::new());

    let outcome = api.verify_certificate(" abc123 ").await.expect("verify");
    let cert = match outcome {
        VerificationOutcome::Verified(cert) => cert,
        other => panic!("expected Verified, got {other:?}"),
    };
    assert_eq!(cert.course_name.as_deref(), Some("Blockchain 101"));

    let sent: serde_json::Value =
        serde_json::from_str(&server.request_to("/api/verification/verify-hash").body).expect("json");
    assert_eq!(sent["certificateHash"], "0xfeedface");
}

#[tokio::test]
async fn verify_reports_invalid_hash() {
    let server = CannedServer::start(vec![
        route("GET", "/api/certificates/abc123", 200, HASHED_CERT),
        route(
            "POST",
            "/api/verification/verify-hash",
            200,
            r#"{"success":true,"data":{"valid":false}}"#,
        ),
    ])
    .await;
    let api = server.client(Session::new());

    let outcome = api.verify_certificate("abc123").await.expect("verify");
    assert!(matches!(outcome, VerificationOutcome::Invalid(_)));
    assert_eq!(
        outcome.failure_message(),
        Some("Certificate verification failed. This certificate may not be valid on the blockchain.")
    );
}

#[tokio::test]
async fn verify_reports_missing_hash_without_chain_call() {
    let server = CannedServer::start(vec![route(
        "GET",
        "/api/certificates/abc123",
        200,
        r#"{"success":true,"data":{"id":"abc123"}}"#,
    )])
    .await;
    let api = server.client(Session::new());

    let outcome = api.verify_certificate("abc123").await.expect("verify");
    assert!(matches!(outcome, VerificationOutcome::MissingHash(_)));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn verify_unknown_id_is_not_found() {
    let server = CannedServer::start(Vec::new()).await;
    let api = server.client(Session::new());

    let outcome = api.verify_certificate("nope").await.expect("verify");
    assert_eq!(outcome, VerificationOutcome::NotFound);
}

#[tokio::test]
async fn verify_requires_an_id() {
    let server = CannedServer::start(Vec::new()).await;
    let api = server.client(Session::new());

    let err = api.verify_certificate("   ").await.unwrap_err();
    assert_eq!(
        alert_message(&err, "Failed to verify certificate"),
        "Please enter a certificate ID"
    );
    assert!(server.requests().is_empty());
}

// ---------------------------------------------------------------------------
// Student self-service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_password_is_validated_before_sending() {
    let server = CannedServer::start(Vec::new()).await;
    let api = server.client(Session::new());

    let err = api
        .set_password("jane@uni.edu", "short", "short")
        .await
        .unwrap_err();
    assert!(matches!(err, FaroError::InvalidInput(_)));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn share_link_and_receipt_use_student_token() {
    let server = CannedServer::start(vec![
        route(
            "POST",
            "/api/students/certificate/abc123/share",
            200,
            r#"{"success":true,"data":{"shareableUrl":"https://faro.example/shared/tok-1"}}"#,
        ),
        route(
            "GET",
            "/api/students/certificate/abc123/blockchain-receipt",
            200,
            r#"{"success":true,"data":{"@context":"https://w3id.org/chainpoint/v3","type":"ChainpointSHA256v3","targetHash":"0xfeedface","certificate":{"id":"abc123"},"blockchain":{"network":"Polygon Amoy","type":"Ethereum"},"verification":{"verificationURL":"https://faro.example/verify?id=abc123"},"metadata":{"immutable":true}}}"#,
        ),
    ])
    .await;
    let api = server.client(student_session());

    let link = api.share_certificate("abc123").await.expect("share");
    assert_eq!(link.shareable_url, "https://faro.example/shared/tok-1");

    let receipt = api.blockchain_receipt("abc123").await.expect("receipt");
    assert_eq!(receipt.kind.as_deref(), Some("ChainpointSHA256v3"));
    assert_eq!(receipt.blockchain.network.as_deref(), Some("Polygon Amoy"));
    assert!(receipt.metadata.immutable);

    assert!(
        server
            .requests()
            .iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer student-token"))
    );
    assert!(server.requests().iter().any(|r| r.method == "POST"));
}

#[tokio::test]
async fn expired_share_link_has_friendly_message() {
    let server = CannedServer::start(vec![route(
        "GET",
        "/api/students/public/share/tok-old",
        200,
        r#"{"success":false}"#,
    )])
    .await;
    let api = server.client(Session::new());

    let err = api.shared_certificate("tok-old").await.unwrap_err();
    assert_eq!(
        alert_message(&err, "Failed to load certificate"),
        "Certificate not found or link has expired"
    );
}

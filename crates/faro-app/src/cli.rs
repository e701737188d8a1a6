// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface of the `faro` binary.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Registry API base URL, overriding the config file and FARO_API_URL
    #[clap(long, global = true)]
    pub api_url: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

/// What to do with a certificate once it has been fetched.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DeliveryArgs {
    /// Open the rendered certificate in the document viewer
    #[clap(long, conflicts_with = "download")]
    pub view: bool,
    /// Save the rendered certificate as a PDF in the downloads directory
    #[clap(long)]
    pub download: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in as an issuing institution
    Login {
        #[clap(long)]
        email: String,
        #[clap(long, env = "FARO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new issuing institution and sign in
    Register {
        /// Institution name
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        #[clap(long, env = "FARO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored login
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Manage student records
    #[clap(subcommand)]
    Students(StudentsCommand),
    /// Issue a certificate to a student and anchor it on-chain
    Issue {
        #[clap(long)]
        student_id: String,
        /// Course name printed on the certificate
        #[clap(long)]
        course: String,
        #[clap(long, default_value = "")]
        grade: String,
        /// Issue date (YYYY-MM-DD); today when omitted
        #[clap(long)]
        date: Option<NaiveDate>,
        #[clap(flatten)]
        delivery: DeliveryArgs,
    },
    /// Download the bulk-issuance spreadsheet template for some students
    Template {
        /// Student id to include (repeatable)
        #[clap(long = "student", required = true)]
        student_ids: Vec<String>,
        /// Where to write the template
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
    /// Issue certificates from a filled-in template
    BulkUpload {
        file: PathBuf,
        /// Save a PDF for every certificate issued
        #[clap(long)]
        download_all: bool,
    },
    /// List certificates issued by the signed-in institution
    Certificates {
        #[clap(long, default_value_t = 1)]
        page: u32,
        #[clap(long, default_value_t = 10)]
        limit: u32,
        /// Only certificates with this status
        #[clap(long)]
        status: Option<String>,
    },
    /// Show the institution dashboard figures
    Dashboard,
    /// Verify a certificate against the registry and the blockchain
    Verify {
        certificate_id: String,
        #[clap(flatten)]
        delivery: DeliveryArgs,
    },
    /// Student self-service
    #[clap(subcommand)]
    Student(StudentCommand),
    /// Open a certificate someone shared with you
    Shared {
        /// Share token from the link
        token: String,
        #[clap(flatten)]
        delivery: DeliveryArgs,
    },
    /// Show stored settings, or change them with the flags below
    Config(ConfigArgs),
    /// Render a certificate PDF from a JSON request file or a registry id
    Render {
        /// JSON file with {certificate, student, issuer}
        #[clap(long, conflicts_with = "id", required_unless_present = "id")]
        request: Option<PathBuf>,
        /// Certificate id to fetch from the registry
        #[clap(long)]
        id: Option<String>,
        #[clap(flatten)]
        delivery: DeliveryArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Store a new registry API base URL
    #[clap(long = "set-api-url", value_name = "URL")]
    pub api_base_url: Option<String>,
    /// Origin used in verification links and QR codes
    #[clap(long, value_name = "URL")]
    pub public_origin: Option<String>,
    /// Request timeout in seconds
    #[clap(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Where downloaded certificates and receipts are written
    #[clap(long, value_name = "DIR")]
    pub downloads_dir: Option<PathBuf>,
    /// Program used to open rendered certificates
    #[clap(long, value_name = "COMMAND")]
    pub viewer: Option<String>,
}

impl ConfigArgs {
    pub fn is_empty(&self) -> bool {
        self.api_base_url.is_none()
            && self.public_origin.is_none()
            && self.timeout.is_none()
            && self.downloads_dir.is_none()
            && self.viewer.is_none()
    }
}

#[derive(Subcommand, Debug)]
pub enum StudentsCommand {
    /// List students
    List {
        #[clap(long, default_value_t = 1)]
        page: u32,
        #[clap(long, default_value_t = 10)]
        limit: u32,
    },
    /// Search students by name or email
    Search {
        query: String,
        #[clap(long, default_value_t = 1)]
        page: u32,
        #[clap(long, default_value_t = 10)]
        limit: u32,
    },
    /// Add one student
    Add {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
    },
    /// Add students from `Name,Email` lines (stdin when no file is given)
    Bulk { file: Option<PathBuf> },
    /// Show one student
    Show { student_id: String },
    /// List a student's certificates
    Certificates { student_id: String },
}

#[derive(Subcommand, Debug)]
pub enum StudentCommand {
    /// Check whether an email has certificates and a password
    Check { email: String },
    /// Set the password for a first-time login
    SetPassword {
        #[clap(long)]
        email: String,
        #[clap(long, env = "FARO_PASSWORD", hide_env_values = true)]
        password: String,
        /// Repeat the password
        #[clap(long)]
        confirm: String,
    },
    /// Sign in as a student
    Login {
        #[clap(long)]
        email: String,
        #[clap(long, env = "FARO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List your certificates
    Dashboard,
    /// Open or save one of your certificates
    Certificate {
        certificate_id: String,
        #[clap(flatten)]
        delivery: DeliveryArgs,
    },
    /// Create a shareable link for a certificate
    Share { certificate_id: String },
    /// Save the blockchain receipt of a certificate as text
    Receipt {
        certificate_id: String,
        /// Directory to write into (downloads directory when omitted)
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
    /// Forget the student login
    Logout,
}

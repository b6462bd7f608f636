// nosrs/src/console/mod.rs

//! Interfaces to the running NOS host.
//!
//! The reconfiguration workflow only ever needs three things from the
//! host: read a file, replace a file, and submit a batch job. Everything
//! behind those operations (operator console, terminal emulation, data
//! channel) stays behind [`Console`], so the workflow can run against the
//! local staging backend or a test double unchanged.

pub mod local;

pub use local::LocalConsole;

use crate::constants::{NETADMN_PASSWORD, NETADMN_USER};
use thiserror::Error;

/// Login credentials for privileged file operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// The network administrator account that owns the TCP/IP files.
    pub fn netadmn() -> Self {
        Self::new(NETADMN_USER, NETADMN_PASSWORD)
    }
}

/// A batch job ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub statements: Vec<String>,
    pub data: Option<String>,
    pub credentials: Option<Credentials>,
}

impl Job {
    pub fn new(name: &str, statements: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            statements,
            data: None,
            credentials: None,
        }
    }

    pub fn with_data(mut self, data: String) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// The job deck: control statements, then input records behind an
    /// end-of-record separator.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for statement in &self.statements {
            out.push_str(statement);
            out.push('\n');
        }
        if let Some(data) = &self.data {
            out.push_str("~eor\n");
            out.push_str(data);
            if !data.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

/// Errors surfaced by console collaborators.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("file not found on host: {0}")]
    NotFound(String),
    #[error("replace of {0} was denied")]
    WriteDenied(String),
    #[error("job {name} failed:\n{output}")]
    JobFailed { name: String, output: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// File and batch access to the target host.
pub trait Console {
    /// Reads a host file as text. `name` may carry qualifiers after the
    /// file name, e.g. `LIDCM01/UN=SYSTEMX`.
    fn fetch_file(
        &mut self,
        name: &str,
        credentials: Option<&Credentials>,
    ) -> Result<String, ConsoleError>;

    /// Replaces a host file with `text`, creating it if necessary.
    fn replace_file(
        &mut self,
        name: &str,
        text: &str,
        credentials: Option<&Credentials>,
    ) -> Result<(), ConsoleError>;

    /// Submits a batch job and returns its printed output.
    fn submit_job(&mut self, job: &Job) -> Result<String, ConsoleError>;
}

// nosrs/src/console/local.rs

use crate::console::{Console, ConsoleError, Credentials, Job};
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A console backed by a local staging directory.
///
/// Host files live directly under the project directory under their NOS
/// names; submitted jobs are staged under `jobs/` in submission order
/// instead of running. Useful for preparing a reconfiguration offline and
/// for inspecting exactly what would reach the host.
#[derive(Debug)]
pub struct LocalConsole {
    root: PathBuf,
    job_sequence: usize,
}

impl LocalConsole {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            job_sequence: 0,
        }
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.root.join("jobs")
    }

    /// Local path for a host file name, dropping qualifiers such as
    /// `/UN=SYSTEMX` or `/IA`.
    fn file_path(&self, name: &str) -> PathBuf {
        let file = match name.split_once('/') {
            Some((file, _)) => file,
            None => name,
        };
        self.root.join(file)
    }
}

impl Console for LocalConsole {
    fn fetch_file(
        &mut self,
        name: &str,
        _credentials: Option<&Credentials>,
    ) -> Result<String, ConsoleError> {
        let path = self.file_path(name);
        debug!("fetching {} from {}", name, path.display());
        fs_err::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ConsoleError::NotFound(name.to_string())
            } else {
                ConsoleError::Io(e)
            }
        })
    }

    fn replace_file(
        &mut self,
        name: &str,
        text: &str,
        _credentials: Option<&Credentials>,
    ) -> Result<(), ConsoleError> {
        let path = self.file_path(name);
        debug!("replacing {} at {}", name, path.display());
        fs_err::write(&path, text).map_err(|e| {
            if e.kind() == ErrorKind::PermissionDenied {
                ConsoleError::WriteDenied(name.to_string())
            } else {
                ConsoleError::Io(e)
            }
        })
    }

    fn submit_job(&mut self, job: &Job) -> Result<String, ConsoleError> {
        let jobs_dir = self.jobs_dir();
        fs_err::create_dir_all(&jobs_dir)?;
        self.job_sequence += 1;
        let path = jobs_dir.join(format!("{:02}-{}.job", self.job_sequence, job.name));
        fs_err::write(&path, job.to_text())?;
        Ok(format!("{} STAGED AT {}", job.name, path.display()))
    }
}

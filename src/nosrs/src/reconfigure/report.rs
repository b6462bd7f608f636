// nosrs/src/reconfigure/report.rs

use crate::config::CrsAction;
use crate::constants::REPORT_FILE_NAME;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nosrs_deck::Rename;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An old/new identifier pair as recorded in the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedId {
    pub old: String,
    pub new: String,
}

impl From<&Rename> for RenamedId {
    fn from(rename: &Rename) -> Self {
        Self {
            old: rename.old.clone(),
            new: rename.new.clone(),
        }
    }
}

/// What one reconfiguration run changed.
///
/// Written to the project directory after a successful run so the operator
/// has a record of which decks, files and jobs the run touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub records_updated: Vec<String>,
    pub files_updated: Vec<String>,
    pub jobs_submitted: Vec<String>,
    pub mid: Option<RenamedId>,
    pub host_id: Option<RenamedId>,
    pub crs_action: CrsAction,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            records_updated: Vec::new(),
            files_updated: Vec::new(),
            jobs_submitted: Vec::new(),
            mid: None,
            host_id: None,
            crs_action: CrsAction::None,
        }
    }

    pub fn mark_finished(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Load a report from the project directory.
    pub fn load(project_root: &Path) -> Result<Self> {
        let report_path = Self::report_path(project_root);
        let content = fs_err::read_to_string(&report_path)?;
        serde_json::from_str(&content).context(format!(
            "Error deserializing report file {}",
            report_path.display()
        ))
    }

    /// Save the report to the project directory.
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let report_path = Self::report_path(project_root);
        let content = serde_json::to_string_pretty(self)?;
        fs_err::write(&report_path, content)?;
        Ok(())
    }

    pub fn report_path(project_root: &Path) -> PathBuf {
        project_root.join(REPORT_FILE_NAME)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

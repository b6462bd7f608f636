// nosrs/src/config/props.rs

use anyhow::Context;
use linked_hash_map::LinkedHashMap;
use log::debug;
use std::path::{Path, PathBuf};

/// A sectioned property file.
///
/// Both the site configuration and the installer's settings file use the
/// same shape: `[SECTION]` headers followed by free-form lines. The lines
/// keep their section order; what they mean is up to the section.
#[derive(Debug, Clone, Default)]
pub struct PropertyFile {
    sections: LinkedHashMap<String, Vec<String>>,
}

impl PropertyFile {
    /// Parses property text.
    ///
    /// Blank lines and lines starting with `#` or `;` are skipped. Content
    /// lines are trimmed and appended to the current section; a repeated
    /// section header continues the earlier section. Lines before the first
    /// header are ignored.
    pub fn parse(text: &str) -> Self {
        let mut sections: LinkedHashMap<String, Vec<String>> = LinkedHashMap::new();
        let mut current: Option<String> = None;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_string();
                sections.entry(name.clone()).or_insert_with(Vec::new);
                current = Some(name);
                continue;
            }
            match &current {
                Some(name) => {
                    if let Some(lines) = sections.get_mut(name) {
                        lines.push(line.to_string());
                    }
                }
                None => debug!("ignoring line outside any section: {}", line),
            }
        }
        Self { sections }
    }

    /// The lines of a section, if the section is present.
    pub fn section(&self, name: &str) -> Option<&[String]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl TryFrom<&Path> for PropertyFile {
    type Error = anyhow::Error;

    fn try_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs_err::read_to_string(path)
            .context(format!("Error reading {} to string.", path.display()))?;
        Ok(Self::parse(&content))
    }
}

impl TryFrom<&PathBuf> for PropertyFile {
    type Error = anyhow::Error;

    fn try_from(path: &PathBuf) -> anyhow::Result<Self> {
        Self::try_from(path.as_path())
    }
}

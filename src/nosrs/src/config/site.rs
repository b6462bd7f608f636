// nosrs/src/config/site.rs

use crate::config::props::PropertyFile;
use crate::constants::{
    CMRDECK_SECTION, EQPDECK_SECTION, HOSTS_SECTION, NETWORK_SECTION, RESOLVER_SECTION,
};
use std::path::{Path, PathBuf};

/// The site configuration: what the operator wants changed on this host.
///
/// Each section is optional. A missing section means "leave that part of
/// the installation alone", which is why every accessor returns an
/// `Option` rather than an empty list.
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    props: PropertyFile,
}

impl SiteConfig {
    pub fn new(props: PropertyFile) -> Self {
        Self { props }
    }

    /// Machine deck overrides, `KEY=VALUE` per line.
    pub fn cmrdeck(&self) -> Option<&[String]> {
        self.props.section(CMRDECK_SECTION)
    }

    /// Equipment deck overrides, `KEY=VALUE` per line.
    pub fn eqpdeck(&self) -> Option<&[String]> {
        self.props.section(EQPDECK_SECTION)
    }

    /// Network identity overrides (`HOSTID`, `CRAYSTATION`).
    pub fn network(&self) -> Option<&[String]> {
        self.props.section(NETWORK_SECTION)
    }

    /// Host table override rows.
    pub fn hosts(&self) -> Option<&[String]> {
        self.props.section(HOSTS_SECTION)
    }

    /// Resolver configuration lines, taken verbatim.
    pub fn resolver(&self) -> Option<&[String]> {
        self.props.section(RESOLVER_SECTION)
    }
}

impl TryFrom<&Path> for SiteConfig {
    type Error = anyhow::Error;

    fn try_from(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(PropertyFile::try_from(path)?))
    }
}

impl TryFrom<&PathBuf> for SiteConfig {
    type Error = anyhow::Error;

    fn try_from(path: &PathBuf) -> anyhow::Result<Self> {
        Self::try_from(path.as_path())
    }
}

// nosrs/src/config/network.rs

//! Network identity of the host: TCP/IP host identifier and the optional
//! Cray station (CRS) link.
//!
//! The installed identity comes from the installer's settings file; the
//! requested identity comes from the `[NETWORK]` section of the site
//! configuration. Channel numbers are octal in both, as everywhere on NOS.

use crate::config::props::PropertyFile;
use crate::config::site::SiteConfig;
use crate::constants::{NPU_SECTION, STOCK_HOST_ID, SYSINFO_SECTION};
use anyhow::bail;
use log::debug;
use nosrs_deck::Rename;
use serde::{Deserialize, Serialize};

/// Identity of a Cray station link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrsInfo {
    pub lid: String,
    pub channel: i32,
    pub station_id: String,
    pub cray_id: String,
}

impl CrsInfo {
    /// The identity a stock installation assumes before any settings file
    /// has recorded one.
    pub fn stock() -> Self {
        Self {
            lid: "COS".to_string(),
            channel: -1,
            station_id: "FE".to_string(),
            cray_id: "C1".to_string(),
        }
    }

    /// Parses a settings-file entry, `CRS=<lid>,<channel>,<station>,<cray>`.
    ///
    /// Entries with fewer than four fields or a non-octal channel are
    /// ignored; the installer wrote them, not the operator.
    fn from_sysinfo(value: &str) -> Option<Self> {
        let items: Vec<&str> = value.split(',').collect();
        if items.len() < 4 {
            return None;
        }
        let channel = i32::from_str_radix(items[1].trim(), 8).ok()?;
        Some(Self {
            lid: items[0].trim().to_string(),
            channel,
            station_id: items[2].trim().to_string(),
            cray_id: items[3].trim().to_string(),
        })
    }

    /// Parses a site override,
    /// `CRAYSTATION=<name>,<lid>,<channel>,<address>[,S<station>][,C<cray>]`.
    ///
    /// The station name and address configure the station host itself and
    /// are not part of the link identity. Malformed overrides are fatal.
    fn from_station(raw: &str, value: &str) -> anyhow::Result<Self> {
        let items: Vec<&str> = value.split(',').collect();
        if items.len() < 4 {
            bail!("Invalid NETWORK definition: \"{}\"", raw);
        }
        let Ok(channel) = i32::from_str_radix(items[2].trim(), 8) else {
            bail!("Invalid CRAYSTATION channel number: \"{}\"", raw);
        };
        let mut crs = Self {
            lid: items[1].trim().to_string(),
            channel,
            station_id: "FE".to_string(),
            cray_id: "C1".to_string(),
        };
        for item in &items[4..] {
            let item = item.trim();
            if let Some(station_id) = item.strip_prefix('S') {
                crs.station_id = station_id.to_string();
            } else if let Some(cray_id) = item.strip_prefix('C') {
                crs.cray_id = cray_id.to_string();
            }
        }
        Ok(crs)
    }
}

/// What the Cray station subsystem needs after a reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrsAction {
    /// Link identity unchanged.
    None,
    /// Only the channel number changed.
    UpdateChannel,
    /// The link identity changed; the station software must be rebuilt.
    Rebuild,
}

/// Installed and requested network identity, side by side.
#[derive(Debug, Clone)]
pub struct NetworkSettings {
    pub old_host_id: String,
    pub new_host_id: Option<String>,
    pub old_crs: CrsInfo,
    pub new_crs: Option<CrsInfo>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            old_host_id: STOCK_HOST_ID.to_string(),
            new_host_id: None,
            old_crs: CrsInfo::stock(),
            new_crs: None,
        }
    }
}

impl NetworkSettings {
    /// Collects the installed identity from the settings file and the
    /// requested identity from the site configuration.
    pub fn from_props(ini: &PropertyFile, site: &SiteConfig) -> anyhow::Result<Self> {
        let mut settings = Self::default();

        for line in ini.section(NPU_SECTION).unwrap_or(&[]) {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim().to_uppercase() == "HOSTID" {
                settings.old_host_id = value.trim().to_uppercase();
            }
        }
        for line in ini.section(SYSINFO_SECTION).unwrap_or(&[]) {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim().to_uppercase() == "CRS" {
                if let Some(crs) = CrsInfo::from_sysinfo(value.trim()) {
                    settings.old_crs = crs;
                }
            }
        }

        if let Some(lines) = site.network() {
            for line in lines {
                let Some((key, value)) = line.split_once('=') else {
                    bail!("Invalid NETWORK definition: \"{}\"", line);
                };
                match key.trim().to_uppercase().as_str() {
                    "HOSTID" => settings.new_host_id = Some(value.trim().to_uppercase()),
                    "CRAYSTATION" => {
                        settings.new_crs = Some(CrsInfo::from_station(line, value.trim())?)
                    }
                    other => debug!("ignoring NETWORK key {}", other),
                }
            }
        }

        Ok(settings)
    }

    /// The pending host identifier rename, if the site requests one.
    pub fn host_id_rename(&self) -> Option<Rename> {
        self.new_host_id
            .as_ref()
            .map(|new| Rename::new(&self.old_host_id, new))
    }

    /// Compares installed and requested CRS identity.
    pub fn crs_action(&self) -> CrsAction {
        let Some(new) = &self.new_crs else {
            return CrsAction::None;
        };
        let old = &self.old_crs;
        if new.lid != old.lid || new.station_id != old.station_id || new.cray_id != old.cray_id {
            CrsAction::Rebuild
        } else if new.channel != old.channel {
            CrsAction::UpdateChannel
        } else {
            CrsAction::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::props::PropertyFile;

    fn site_with_network(lines: &str) -> SiteConfig {
        SiteConfig::new(PropertyFile::parse(&format!("[NETWORK]\n{}\n", lines)))
    }

    #[test]
    fn test_defaults_without_settings() {
        let settings =
            NetworkSettings::from_props(&PropertyFile::default(), &SiteConfig::default()).unwrap();
        assert_eq!(settings.old_host_id, "NCCM01");
        assert_eq!(settings.new_host_id, None);
        assert_eq!(settings.old_crs, CrsInfo::stock());
        assert_eq!(settings.crs_action(), CrsAction::None);
    }

    #[test]
    fn test_installed_identity_from_ini() {
        let ini = PropertyFile::parse(
            "[npu.nos287]\nhostID=nccmax\nterminals=16\n[sysinfo]\nCRS=SN1,14,FE,C1\n",
        );
        let settings = NetworkSettings::from_props(&ini, &SiteConfig::default()).unwrap();
        assert_eq!(settings.old_host_id, "NCCMAX");
        assert_eq!(settings.old_crs.lid, "SN1");
        // Channel numbers are octal.
        assert_eq!(settings.old_crs.channel, 12);
    }

    #[test]
    fn test_host_id_override_is_uppercased() {
        let site = site_with_network("HOSTID=nccdev");
        let settings = NetworkSettings::from_props(&PropertyFile::default(), &site).unwrap();
        assert_eq!(settings.new_host_id, Some("NCCDEV".to_string()));
        let rename = settings.host_id_rename().unwrap();
        assert_eq!(rename.old, "NCCM01");
        assert_eq!(rename.new, "NCCDEV");
    }

    #[test]
    fn test_craystation_defaults_and_options() {
        let site = site_with_network("CRAYSTATION=fe,COS,12,192.168.0.17");
        let settings = NetworkSettings::from_props(&PropertyFile::default(), &site).unwrap();
        let crs = settings.new_crs.unwrap();
        assert_eq!(crs.lid, "COS");
        assert_eq!(crs.channel, 10);
        assert_eq!(crs.station_id, "FE");
        assert_eq!(crs.cray_id, "C1");

        let site = site_with_network("CRAYSTATION=fe,SN1,14,192.168.0.17,SFE2,CX1");
        let settings = NetworkSettings::from_props(&PropertyFile::default(), &site).unwrap();
        let crs = settings.new_crs.unwrap();
        assert_eq!(crs.station_id, "FE2");
        assert_eq!(crs.cray_id, "X1");
    }

    #[test]
    fn test_malformed_network_overrides_are_fatal() {
        let site = site_with_network("HOSTID");
        assert!(NetworkSettings::from_props(&PropertyFile::default(), &site).is_err());

        let site = site_with_network("CRAYSTATION=fe,COS");
        assert!(NetworkSettings::from_props(&PropertyFile::default(), &site).is_err());

        let site = site_with_network("CRAYSTATION=fe,COS,9,192.168.0.17");
        assert!(NetworkSettings::from_props(&PropertyFile::default(), &site).is_err());
    }

    #[test]
    fn test_crs_action_matrix() {
        let ini = PropertyFile::parse("[sysinfo]\nCRS=COS,14,FE,C1\n");

        let site = site_with_network("CRAYSTATION=fe,COS,14,192.168.0.17");
        let settings = NetworkSettings::from_props(&ini, &site).unwrap();
        assert_eq!(settings.crs_action(), CrsAction::None);

        let site = site_with_network("CRAYSTATION=fe,COS,16,192.168.0.17");
        let settings = NetworkSettings::from_props(&ini, &site).unwrap();
        assert_eq!(settings.crs_action(), CrsAction::UpdateChannel);

        let site = site_with_network("CRAYSTATION=fe,SN1,14,192.168.0.17");
        let settings = NetworkSettings::from_props(&ini, &site).unwrap();
        assert_eq!(settings.crs_action(), CrsAction::Rebuild);

        let site = site_with_network("CRAYSTATION=fe,COS,14,192.168.0.17,SFE2");
        let settings = NetworkSettings::from_props(&ini, &site).unwrap();
        assert_eq!(settings.crs_action(), CrsAction::Rebuild);
    }
}

// nosrs/src/cli/reconfigure.rs

use crate::config::{CrsAction, NetworkSettings, PropertyFile, SiteConfig};
use crate::console::LocalConsole;
use crate::constants::{DEFAULT_INI_NAME, DEFAULT_SITE_CONFIG};
use crate::reconfigure::{Reconfiguration, RunReport};
use log::debug;
use std::path::Path;

/// Apply the site configuration to the staged installation in the project
/// directory.
pub fn reconfigure_project(project_root: &Path) -> anyhow::Result<()> {
    println!(
        "Reconfiguring NOS 2.8.7 host in: {}",
        project_root.display()
    );

    // Check that there is something to apply
    let site_path = project_root.join(DEFAULT_SITE_CONFIG);
    if !site_path.exists() {
        anyhow::bail!(
            "Expected a site configuration file: {} but it doesn't exist.",
            site_path.display()
        );
    }
    let site = SiteConfig::try_from(&site_path)?;

    // The settings file is written by the installer; a fresh staging
    // directory may not have one, in which case the stock identity applies.
    let ini_path = project_root.join(DEFAULT_INI_NAME);
    let ini = if ini_path.exists() {
        PropertyFile::try_from(&ini_path)?
    } else {
        debug!("no {} found, assuming stock identity", DEFAULT_INI_NAME);
        PropertyFile::default()
    };
    let network = NetworkSettings::from_props(&ini, &site)?;

    let mut console = LocalConsole::new(project_root);
    let report = Reconfiguration::new(&mut console, &site, network).run()?;

    report.save(project_root)?;
    println!(
        "  ✓ Wrote {}",
        RunReport::report_path(project_root).display()
    );

    println!("Reconfiguration complete");
    print_followups(&report);
    Ok(())
}

/// Remind the operator of the manual steps a run cannot do for them.
fn print_followups(report: &RunReport) {
    match report.crs_action {
        CrsAction::Rebuild => {
            println!("The Cray station link identity changed. Rebuild the");
            println!("station software before bringing the link back up.");
        }
        CrsAction::UpdateChannel => {
            println!("The Cray station channel changed. Update the channel");
            println!("number in the station configuration.");
        }
        CrsAction::None => {}
    }
    if !report.records_updated.is_empty() {
        println!("---------------------------------------------------------");
        println!("Deck records were edited into PRODUCT. Build a new");
        println!("deadstart tape, shut the system down, and deadstart from");
        println!("the new tape to activate the updated configuration.");
        println!("---------------------------------------------------------");
    }
}

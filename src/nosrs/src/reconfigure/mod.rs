// nosrs/src/reconfigure/mod.rs

//! The reconfiguration workflow.
//!
//! Applies the site configuration to an installed NOS 2.8.7 host, in the
//! order the pieces depend on each other: deck records first, then the
//! PRODUCT library edit, then the files that embed the machine identifier.
//! The run stops at the first error; nothing is rolled back.

pub mod jobs;
pub mod report;

pub use report::RunReport;

use crate::config::{NetworkSettings, SiteConfig};
use crate::console::{Console, Credentials};
use crate::constants::{
    CMRD_RECORD, EQPD_RECORD, INDIRECT_QUALIFIER, SOURCE_QUALIFIER, STOCK_MID, TCPHOST_FILE,
    TCPRSLV_FILE,
};
use anyhow::{anyhow, Result};
use nosrs_deck::{
    lidcm_name, merge_hosts, merge_text, DeckError, Directive, MergePolicy, Rename, RenameSet,
};

/// One reconfiguration run against one host.
pub struct Reconfiguration<'a, C: Console> {
    console: &'a mut C,
    site: &'a SiteConfig,
    network: NetworkSettings,
    renames: RenameSet,
    product_records: Vec<String>,
    report: RunReport,
}

impl<'a, C: Console> Reconfiguration<'a, C> {
    pub fn new(console: &'a mut C, site: &'a SiteConfig, network: NetworkSettings) -> Self {
        let mut renames = RenameSet::default();
        renames.host_id = network.host_id_rename();
        Self {
            console,
            site,
            network,
            renames,
            product_records: Vec::new(),
            report: RunReport::new(),
        }
    }

    /// Runs every step the site configuration asks for and reports what
    /// changed. Steps whose section is absent are skipped entirely.
    pub fn run(mut self) -> Result<RunReport> {
        self.merge_machine_deck()?;
        self.merge_equipment_deck()?;
        self.update_product()?;
        self.update_lidcm()?;
        self.update_resolver()?;
        self.update_hosts()?;

        self.report.crs_action = self.network.crs_action();
        if let Some(mid) = &self.renames.mid {
            self.report.mid = Some(mid.into());
        }
        if let Some(host_id) = &self.renames.host_id {
            self.report.host_id = Some(host_id.into());
        }
        self.report.mark_finished();
        Ok(self.report)
    }

    fn merge_machine_deck(&mut self) -> Result<()> {
        let Some(overrides) = self.site.cmrdeck() else {
            return Ok(());
        };
        println!("Edit {} ...", CMRD_RECORD);
        let text = self.console.fetch_file(CMRD_RECORD, None)?;
        let outcome = merge_text(&text, overrides, MergePolicy::Simple)
            .map_err(|e| anyhow!("Invalid CMRDECK definition: {}", e))?;

        // A new machine identifier cascades into LIDCMxx and TCPHOST. The
        // old one comes from the replaced line; a deck that never named one
        // still has the stock identifier.
        if let Some(new_mid) = requested_mid(overrides)? {
            let old_mid = outcome.replaced_value("MID").unwrap_or(STOCK_MID);
            self.renames.mid = Some(Rename::new(old_mid, &new_mid));
        }

        self.product_records.push(outcome.deck.to_text());
        self.report.records_updated.push(CMRD_RECORD.to_string());
        Ok(())
    }

    fn merge_equipment_deck(&mut self) -> Result<()> {
        let Some(overrides) = self.site.eqpdeck() else {
            return Ok(());
        };
        println!("Edit {} ...", EQPD_RECORD);
        let text = self.console.fetch_file(EQPD_RECORD, None)?;
        let outcome = merge_text(&text, overrides, MergePolicy::OrderedPrefix)
            .map_err(|e| anyhow!("Invalid EQPDECK definition: {}", e))?;
        self.product_records.push(outcome.deck.to_text());
        self.report.records_updated.push(EQPD_RECORD.to_string());
        Ok(())
    }

    fn update_product(&mut self) -> Result<()> {
        if self.product_records.is_empty() {
            return Ok(());
        }
        println!("Update PRODUCT ...");
        let job = jobs::update_product(&self.product_records);
        let output = self.console.submit_job(&job)?;
        for line in output.lines() {
            println!("  {}", line);
        }
        self.report.jobs_submitted.push(job.name);
        Ok(())
    }

    fn update_lidcm(&mut self) -> Result<()> {
        let Some(mid) = self.renames.mid.clone() else {
            return Ok(());
        };
        if !mid.is_change() {
            return Ok(());
        }
        let new_name = lidcm_name(&mid.new);
        println!("Create {} ...", new_name);
        let source = format!("{}/{}", lidcm_name(&mid.old), SOURCE_QUALIFIER);
        let text = self.console.fetch_file(&source, None)?;
        let updated = self.renames.propagate(&text);
        let job = jobs::replace_file(&new_name, &updated);
        self.console.submit_job(&job)?;
        self.report.files_updated.push(new_name);
        self.report.jobs_submitted.push(job.name);
        Ok(())
    }

    fn update_resolver(&mut self) -> Result<()> {
        let Some(lines) = self.site.resolver() else {
            return Ok(());
        };
        println!("Create {} ...", TCPRSLV_FILE);
        let mut text = lines.join("\n");
        text.push('\n');
        let credentials = Credentials::netadmn();
        let target = format!("{}/{}", TCPRSLV_FILE, INDIRECT_QUALIFIER);
        self.console.replace_file(&target, &text, Some(&credentials))?;
        let job = jobs::make_public(TCPRSLV_FILE);
        self.console.submit_job(&job)?;
        self.report.files_updated.push(TCPRSLV_FILE.to_string());
        self.report.jobs_submitted.push(job.name);
        Ok(())
    }

    fn update_hosts(&mut self) -> Result<()> {
        let overrides = self.site.hosts();
        if overrides.is_none() && !self.renames.mid_changed() && !self.renames.host_id_changed() {
            return Ok(());
        }
        println!("Update {} ...", TCPHOST_FILE);
        let credentials = Credentials::netadmn();
        let text = self.console.fetch_file(TCPHOST_FILE, Some(&credentials))?;
        let merged = merge_hosts(&text, overrides.unwrap_or(&[]), &self.renames);
        let target = format!("{}/{}", TCPHOST_FILE, INDIRECT_QUALIFIER);
        self.console.replace_file(&target, &merged, Some(&credentials))?;
        let job = jobs::make_public(TCPHOST_FILE);
        self.console.submit_job(&job)?;
        self.report.files_updated.push(TCPHOST_FILE.to_string());
        self.report.jobs_submitted.push(job.name);
        Ok(())
    }
}

/// The machine identifier the overrides ask for, if any. The last one
/// wins, the same way the merge applies them. Malformed overrides are
/// rejected, exactly as the merge rejects them.
fn requested_mid(overrides: &[String]) -> Result<Option<String>, DeckError> {
    let mut requested = None;
    for raw in overrides {
        let directive = Directive::from_override(raw)?;
        if directive.key == "MID" {
            requested = Some(directive.value);
        }
    }
    Ok(requested)
}

// deck/src/rename.rs

//! Propagation of machine and host identifier renames.
//!
//! Giving a host a new machine identifier (`MID`) touches more than the
//! machine deck: the per-machine `LIDCMxx` record embeds the identifier in
//! its own name and in `LID=Mxx`/`PID=Mxx` directives, and host-table rows
//! carry `Mxx` and `LOCALHOST_xx` aliases. This module rewrites all of them.

use regex::Regex;

/// An old/new identifier pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub old: String,
    pub new: String,
}

impl Rename {
    pub fn new(old: &str, new: &str) -> Self {
        Self {
            old: old.to_string(),
            new: new.to_string(),
        }
    }

    /// Whether the pair actually changes anything.
    pub fn is_change(&self) -> bool {
        self.old != self.new
    }
}

/// Pending identifier renames for one reconfiguration run.
#[derive(Debug, Clone, Default)]
pub struct RenameSet {
    /// Machine identifier, e.g. `01` -> `05`.
    pub mid: Option<Rename>,
    /// TCP/IP host identifier, e.g. `NCCM01` -> `NCCM05`.
    pub host_id: Option<Rename>,
}

impl RenameSet {
    pub fn mid_changed(&self) -> bool {
        self.mid.as_ref().map_or(false, Rename::is_change)
    }

    pub fn host_id_changed(&self) -> bool {
        self.host_id.as_ref().map_or(false, Rename::is_change)
    }

    /// Rewrites machine-identifier references in a deck record.
    ///
    /// No-op when no machine rename is pending.
    pub fn propagate(&self, text: &str) -> String {
        match &self.mid {
            Some(mid) => propagate_mid(text, mid),
            None => text.to_string(),
        }
    }

    /// The replacement for one host-table token, if any rename matches it.
    ///
    /// Comparison is case-insensitive; `M<mid>` aliases are checked before
    /// the host identifier, `LOCALHOST_<mid>` aliases last.
    pub fn renamed_token(&self, token: &str) -> Option<String> {
        let upper = token.to_uppercase();
        if let Some(mid) = &self.mid {
            if upper == format!("M{}", mid.old.to_uppercase()) {
                return Some(format!("M{}", mid.new));
            }
        }
        if let Some(host_id) = &self.host_id {
            if upper == host_id.old.to_uppercase() {
                return Some(host_id.new.clone());
            }
        }
        if let Some(mid) = &self.mid {
            if upper == format!("LOCALHOST_{}", mid.old.to_uppercase()) {
                return Some(format!("LOCALHOST_{}", mid.new));
            }
        }
        None
    }
}

/// The name of the per-machine LID configuration record.
pub fn lidcm_name(mid: &str) -> String {
    format!("LIDCM{}", mid)
}

/// Rewrites `LID=Mxx` and `PID=Mxx` directives and the record's own
/// `LIDCMxx` name for a machine-identifier rename.
///
/// The name is replaced at its first occurrence only; directive references
/// are replaced wherever they appear, including inside `NPID=Mxx,...`
/// parameter lists.
pub fn propagate_mid(text: &str, mid: &Rename) -> String {
    let renamed = text.replacen(&lidcm_name(&mid.old), &lidcm_name(&mid.new), 1);
    let pattern = format!(r"([LP]ID=M){}([,.])", regex::escape(&mid.old));
    let re = Regex::new(&pattern).expect("identifier pattern is valid");
    re.replace_all(&renamed, |caps: &regex::Captures| {
        format!("{}{}{}", &caps[1], mid.new, &caps[2])
    })
    .into_owned()
}

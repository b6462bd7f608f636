// deck/src/hosts.rs

//! Keyed merge of TCPHOST-style host tables.
//!
//! Host tables are flat text: one row per host, `<address> <name> [alias...]`,
//! keyed by the first name after the address. Unlike deck records they carry
//! no meaningful order, so the merged table is emitted sorted by key.

use std::collections::BTreeMap;

use crate::rename::RenameSet;

/// A host table keyed by the primary host name.
#[derive(Debug, Clone, Default)]
pub struct HostTable {
    rows: BTreeMap<String, String>,
}

impl HostTable {
    /// Parses existing rows, rewriting any token a pending rename matches.
    ///
    /// Only lines starting with a digit are host rows; comments and blank
    /// lines are dropped. Rows with fewer than two tokens are ignored.
    /// Tokens after the address are compared against the pending renames,
    /// and runs of whitespace collapse to a single space.
    pub fn parse(text: &str, renames: &RenameSet) -> Self {
        let mut table = Self::default();
        for line in text.lines() {
            let Some(tokens) = row_tokens(line) else {
                continue;
            };
            let mut row = vec![tokens[0].to_string()];
            for token in &tokens[1..] {
                match renames.renamed_token(token) {
                    Some(renamed) => row.push(renamed),
                    None => row.push(token.to_string()),
                }
            }
            table.insert_row(row);
        }
        table
    }

    /// Adds override rows, which win over existing rows with the same key.
    ///
    /// Overrides are taken as written; renames never apply to them.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, overrides: &[S]) {
        for line in overrides {
            if let Some(tokens) = row_tokens(line.as_ref()) {
                self.insert_row(tokens.iter().map(|t| t.to_string()).collect());
            }
        }
    }

    fn insert_row(&mut self, tokens: Vec<String>) {
        // row_tokens only yields rows with an address and at least one name.
        debug_assert!(tokens.len() >= 2);
        let key = tokens[1].to_uppercase();
        self.rows.insert(key, tokens.join(" "));
    }

    /// The row for a host name, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.rows.get(&name.to_uppercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serializes the table sorted by key, one row per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in self.rows.values() {
            out.push_str(row);
            out.push('\n');
        }
        out
    }
}

/// Whitespace-split tokens of a host row; `None` for anything that is not
/// a host row.
fn row_tokens(line: &str) -> Option<Vec<&str>> {
    if !line.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    Some(tokens)
}

// deck/src/lib.rs

//! A Rust-native library for parsing and patching NOS 2.8.7 configuration
//! decks.
//!
//! This library provides functionality to:
//! - Parse deck records (`CMRD01`, `EQPD01`, ...) into an ordered line model
//! - Merge `KEY=VALUE` override directives under section-specific policies
//! - Merge keyed `TCPHOST`-style host tables
//! - Propagate machine-identifier renames through `LIDCMxx` records and
//!   host-table aliases
//!
//! Lines an override never names are carried through untouched and in
//! place, so a patched deck stays recognizable to the operators who
//! maintain it.

pub mod deck;
pub mod error;
pub mod hosts;
pub mod merge;
pub mod rename;

pub use deck::{Deck, DeckLine, Directive};
pub use error::{DeckError, Result};
pub use hosts::HostTable;
pub use merge::{merge, MergeOutcome, MergePolicy, Replacement};
pub use rename::{lidcm_name, propagate_mid, Rename, RenameSet};

/// Merge override directives into deck text.
///
/// # Examples
///
/// ```
/// use nosrs_deck::MergePolicy;
///
/// let base = "MID=01.\nNAME=CYBER 865.\n";
/// let overrides = vec!["MID=05.".to_string()];
/// let outcome = nosrs_deck::merge_text(base, &overrides, MergePolicy::Simple)?;
/// assert_eq!(outcome.deck.to_text(), "MID=05.\nNAME=CYBER 865.\n");
/// assert_eq!(outcome.replaced_value("MID"), Some("01"));
/// # Ok::<(), nosrs_deck::DeckError>(())
/// ```
pub fn merge_text<S: AsRef<str>>(
    text: &str,
    overrides: &[S],
    policy: MergePolicy,
) -> Result<MergeOutcome> {
    merge::merge(Deck::parse(text), overrides, policy)
}

/// Merge a host table with override rows, applying pending renames to the
/// existing rows first.
///
/// # Examples
///
/// ```
/// use nosrs_deck::RenameSet;
///
/// let base = "192.168.0.20 ZETA\n192.168.0.10 NCCM01 NCC\n";
/// let overrides = vec!["192.168.0.30 OMEGA".to_string()];
/// let merged = nosrs_deck::merge_hosts(base, &overrides, &RenameSet::default());
/// assert_eq!(
///     merged,
///     "192.168.0.10 NCCM01 NCC\n192.168.0.30 OMEGA\n192.168.0.20 ZETA\n"
/// );
/// ```
pub fn merge_hosts<S: AsRef<str>>(text: &str, overrides: &[S], renames: &RenameSet) -> String {
    let mut table = HostTable::parse(text, renames);
    table.apply_overrides(overrides);
    table.to_text()
}

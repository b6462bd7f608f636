// deck/src/merge.rs

//! Positional merge of override directives into a deck record.
//!
//! Two placement policies cover the NOS deck families. Machine decks
//! (`CMRDECK`) use [`MergePolicy::Simple`]: an override replaces the first
//! line with the same key or is appended. Equipment decks (`EQPDECK`) use
//! [`MergePolicy::OrderedPrefix`], which additionally keeps numbered `EQnnn`
//! slots and `PF` parameter fields in their numeric positions.

use log::debug;

use crate::deck::{Deck, DeckLine, Directive};
use crate::error::{DeckError, Result};

/// Prefix of numbered equipment-slot keys (`EQ005`, `EQ120`, ...).
const EQ_PREFIX: &str = "EQ";
/// Key of parameter-field entries, ordered by their leading numeric field.
const PARAM_FIELD_KEY: &str = "PF";
/// Removal sentinel; never an insertion boundary for parameter fields.
const REMOVE_KEY: &str = "REMOVE";
/// Keys starting with this marker are never insertion boundaries.
const WILDCARD: char = '*';

/// Placement policy for one deck family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Replace the first line with a matching key, else append.
    Simple,
    /// Like `Simple`, but `EQnnn` and `PF` entries are inserted at their
    /// numeric position instead of appended.
    OrderedPrefix,
}

/// A directive whose value was replaced during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub key: String,
    pub old_value: String,
    pub new_value: String,
}

/// The result of applying one override group to one record.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub deck: Deck,
    pub replaced: Vec<Replacement>,
}

impl MergeOutcome {
    /// The value `key` held before the merge, if the merge replaced it.
    pub fn replaced_value(&self, key: &str) -> Option<&str> {
        self.replaced
            .iter()
            .find(|r| r.key == key)
            .map(|r| r.old_value.as_str())
    }
}

/// Applies override directives to `deck` in order, under `policy`.
///
/// Lines never named by an override are left untouched, in place. Each
/// override either replaces exactly one line or adds exactly one line.
pub fn merge<S: AsRef<str>>(
    deck: Deck,
    overrides: &[S],
    policy: MergePolicy,
) -> Result<MergeOutcome> {
    let mut deck = deck;
    let mut replaced = Vec::new();
    for raw in overrides {
        let raw = raw.as_ref();
        let directive = Directive::from_override(raw)?;
        match policy {
            MergePolicy::Simple => apply_simple(&mut deck, directive, &mut replaced),
            MergePolicy::OrderedPrefix => apply_ordered(&mut deck, raw, directive, &mut replaced)?,
        }
    }
    Ok(MergeOutcome { deck, replaced })
}

enum Placement {
    Replace(usize),
    Insert(usize),
}

fn apply_simple(deck: &mut Deck, directive: Directive, replaced: &mut Vec<Replacement>) {
    let target = deck
        .lines()
        .iter()
        .position(|line| line.directive().map_or(false, |d| d.key == directive.key));
    match target {
        Some(index) => replace_at(deck, index, directive, replaced),
        None => {
            debug!("appending {}", directive.key);
            deck.push(DeckLine::Directive(directive));
        }
    }
}

fn apply_ordered(
    deck: &mut Deck,
    raw: &str,
    directive: Directive,
    replaced: &mut Vec<Replacement>,
) -> Result<()> {
    let in_eq_family = directive.key.starts_with(EQ_PREFIX);
    let override_suffix = eq_suffix(&directive.key);
    let is_param_field = directive.key == PARAM_FIELD_KEY;
    let override_index = if is_param_field {
        Some(require_param_index(raw, &directive)?)
    } else {
        None
    };

    let mut eq_seen = false;
    let mut param_field_seen = false;
    let mut placement = None;

    for (i, line) in deck.lines().iter().enumerate() {
        let existing = match line.directive() {
            Some(d) => d,
            None => continue,
        };
        if existing.key.starts_with(EQ_PREFIX) {
            eq_seen = true;
        }
        if existing.key == PARAM_FIELD_KEY {
            param_field_seen = true;
        }
        let boundary = !existing.key.starts_with(WILDCARD);

        if existing.key == directive.key {
            if let Some(index) = override_index {
                // Parameter fields match on their numeric index, not just
                // the key. An index between two existing ones slots in; a
                // larger one keeps scanning.
                match existing.param_index() {
                    Some(existing_index) if index == existing_index => {
                        placement = Some(Placement::Replace(i));
                        break;
                    }
                    Some(existing_index) if index < existing_index => {
                        placement = Some(Placement::Insert(i));
                        break;
                    }
                    _ => {}
                }
            } else {
                placement = Some(Placement::Replace(i));
                break;
            }
        } else if eq_seen && in_eq_family && boundary {
            let slot = !existing.key.starts_with(EQ_PREFIX)
                || matches!(
                    (override_suffix, eq_suffix(&existing.key)),
                    (Some(new), Some(old)) if new < old
                );
            if slot {
                placement = Some(Placement::Insert(i));
                break;
            }
        } else if param_field_seen && is_param_field && boundary && existing.key != REMOVE_KEY {
            placement = Some(Placement::Insert(i));
            break;
        }
    }

    match placement {
        Some(Placement::Replace(index)) => replace_at(deck, index, directive, replaced),
        Some(Placement::Insert(index)) => deck.insert(index, DeckLine::Directive(directive)),
        None => {
            debug!("no slot found for {}; appending", directive.key);
            deck.push(DeckLine::Directive(directive));
        }
    }
    Ok(())
}

fn replace_at(deck: &mut Deck, index: usize, incoming: Directive, replaced: &mut Vec<Replacement>) {
    if let DeckLine::Directive(existing) = &mut deck.lines_mut()[index] {
        debug!("replacing {}={} with {}", existing.key, existing.value, incoming.value);
        let old_value = std::mem::replace(&mut existing.value, incoming.value);
        existing.terminator = existing.terminator || incoming.terminator;
        replaced.push(Replacement {
            key: existing.key.clone(),
            old_value,
            new_value: existing.value.clone(),
        });
    }
}

/// Numeric suffix of an `EQnnn` key. `None` for keys outside the family
/// and for non-numeric suffixes.
fn eq_suffix(key: &str) -> Option<u32> {
    key.strip_prefix(EQ_PREFIX)?.parse().ok()
}

/// The numeric index an override parameter field must carry.
fn require_param_index(raw: &str, directive: &Directive) -> Result<u32> {
    let (field, _) = directive
        .value
        .split_once(',')
        .ok_or_else(|| DeckError::MissingParamIndex(raw.to_string()))?;
    field
        .trim()
        .parse()
        .map_err(|_| DeckError::MissingParamIndex(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_deck() -> Deck {
        Deck::parse(
            "*  CMRD01 - MACHINE DECK.\n\
             MID=01.\n\
             NAME=NCCMAX - CYBER 865.\n\
             DFT=OFF.\n",
        )
    }

    fn equipment_deck() -> Deck {
        Deck::parse(
            "*  EQPD01 - EQUIPMENT DECK.\n\
             EQ005=DQ,ST=ON,EQ=5,UN=0,CH=1.\n\
             EQ010=DE,ST=ON,SZ=2,CH=2.\n\
             PF=1,MS,DM.\n\
             PF=3,MS,DM.\n\
             REMOVE=2.\n\
             *END.\n",
        )
    }

    fn keys(deck: &Deck) -> Vec<&str> {
        deck.directives().map(|d| d.key.as_str()).collect()
    }

    #[test]
    fn test_simple_replace_keeps_position() {
        let overrides = vec!["MID=05".to_string()];
        let outcome = merge(machine_deck(), &overrides, MergePolicy::Simple).unwrap();
        assert_eq!(
            outcome.deck.to_text(),
            "*  CMRD01 - MACHINE DECK.\nMID=05.\nNAME=NCCMAX - CYBER 865.\nDFT=OFF.\n"
        );
    }

    #[test]
    fn test_simple_records_replaced_value() {
        let overrides = vec!["MID=05.".to_string(), "DFT=ON.".to_string()];
        let outcome = merge(machine_deck(), &overrides, MergePolicy::Simple).unwrap();
        assert_eq!(outcome.replaced_value("MID"), Some("01"));
        assert_eq!(outcome.replaced_value("DFT"), Some("OFF"));
        assert_eq!(outcome.replaced_value("NAME"), None);
    }

    #[test]
    fn test_simple_appends_unknown_key() {
        let overrides = vec!["CSM=4000.".to_string()];
        let outcome = merge(machine_deck(), &overrides, MergePolicy::Simple).unwrap();
        assert_eq!(outcome.deck.lines().len(), 5);
        assert_eq!(outcome.deck.to_string().lines().last(), Some("CSM=4000."));
        assert!(outcome.replaced.is_empty());
    }

    #[test]
    fn test_simple_is_idempotent() {
        let overrides = vec!["MID=05.".to_string(), "CSM=4000.".to_string()];
        let once = merge(machine_deck(), &overrides, MergePolicy::Simple).unwrap();
        let twice = merge(once.deck.clone(), &overrides, MergePolicy::Simple).unwrap();
        assert_eq!(once.deck.to_text(), twice.deck.to_text());
    }

    #[test]
    fn test_replace_keeps_base_terminator() {
        let deck = Deck::parse("DFT=OFF\n");
        let outcome = merge(deck, &vec!["DFT=ON".to_string()], MergePolicy::Simple).unwrap();
        assert_eq!(outcome.deck.to_text(), "DFT=ON\n");
        let deck = Deck::parse("DFT=OFF.\n");
        let outcome = merge(deck, &vec!["DFT=ON".to_string()], MergePolicy::Simple).unwrap();
        assert_eq!(outcome.deck.to_text(), "DFT=ON.\n");
    }

    #[test]
    fn test_replace_takes_override_terminator() {
        // The base line had no terminator, so the override's is used.
        let deck = Deck::parse("DFT=OFF\n");
        let outcome = merge(deck, &vec!["DFT=ON.".to_string()], MergePolicy::Simple).unwrap();
        assert_eq!(outcome.deck.to_text(), "DFT=ON.\n");
    }

    #[test]
    fn test_malformed_override_fails() {
        let err = merge(machine_deck(), &vec!["MID".to_string()], MergePolicy::Simple).unwrap_err();
        assert_eq!(err, DeckError::MissingAssignment("MID".to_string()));
    }

    #[test]
    fn test_ordered_replaces_exact_slot() {
        let overrides = vec!["EQ010=DE,ST=ON,SZ=4,CH=2.".to_string()];
        let outcome = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(
            outcome.deck.get("EQ010").unwrap().value,
            "DE,ST=ON,SZ=4,CH=2"
        );
        assert_eq!(outcome.replaced_value("EQ010"), Some("DE,ST=ON,SZ=2,CH=2"));
        assert_eq!(outcome.deck.len(), equipment_deck().len());
    }

    #[test]
    fn test_ordered_inserts_slot_by_suffix() {
        let overrides = vec!["EQ007=NP,ST=ON,CH=5.".to_string()];
        let outcome = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(
            keys(&outcome.deck),
            vec!["EQ005", "EQ007", "EQ010", "PF", "PF", "REMOVE"]
        );
    }

    #[test]
    fn test_ordered_inserts_largest_slot_before_unrelated_key() {
        // EQ020 is larger than every existing slot, so it lands right after
        // the family, ahead of the first unrelated directive.
        let overrides = vec!["EQ020=NP,ST=ON,CH=7.".to_string()];
        let outcome = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(
            keys(&outcome.deck),
            vec!["EQ005", "EQ010", "EQ020", "PF", "PF", "REMOVE"]
        );
    }

    #[test]
    fn test_ordered_inserts_between_adjacent_slots() {
        let deck = Deck::parse("EQ01=DQ.\nEQ03=DE.\n*END\n");
        let overrides = vec!["EQ02=FOO".to_string()];
        let outcome = merge(deck, &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(outcome.deck.to_text(), "EQ01=DQ.\nEQ02=FOO\nEQ03=DE.\n*END\n");
    }

    #[test]
    fn test_ordered_param_field_example() {
        let deck = Deck::parse("PF=1,A\nPF=3,B\n");
        let overrides = vec!["PF=2,C".to_string()];
        let outcome = merge(deck, &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(outcome.deck.to_text(), "PF=1,A\nPF=2,C\nPF=3,B\n");
    }

    #[test]
    fn test_ordered_skips_wildcard_lines() {
        let deck = Deck::parse("EQ005=DQ,CH=1.\n*DOWN=EQ006.\nEQ010=DE,CH=2.\n");
        let overrides = vec!["EQ007=NP,CH=5.".to_string()];
        let outcome = merge(deck, &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(
            outcome.deck.to_text(),
            "EQ005=DQ,CH=1.\n*DOWN=EQ006.\nEQ007=NP,CH=5.\nEQ010=DE,CH=2.\n"
        );
    }

    #[test]
    fn test_ordered_family_key_without_numeric_suffix() {
        // EQX counts as family for placement purposes but never wins the
        // numeric comparison itself.
        let deck = Deck::parse("EQX=FOO\nEQ010=A.\n");
        let overrides = vec!["EQ005=B.".to_string()];
        let outcome = merge(deck, &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(outcome.deck.to_text(), "EQX=FOO\nEQ005=B.\nEQ010=A.\n");

        let deck = Deck::parse("EQX=FOO\nPRODUCT=SYS.\n");
        let outcome = merge(deck, &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(outcome.deck.to_text(), "EQX=FOO\nEQ005=B.\nPRODUCT=SYS.\n");
    }

    #[test]
    fn test_ordered_slot_sequence_stays_ascending() {
        let deck = Deck::parse("EQ005=DQ,CH=1.\nEQ010=DE,CH=2.\n*END.\n");
        let overrides = vec![
            "EQ012=NP,CH=5.".to_string(),
            "EQ003=DS,CH=0.".to_string(),
            "EQ008=DL,CH=3.".to_string(),
        ];
        let outcome = merge(deck, &overrides, MergePolicy::OrderedPrefix).unwrap();
        let suffixes: Vec<u32> = outcome
            .deck
            .directives()
            .filter_map(|d| eq_suffix(&d.key))
            .collect();
        assert_eq!(suffixes, vec![3, 5, 8, 10, 12]);
    }

    #[test]
    fn test_ordered_replaces_param_field_with_equal_index() {
        let overrides = vec!["PF=3,MS,DM,NO=1.".to_string()];
        let outcome = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(outcome.replaced_value("PF"), Some("3,MS,DM"));
        assert_eq!(outcome.deck.len(), equipment_deck().len());
    }

    #[test]
    fn test_ordered_inserts_param_field_between_indices() {
        let overrides = vec!["PF=2,MS,DM.".to_string()];
        let outcome = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap();
        let pf_indices: Vec<u32> = outcome
            .deck
            .directives()
            .filter(|d| d.key == "PF")
            .filter_map(|d| d.param_index())
            .collect();
        assert_eq!(pf_indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_ordered_skips_base_param_field_without_index() {
        // A base PF line with no parsable index never matches by index;
        // the override slots in against the next line that has one.
        let deck = Deck::parse("PF=UNKNOWN\nPF=3,B\n");
        let overrides = vec!["PF=2,C".to_string()];
        let outcome = merge(deck, &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(outcome.deck.to_text(), "PF=UNKNOWN\nPF=2,C\nPF=3,B\n");
    }

    #[test]
    fn test_ordered_groups_param_field_before_unrelated_key() {
        let deck = Deck::parse("PF=1,MS.\nPF=3,MS.\nPRODUCT=SYS.\n");
        let overrides = vec!["PF=9,MS.".to_string()];
        let outcome = merge(deck, &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(
            outcome.deck.to_text(),
            "PF=1,MS.\nPF=3,MS.\nPF=9,MS.\nPRODUCT=SYS.\n"
        );
    }

    #[test]
    fn test_ordered_param_field_skips_remove_sentinel() {
        // REMOVE and wildcard lines are not boundaries, so a parameter field
        // larger than all existing ones falls through to an append.
        let overrides = vec!["PF=9,MS,DM.".to_string()];
        let outcome = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(outcome.deck.to_string().lines().last(), Some("PF=9,MS,DM."));
    }

    #[test]
    fn test_ordered_param_field_without_index_fails() {
        let overrides = vec!["PF=MS,DM.".to_string()];
        let err = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap_err();
        assert_eq!(err, DeckError::MissingParamIndex("PF=MS,DM.".to_string()));
        let overrides = vec!["PF=4.".to_string()];
        assert!(merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).is_err());
    }

    #[test]
    fn test_ordered_replaces_plain_key() {
        let overrides = vec!["REMOVE=4.".to_string()];
        let outcome = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(outcome.deck.get("REMOVE").unwrap().value, "4");
        assert_eq!(outcome.replaced_value("REMOVE"), Some("2"));
    }

    #[test]
    fn test_ordered_appends_unknown_key() {
        let overrides = vec!["DDP=ON.".to_string()];
        let outcome = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap();
        assert_eq!(outcome.deck.to_string().lines().last(), Some("DDP=ON."));
    }

    #[test]
    fn test_untouched_lines_survive_both_policies() {
        let overrides = vec!["EQ007=NP,CH=5.".to_string()];
        let outcome = merge(equipment_deck(), &overrides, MergePolicy::OrderedPrefix).unwrap();
        let text = outcome.deck.to_text();
        assert!(text.starts_with("*  EQPD01 - EQUIPMENT DECK.\n"));
        assert!(text.contains("REMOVE=2.\n*END.\n"));
    }
}

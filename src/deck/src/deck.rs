// deck/src/deck.rs

//! Ordered line model for NOS configuration deck records.
//!
//! A deck record (`CMRD01`, `EQPD01`, ...) is a sequence of lines. Lines of
//! the form `KEY=VALUE` or `KEY=VALUE.` are directives; everything else
//! (comment lines starting with `*`, blank lines, keyword-only entries such
//! as `PROBE.`) is opaque and round-trips byte-for-byte.

use std::fmt;

use crate::error::{DeckError, Result};

/// A single `KEY=VALUE[.]` directive within a deck record.
///
/// The key and value are stored trimmed, without the optional trailing `.`
/// terminator; the terminator is tracked separately so a replaced line keeps
/// its original termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub key: String,
    pub value: String,
    pub terminator: bool,
}

impl Directive {
    pub fn new(key: &str, value: &str, terminator: bool) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            terminator,
        }
    }

    /// Parses one existing deck line, preserving the case of key and value.
    ///
    /// Returns `None` for lines that are not directives, i.e. lines without
    /// `=` or with an empty key.
    pub(crate) fn parse_line(line: &str) -> Option<Self> {
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        let (value, terminator) = split_terminator(value);
        Some(Self {
            key: key.to_string(),
            value,
            terminator,
        })
    }

    /// Builds an override directive from a raw `KEY=VALUE` string.
    ///
    /// Overrides are normalized to upper case on both sides of the `=`. A
    /// missing `=` or an empty key is fatal.
    pub fn from_override(raw: &str) -> Result<Self> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| DeckError::MissingAssignment(raw.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DeckError::MissingAssignment(raw.to_string()));
        }
        let (value, terminator) = split_terminator(value);
        Ok(Self {
            key: key.to_uppercase(),
            value: value.to_uppercase(),
            terminator,
        })
    }

    /// First comma-delimited field of the value parsed as a number.
    ///
    /// Parameter-field entries (`PF=3,MS,DM.`) carry their ordering index
    /// there. Returns `None` when the field is not numeric.
    pub fn param_index(&self) -> Option<u32> {
        let field = self.value.split(',').next()?;
        field.trim().parse().ok()
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)?;
        if self.terminator {
            write!(f, ".")?;
        }
        Ok(())
    }
}

/// Splits an optional trailing `.` terminator off a raw directive value.
fn split_terminator(raw: &str) -> (String, bool) {
    let value = raw.trim();
    match value.strip_suffix('.') {
        Some(stripped) => (stripped.trim_end().to_string(), true),
        None => (value.to_string(), false),
    }
}

/// One line of a deck record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckLine {
    /// A `KEY=VALUE[.]` directive.
    Directive(Directive),
    /// Any other line, preserved verbatim.
    Opaque(String),
}

impl DeckLine {
    /// The directive on this line, if it is one.
    pub fn directive(&self) -> Option<&Directive> {
        match self {
            DeckLine::Directive(d) => Some(d),
            DeckLine::Opaque(_) => None,
        }
    }
}

impl fmt::Display for DeckLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckLine::Directive(d) => d.fmt(f),
            DeckLine::Opaque(s) => f.write_str(s),
        }
    }
}

/// An ordered NOS deck record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    lines: Vec<DeckLine>,
}

impl Deck {
    /// Parses deck text into the line model.
    ///
    /// Parsing never fails: lines that are not directives become opaque
    /// lines and serialize back exactly as read. Directive lines render in
    /// canonical `KEY=VALUE[.]` form, which is the form NOS decks use.
    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| match Directive::parse_line(line) {
                Some(directive) => DeckLine::Directive(directive),
                None => DeckLine::Opaque(line.to_string()),
            })
            .collect();
        Self { lines }
    }

    /// Serializes the record, one line per entry, newline-terminated.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    pub fn lines(&self) -> &[DeckLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First directive with the given key, if any.
    pub fn get(&self, key: &str) -> Option<&Directive> {
        self.directives().find(|d| d.key == key)
    }

    /// All directives in record order.
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.lines.iter().filter_map(DeckLine::directive)
    }

    pub(crate) fn insert(&mut self, index: usize, line: DeckLine) {
        self.lines.insert(index, line);
    }

    pub(crate) fn push(&mut self, line: DeckLine) {
        self.lines.push(line);
    }

    pub(crate) fn lines_mut(&mut self) -> &mut [DeckLine] {
        &mut self.lines
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

//! INI parsing using Pest.
//!
//! The dialect follows the defaults of the configuration files these clients
//! have always used: `[section]` headers, `key = value` or `key: value`
//! entries, `#`/`;` comment lines and continuation lines. Keys are
//! case-insensitive and stored lower-cased.
//!
//! Headers and entries may be indented. A line indented deeper than the entry
//! before it continues that entry's value, whatever it looks like.

use pest::error::LineColLocation;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use std::collections::BTreeMap;

/// Section whose keys are visible from every other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Parser for the INI grammar.
#[derive(Parser)]
#[grammar = "config/ini.pest"]
struct IniParser;

/// A syntax or structure error, positioned at a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl IniError {
    fn at(pair: &Pair<Rule>, message: String) -> Self {
        let (line, column) = pair.as_span().start_pos().line_col();
        Self {
            line,
            column,
            message,
        }
    }

    /// Position of the first byte that is not UTF-8.
    fn invalid_utf8(err: &std::string::FromUtf8Error) -> Self {
        let valid = String::from_utf8_lossy(&err.as_bytes()[..err.utf8_error().valid_up_to()]);
        let line = valid.matches('\n').count() + 1;
        let column = valid.rsplit('\n').next().map_or(0, |tail| tail.chars().count()) + 1;
        Self {
            line,
            column,
            message: "file is not valid UTF-8".to_string(),
        }
    }
}

impl From<pest::error::Error<Rule>> for IniError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let (line, column) = match err.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        };
        Self {
            line,
            column,
            message: "expected a [section] header, a 'key = value' entry or a comment".to_string(),
        }
    }
}

/// Width of the line's leading whitespace and the rest of the line's pairs.
fn split_indent<'i>(pair: &Pair<'i, Rule>) -> (usize, Pairs<'i, Rule>) {
    let mut inner = pair.clone().into_inner();
    let indent = inner
        .next()
        .map(|p| p.as_str().chars().count())
        .unwrap_or_default();
    (indent, inner)
}

/// Parsed configuration: section name to key to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    /// Parse raw file contents, which must be UTF-8.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, IniError> {
        let text = String::from_utf8(bytes).map_err(|e| IniError::invalid_utf8(&e))?;
        Self::parse(&text)
    }

    /// Parse INI text.
    pub fn parse(input: &str) -> Result<Self, IniError> {
        let mut doc = IniDocument::default();
        let Some(file) = IniParser::parse(Rule::file, input)?.next() else {
            return Ok(doc);
        };

        let mut current: Option<String> = None;
        // Key and indent of the entry that deeper lines continue
        let mut open_entry: Option<(String, usize)> = None;

        for pair in file.into_inner() {
            let rule = pair.as_rule();
            if !matches!(rule, Rule::section | Rule::entry | Rule::continuation) {
                continue;
            }
            let (indent, mut inner) = split_indent(&pair);

            if let (Some(section), Some((key, level))) = (&current, &open_entry) {
                if indent > *level {
                    if let Some(value) = doc
                        .sections
                        .get_mut(section)
                        .and_then(|entries| entries.get_mut(key))
                    {
                        value.push('\n');
                        value.push_str(pair.as_str().trim());
                    }
                    continue;
                }
            }

            match rule {
                Rule::section => {
                    let name = inner
                        .next()
                        .map(|p| p.as_str().to_string())
                        .unwrap_or_default();
                    if doc.sections.contains_key(&name) {
                        return Err(IniError::at(
                            &pair,
                            format!("section [{}] already exists", name),
                        ));
                    }
                    doc.sections.insert(name.clone(), BTreeMap::new());
                    current = Some(name);
                    open_entry = None;
                }
                Rule::entry => {
                    let section = match &current {
                        Some(section) => section.clone(),
                        None => {
                            return Err(IniError::at(
                                &pair,
                                "entry found before any [section] header".to_string(),
                            ))
                        }
                    };
                    let key = inner
                        .next()
                        .map(|p| p.as_str().trim().to_lowercase())
                        .unwrap_or_default();
                    let value = inner
                        .next()
                        .map(|p| p.as_str().trim().to_string())
                        .unwrap_or_default();
                    if key.is_empty() {
                        return Err(IniError::at(&pair, "entry has an empty key".to_string()));
                    }

                    let entries = doc.sections.entry(section.clone()).or_default();
                    if entries.contains_key(&key) {
                        return Err(IniError::at(
                            &pair,
                            format!("key '{}' already exists in section [{}]", key, section),
                        ));
                    }
                    entries.insert(key.clone(), value);
                    open_entry = Some((key, indent));
                }
                Rule::continuation if open_entry.is_some() => {
                    return Err(IniError::at(
                        &pair,
                        "line is not a 'key = value' entry and is not indented past the one above"
                            .to_string(),
                    ));
                }
                _ => {
                    return Err(IniError::at(
                        &pair,
                        "indented line does not continue any entry".to_string(),
                    ));
                }
            }
        }

        Ok(doc)
    }

    /// Whether a section header was present.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Names of all sections, excluding `DEFAULT`.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections
            .keys()
            .map(String::as_str)
            .filter(|name| *name != DEFAULT_SECTION)
    }

    /// Look up `key` in `section`, falling back to `[DEFAULT]`.
    ///
    /// Returns `None` when the section itself is absent, even if `[DEFAULT]`
    /// carries the key.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        let entries = self.sections.get(section)?;
        entries
            .get(&key)
            .or_else(|| {
                self.sections
                    .get(DEFAULT_SECTION)
                    .and_then(|defaults| defaults.get(&key))
            })
            .map(String::as_str)
    }

    /// All entries of `section`, without `[DEFAULT]` fallbacks.
    pub fn section(&self, section: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(section)
    }
}

//! Split one concatenated multi-species corpus into per-species sections.
//!
//! A heading is a line of uppercase letters, spaces, hyphens and
//! apostrophes with a blank line on both sides:
//!
//!   ...end of previous species.
//!
//!   GEONOSIAN
//!
//!   Geonosians are ...

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z '\-’‘–—]*$").unwrap());

/// A heading key and the raw text that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Sections {
    sections: Vec<Section>,
}

/// Uppercase, ASCII apostrophes and hyphens, single spaces.
pub fn canonical_key(name: &str) -> String {
    let normalized: String = name
        .chars()
        .map(|c| match c {
            '’' | '‘' => '\'',
            '–' | '—' => '-',
            other => other,
        })
        .collect();
    normalized
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn is_blank(line: Option<&&str>) -> bool {
    line.is_none_or(|l| l.trim().is_empty())
}

impl Sections {
    pub fn segment(corpus: &str) -> Self {
        let text = corpus.replace("\r\n", "\n");
        let lines: Vec<&str> = text.lines().collect();

        let headings: Vec<usize> = (0..lines.len())
            .filter(|&i| {
                let line = lines[i].trim();
                RE_HEADING.is_match(line)
                    && (i == 0 || is_blank(lines.get(i - 1)))
                    && i + 1 < lines.len()
                    && is_blank(lines.get(i + 1))
            })
            .collect();

        let sections = headings
            .iter()
            .enumerate()
            .map(|(n, &start)| {
                let end = headings.get(n + 1).copied().unwrap_or(lines.len());
                Section {
                    key: canonical_key(lines[start]),
                    text: lines[start + 1..end].join("\n").trim().to_string(),
                }
            })
            .collect();

        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.key.as_str())
    }

    /// Section text by canonical key. A heading repeated later in the
    /// corpus replaces the earlier one.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .rev()
            .find(|s| s.key == key)
            .map(|s| s.text.as_str())
    }

    /// Resolve a catalog name: its own heading first, then the alias table.
    pub fn lookup(&self, name: &str, aliases: &BTreeMap<String, String>) -> Option<&str> {
        let key = canonical_key(name);
        self.get(&key).or_else(|| {
            aliases
                .get(&key)
                .and_then(|alias| self.get(&canonical_key(alias)))
        })
    }
}

//! Operator input for fields a document does not provide.
//!
//! Parsing stays a pure function of the text; the single-entity path asks
//! a `Prompter` only after extraction, for the gaps it left.

use std::io::{self, BufRead, Write};

/// The named gaps where the single-entity path may ask for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingField {
    Homeworld,
    Move,
    Size,
    Plural,
    Sources,
    NativeLanguage,
    LanguageDescription,
    AttributeDice,
}

impl MissingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Homeworld => "homeworld",
            Self::Move => "move",
            Self::Size => "size",
            Self::Plural => "plural",
            Self::Sources => "sources",
            Self::NativeLanguage => "languages.native",
            Self::LanguageDescription => "languages.description",
            Self::AttributeDice => "stats.attributeDice",
        }
    }
}

pub trait Prompter {
    /// Ask for one value. An empty answer leaves the field to its default.
    fn ask(&mut self, field: MissingField, question: &str) -> String;
}

/// Reads answers from standard input.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, field: MissingField, question: &str) -> String {
        print!("{question}");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => line.trim().to_string(),
            Err(e) => {
                tracing::warn!("could not read {}: {e}", field.as_str());
                String::new()
            }
        }
    }
}

/// Answers nothing; every gap falls through to its default.
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn ask(&mut self, field: MissingField, _question: &str) -> String {
        tracing::debug!("no value supplied for {}", field.as_str());
        String::new()
    }
}

/// Canned answers, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedPrompter {
    pub answers: std::collections::HashMap<MissingField, String>,
    pub asked: Vec<MissingField>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn with(answers: &[(MissingField, &str)]) -> Self {
        Self {
            answers: answers.iter().map(|(f, a)| (*f, a.to_string())).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, field: MissingField, _question: &str) -> String {
        self.asked.push(field);
        self.answers.get(&field).cloned().unwrap_or_default()
    }
}

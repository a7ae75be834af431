//! Turn one species' text into a draft record.
//!
//! Labeled text goes through the label blocks and their sub-parsers;
//! text without any label goes through the sentence classifier. Either
//! way the result is a `SpeciesDraft` whose empty fields mean "not found".

use species_types::{Ability, AttributeMap, Languages, StoryFactor};

use crate::abilities::parse_abilities;
use crate::attributes::parse_attribute_block;
use crate::classify::classify;
use crate::config::{Aliases, Config};
use crate::label::{self, LabelSet, collapse_whitespace, first_line};
use crate::prompt::{MissingField, Prompter};
use crate::story::parse_story_factors;

/// Extracted fragments of one species, before id and slug exist.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SpeciesDraft {
    pub name: String,
    pub plural: String,
    pub description: String,
    pub personality: String,
    pub physical_description: String,
    pub homeworld: String,
    pub languages: Languages,
    pub example_names: Vec<String>,
    pub adventurers: String,
    pub attribute_dice: String,
    pub attributes: AttributeMap,
    pub move_: String,
    pub size: String,
    pub special_abilities: Vec<Ability>,
    pub story_factors: Vec<StoryFactor>,
    pub sources: Vec<String>,
}

pub struct Extractor<'a> {
    labels: LabelSet,
    aliases: &'a Aliases,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            labels: LabelSet::new(&config.aliases.homeworld_labels),
            aliases: &config.aliases,
        }
    }

    pub fn has_labels(&self, text: &str) -> bool {
        self.labels.first_offset(text).is_some()
    }

    /// Parse a species body (no name line), picking the labeled or the
    /// label-free path.
    pub fn parse_body(&self, body: &str) -> SpeciesDraft {
        if self.has_labels(body) {
            self.parse_labeled(body)
        } else {
            self.parse_unlabeled(body)
        }
    }

    /// Labeled path. Description is the prose before the first label;
    /// description, personality, physical description and homeworld fall
    /// back to the classifier run over that prose.
    pub fn parse_labeled(&self, body: &str) -> SpeciesDraft {
        let labels = &self.labels;
        let prose_end = labels.first_offset(body).unwrap_or(body.len());
        let prose = &body[..prose_end];
        let fallback = classify(prose);

        let languages_block = labels.extract(body, label::LANGUAGES);
        let (attribute_dice, attributes) =
            parse_attribute_block(&labels.extract(body, label::ATTRIBUTE_DICE), &self.aliases.attributes);

        SpeciesDraft {
            description: or_else(non_blank_lines(prose), fallback.description),
            personality: or_else(labels.extract(body, label::PERSONALITY), fallback.personality),
            physical_description: or_else(
                labels.extract(body, label::PHYSICAL_DESCRIPTION),
                fallback.physical_description,
            ),
            homeworld: or_else(
                first_line(&labels.extract_any(body, &self.aliases.homeworld_labels)),
                fallback.homeworld,
            ),
            languages: Languages {
                native: or_else(first_word(&languages_block), fallback.native_language),
                description: languages_block,
            },
            example_names: split_names(&labels.extract(body, label::EXAMPLE_NAMES)),
            adventurers: labels.extract(body, label::ADVENTURERS),
            attribute_dice,
            attributes,
            move_: first_line(&labels.extract(body, label::MOVE)),
            size: first_line(&labels.extract(body, label::SIZE)),
            special_abilities: parse_abilities(&labels.extract(body, label::SPECIAL_ABILITIES)),
            story_factors: parse_story_factors(&labels.extract(body, label::STORY_FACTORS)),
            ..SpeciesDraft::default()
        }
    }

    /// Label-free path: only what the classifier can find.
    pub fn parse_unlabeled(&self, body: &str) -> SpeciesDraft {
        let c = classify(body);
        SpeciesDraft {
            description: c.description,
            personality: c.personality,
            physical_description: c.physical_description,
            homeworld: c.homeworld,
            languages: Languages {
                native: c.native_language,
                description: String::new(),
            },
            ..SpeciesDraft::default()
        }
    }

    /// Single-species document: the first non-empty line is the name, the
    /// rest is the body.
    pub fn parse_document(&self, text: &str) -> SpeciesDraft {
        let (name, body) = split_name_line(text);
        let mut draft = self.parse_body(body);
        draft.name = name;
        draft
    }
}

/// Ask the operator for the gaps extraction left in a single-species
/// draft. Plural and sources never come from the text, so they are always
/// asked; an empty answer keeps the normalizer's default.
pub fn fill_gaps(draft: &mut SpeciesDraft, prompter: &mut dyn Prompter, default_source: &str) {
    let mut ask_if_empty = |value: &mut String, field: MissingField, question: &str| {
        if value.trim().is_empty() {
            *value = prompter.ask(field, question).trim().to_string();
        }
    };

    ask_if_empty(
        &mut draft.homeworld,
        MissingField::Homeworld,
        "Homeworld not found in source. Please enter homeworld: ",
    );
    ask_if_empty(&mut draft.move_, MissingField::Move, "Move value (e.g., '10/12'): ");
    ask_if_empty(&mut draft.size, MissingField::Size, "Size value (e.g., '1.6-1.8 meters'): ");
    ask_if_empty(
        &mut draft.languages.native,
        MissingField::NativeLanguage,
        "Please provide the native language: ",
    );
    ask_if_empty(
        &mut draft.languages.description,
        MissingField::LanguageDescription,
        "Languages description: ",
    );
    ask_if_empty(
        &mut draft.attribute_dice,
        MissingField::AttributeDice,
        "Attribute Dice (e.g., '12D'): ",
    );

    let question = format!("Plural form (default '{}s'): ", draft.name);
    ask_if_empty(&mut draft.plural, MissingField::Plural, &question);

    if draft.sources.is_empty() {
        let question = format!("Sources (comma separated, default '{default_source}'): ");
        draft.sources = prompter
            .ask(MissingField::Sources, &question)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn or_else(primary: String, fallback: String) -> String {
    if primary.trim().is_empty() { fallback } else { primary }
}

fn split_name_line(text: &str) -> (String, &str) {
    let text = text.trim_start();
    match text.split_once('\n') {
        Some((first, rest)) => (first.trim().to_string(), rest),
        None => (text.trim().to_string(), ""),
    }
}

fn non_blank_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn first_word(block: &str) -> String {
    block
        .split_whitespace()
        .next()
        .map(|w| w.trim_end_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .unwrap_or("")
        .to_string()
}

/// "'Greedo', 'Navik'; Doda" → ["Greedo", "Navik", "Doda"]
fn split_names(block: &str) -> Vec<String> {
    block
        .split([',', ';'])
        .map(|n| collapse_whitespace(n).trim_matches('\'').trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

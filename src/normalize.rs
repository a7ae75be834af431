//! Build canonical records from drafts and merge drafts into existing
//! records without destroying what is already there.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use species_types::{AbilityState, AttributeMap, Languages, SpeciesRecord, Stats};

use crate::error::{CatalogError, Result};
use crate::species::SpeciesDraft;

static RE_NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// "Chadra-Fan" → "chadra-fan", "Twi'lek" → "twi-lek". Never empty.
pub fn slugify(value: &str) -> String {
    let lower = value.to_lowercase();
    let slug = RE_NON_SLUG.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "species".to_string()
    } else {
        slug.to_string()
    }
}

/// Slugs handed out during one run.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    used: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry already holding the slugs of `records`.
    pub fn seeded(records: &[SpeciesRecord]) -> Self {
        let used = records
            .iter()
            .map(|r| {
                if r.slug.is_empty() {
                    slugify(&r.name)
                } else {
                    r.slug.clone()
                }
            })
            .collect();
        Self { used }
    }

    /// Slug for `name`; on collision the record's id is appended.
    pub fn claim(&mut self, name: &str, id: u64) -> String {
        let base = slugify(name);
        let slug = if self.used.contains(&base) {
            format!("{base}-{id}")
        } else {
            base
        };
        self.used.insert(slug.clone());
        slug
    }
}

/// One more than the largest id in the catalog.
pub fn next_id(records: &[SpeciesRecord]) -> u64 {
    records.iter().map(|r| r.id).max().unwrap_or(0) + 1
}

/// Fail when `name` is blank or already names a record, compared
/// case-insensitively.
pub fn ensure_unique_name(records: &[SpeciesRecord], name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CatalogError::MissingName("the source document".to_string()));
    }
    if records.iter().any(|r| r.has_name(name)) {
        return Err(CatalogError::DuplicateName(name.trim().to_string()));
    }
    Ok(())
}

/// Create a new record from a draft, applying defaults: plural is
/// `name + "s"` and sources fall back to `default_source`.
pub fn build_record(draft: SpeciesDraft, id: u64, slug: String, default_source: &str) -> SpeciesRecord {
    let plural = if draft.plural.trim().is_empty() {
        format!("{}s", draft.name)
    } else {
        draft.plural
    };
    let sources = if draft.sources.is_empty() {
        vec![default_source.to_string()]
    } else {
        draft.sources
    };

    SpeciesRecord {
        id,
        name: draft.name,
        slug,
        plural,
        description: draft.description,
        personality: draft.personality,
        physical_description: draft.physical_description,
        homeworld: draft.homeworld,
        languages: Languages {
            native: draft.languages.native,
            description: draft.languages.description,
        },
        example_names: draft.example_names,
        adventurers: draft.adventurers,
        stats: Stats {
            attribute_dice: draft.attribute_dice,
            attributes: draft.attributes,
            move_: draft.move_,
            size: draft.size,
        },
        special_abilities: draft.special_abilities,
        story_factors: draft.story_factors,
        sources,
        ..SpeciesRecord::default()
    }
}

// ── Non-destructive merge ────────────────────────────────────────────────

fn fill_text(target: &mut String, value: &str, field: &'static str, filled: &mut Vec<&'static str>) {
    if target.trim().is_empty() && !value.trim().is_empty() {
        *target = value.to_string();
        filled.push(field);
    }
}

fn fill_list<T: Clone>(target: &mut Vec<T>, value: &[T], field: &'static str, filled: &mut Vec<&'static str>) {
    if target.is_empty() && !value.is_empty() {
        *target = value.to_vec();
        filled.push(field);
    }
}

fn fill_map(target: &mut AttributeMap, value: &AttributeMap, field: &'static str, filled: &mut Vec<&'static str>) {
    if target.is_empty() && !value.is_empty() {
        *target = value.clone();
        filled.push(field);
    }
}

/// Merge a draft into an existing record.
///
/// Name and id are never touched. Any other field is written only when
/// it is currently empty; special abilities are also replaced when they
/// hold only the placeholder, even by an empty list. Returns the names of
/// the fields that changed.
pub fn merge_into(record: &mut SpeciesRecord, draft: &SpeciesDraft) -> Vec<&'static str> {
    let mut filled = Vec::new();
    let f = &mut filled;

    fill_text(&mut record.plural, &draft.plural, "plural", f);
    fill_text(&mut record.description, &draft.description, "description", f);
    fill_text(&mut record.personality, &draft.personality, "personality", f);
    fill_text(
        &mut record.physical_description,
        &draft.physical_description,
        "physicalDescription",
        f,
    );
    fill_text(&mut record.homeworld, &draft.homeworld, "homeworld", f);
    fill_text(&mut record.languages.native, &draft.languages.native, "languages.native", f);
    fill_text(
        &mut record.languages.description,
        &draft.languages.description,
        "languages.description",
        f,
    );
    fill_list(&mut record.example_names, &draft.example_names, "exampleNames", f);
    fill_text(&mut record.adventurers, &draft.adventurers, "adventurers", f);
    fill_text(&mut record.stats.attribute_dice, &draft.attribute_dice, "stats.attributeDice", f);
    fill_text(&mut record.stats.move_, &draft.move_, "stats.move", f);
    fill_text(&mut record.stats.size, &draft.size, "stats.size", f);

    fill_map(&mut record.stats.attributes, &draft.attributes, "stats.attributes", f);

    match record.ability_state() {
        AbilityState::Placeholder => {
            record.special_abilities = draft.special_abilities.clone();
            f.push("specialAbilities");
        }
        AbilityState::Empty => {
            fill_list(&mut record.special_abilities, &draft.special_abilities, "specialAbilities", f)
        }
        AbilityState::Extracted => {}
    }

    fill_list(&mut record.story_factors, &draft.story_factors, "storyFactors", f);
    fill_list(&mut record.sources, &draft.sources, "sources", f);

    filled
}

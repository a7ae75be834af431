use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Attribute categories ─────────────────────────────────────────────────

/// The six canonical attribute categories. Attribute maps never hold any
/// other key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeCategory {
    Dexterity,
    Knowledge,
    Mechanical,
    Perception,
    Strength,
    Technical,
}

impl AttributeCategory {
    pub const ALL: [AttributeCategory; 6] = [
        Self::Dexterity,
        Self::Knowledge,
        Self::Mechanical,
        Self::Perception,
        Self::Strength,
        Self::Technical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dexterity => "dexterity",
            Self::Knowledge => "knowledge",
            Self::Mechanical => "mechanical",
            Self::Perception => "perception",
            Self::Strength => "strength",
            Self::Technical => "technical",
        }
    }
}

/// Minimum and maximum die codes for one category, e.g. "2D" / "4D+2".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRange {
    pub min: String,
    pub max: String,
}

impl AttributeRange {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.min.trim().is_empty() && !self.max.trim().is_empty()
    }
}

/// An absent category is simply not in the map.
pub type AttributeMap = BTreeMap<AttributeCategory, AttributeRange>;

// ── Abilities and story factors ──────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Ability {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The "not yet extracted" sentinel: `{ name: "Special", description: "" }`.
    pub fn placeholder() -> Self {
        Self::new("Special", "")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryFactor {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl StoryFactor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// How far the special abilities of a record have been extracted.
///
/// `Empty` and `Placeholder` are both "fillable", but they are different
/// states: an empty list may be the genuine result of an extraction, the
/// placeholder never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityState {
    /// No abilities recorded.
    Empty,
    /// Exactly one ability whose name normalizes to "special".
    Placeholder,
    /// Real extracted content.
    Extracted,
}

impl AbilityState {
    pub fn of(abilities: &[Ability]) -> Self {
        match abilities {
            [] => Self::Empty,
            [only] if only.name.trim().eq_ignore_ascii_case("special") => Self::Placeholder,
            _ => Self::Extracted,
        }
    }
}

// ── Record ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Languages {
    pub native: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub attribute_dice: String,
    pub attributes: AttributeMap,
    #[serde(rename = "move")]
    pub move_: String,
    pub size: String,
}

/// One species in the catalog.
///
/// Every text field uses the empty string for "not known yet"; sequences
/// use the empty list. `name` and `id` are fixed once the record is
/// created. Fields the schema does not name are carried in `extra` so that
/// a wholesale catalog write does not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeciesRecord {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub plural: String,
    pub description: String,
    pub personality: String,
    pub physical_description: String,
    pub homeworld: String,
    pub languages: Languages,
    pub example_names: Vec<String>,
    pub adventurers: String,
    pub image_url: String,
    pub stats: Stats,
    pub special_abilities: Vec<Ability>,
    pub story_factors: Vec<StoryFactor>,
    pub notes: String,
    pub sources: Vec<String>,
    pub image_path: String,
    pub has_image: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SpeciesRecord {
    pub fn ability_state(&self) -> AbilityState {
        AbilityState::of(&self.special_abilities)
    }

    /// Case-insensitive natural-key comparison.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

// ── Catalog file format ──────────────────────────────────────────────────

/// On-disk catalog: `{"races": [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub races: Vec<SpeciesRecord>,
}

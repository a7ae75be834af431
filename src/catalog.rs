use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use species_types::{CatalogFile, SpeciesRecord};

use crate::error::{CatalogError, Result};
use crate::normalize::{build_record, ensure_unique_name, next_id, SlugRegistry};
use crate::species::SpeciesDraft;

/// Accepted on read; the wrapped form is always written back. The
/// `species` form is the bulk export layout.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogShape {
    Wrapped(CatalogFile),
    Bare(Vec<SpeciesRecord>),
    Listed { species: Vec<SpeciesRecord> },
}

#[derive(Serialize)]
struct CatalogOut<'a> {
    races: &'a [SpeciesRecord],
}

/// The whole species collection, read once and written back wholesale.
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    pub records: Vec<SpeciesRecord>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CatalogError::MissingInputFile(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let shape: CatalogShape =
            serde_json::from_str(&raw).map_err(|e| CatalogError::json(path, e))?;
        let records = match shape {
            CatalogShape::Wrapped(file) => file.races,
            CatalogShape::Bare(records) => records,
            CatalogShape::Listed { species } => species,
        };
        tracing::debug!("loaded {} records from {}", records.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every record back in insertion order.
    pub fn save(&self) -> Result<()> {
        let out = CatalogOut {
            races: &self.records,
        };
        let mut json =
            serde_json::to_string_pretty(&out).map_err(|e| CatalogError::json(&self.path, e))?;
        json.push('\n');
        fs::write(&self.path, &json).map_err(|e| CatalogError::io(&self.path, e))?;
        tracing::info!("wrote {} ({} bytes)", self.path.display(), json.len());
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&SpeciesRecord> {
        self.records.iter().find(|r| r.has_name(name))
    }

    /// Normalize a draft into a new record and append it.
    ///
    /// A blank name fails with `MissingName`, a name already present
    /// (case-insensitively) with `DuplicateName`; either way the collection
    /// is left untouched.
    pub fn add(&mut self, draft: SpeciesDraft, default_source: &str) -> Result<&SpeciesRecord> {
        ensure_unique_name(&self.records, &draft.name)?;

        let id = next_id(&self.records);
        let slug = SlugRegistry::seeded(&self.records).claim(&draft.name, id);
        let record = build_record(draft, id, slug, default_source);
        tracing::info!("adding '{}' with id {} and slug '{}'", record.name, record.id, record.slug);

        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }
}

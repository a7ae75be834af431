use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions of a catalog run. Extraction itself never fails; a
/// field that cannot be found comes back empty.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("file not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error(
        "structured species JSON detected in {path}; run `species_extract import {path}` instead of adding a single species",
        path = .0.display()
    )]
    UnsupportedDocumentShape(PathBuf),

    #[error("no species name in {0}; the first non-empty line must name the species")]
    MissingName(String),

    #[error("species '{0}' already exists in the catalog")]
    DuplicateName(String),

    #[error("species '{0}' is not in the catalog")]
    UnknownSpecies(String),

    #[error("remote upsert of '{slug}' failed{}: {detail}", status_suffix(.status))]
    RemoteUpsert {
        slug: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("image conversion failed for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

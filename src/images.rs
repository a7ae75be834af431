use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use species_types::SpeciesRecord;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::normalize::SlugRegistry;

/// Lowercase ASCII alphanumerics only: "Geonosian Worker" → "geonosianworker".
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Source images keyed by their sanitized file stem.
pub fn build_file_map(dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    if !dir.is_dir() {
        return Err(CatalogError::MissingInputFile(dir.to_path_buf()));
    }
    let map = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let stem = e.path().file_stem()?.to_str()?;
            Some((sanitize(stem), e.path().to_path_buf()))
        })
        .collect();
    Ok(map)
}

/// Exact sanitized match first, then the image alias table.
pub fn resolve_source<'m>(
    name: &str,
    files: &'m BTreeMap<String, PathBuf>,
    aliases: &BTreeMap<String, String>,
) -> Option<&'m PathBuf> {
    let key = sanitize(name);
    files
        .get(&key)
        .or_else(|| aliases.get(&key).and_then(|alias| files.get(alias)))
}

/// Decode any supported format and write it as RGB WebP.
pub fn convert_image(source: &Path, destination: &Path) -> Result<()> {
    let img = image::open(source).map_err(|e| CatalogError::Image {
        path: source.to_path_buf(),
        source: e,
    })?;
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    image::DynamicImage::ImageRgb8(img.to_rgb8())
        .save_with_format(destination, ImageFormat::WebP)
        .map_err(|e| CatalogError::Image {
            path: destination.to_path_buf(),
            source: e,
        })
}

#[derive(Debug, Default)]
pub struct ImageReport {
    pub converted: Vec<String>,
    pub missing: Vec<String>,
}

/// Convert the image of every record that has a source file and point the
/// record at the result. Records without a source are listed, not fatal.
pub fn convert_catalog(records: &mut [SpeciesRecord], config: &Config) -> Result<ImageReport> {
    let files = build_file_map(&config.image_source_dir)?;
    let mut slugs = SlugRegistry::new();
    let mut report = ImageReport::default();

    for record in records.iter_mut() {
        let Some(source) = resolve_source(&record.name, &files, &config.aliases.images) else {
            report.missing.push(record.name.clone());
            continue;
        };

        let slug = slugs.claim(&record.name, record.id);
        let file_name = format!("{slug}.webp");
        convert_image(source, &config.image_target_dir.join(&file_name))?;

        record.image_url = file_name.clone();
        record.image_path = format!("{}/{}", config.image_url_prefix, file_name);
        record.has_image = true;
        if record.slug.is_empty() {
            record.slug = slug;
        }
        tracing::debug!("converted {} → {}", source.display(), file_name);
        report.converted.push(record.name.clone());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str) -> SpeciesRecord {
        SpeciesRecord {
            id,
            name: name.to_string(),
            ..SpeciesRecord::default()
        }
    }

    fn write_png(path: &Path) {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 200, 30, 255]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Geonosian Worker"), "geonosianworker");
        assert_eq!(sanitize("Twi'lek"), "twilek");
        assert_eq!(sanitize("Chadra-Fan"), "chadrafan");
    }

    #[test]
    fn test_resolve_source_exact_then_alias() {
        let mut files = BTreeMap::new();
        files.insert("wookie".to_string(), PathBuf::from("Wookie.png"));
        files.insert("rodian".to_string(), PathBuf::from("rodian.jpg"));
        let aliases = crate::config::Aliases::default().images;

        assert_eq!(resolve_source("Rodian", &files, &aliases), Some(&PathBuf::from("rodian.jpg")));
        assert_eq!(resolve_source("Wookiee", &files, &aliases), Some(&PathBuf::from("Wookie.png")));
        assert_eq!(resolve_source("Hutt", &files, &aliases), None);
    }

    #[test]
    fn test_convert_catalog_sets_image_fields() {
        let dir = tempfile::tempdir().unwrap();
        let source_dir = dir.path().join("Aliens");
        fs::create_dir(&source_dir).unwrap();
        write_png(&source_dir.join("Geonosian.png"));
        write_png(&source_dir.join("Rodian.png"));

        let config = Config {
            image_source_dir: source_dir,
            image_target_dir: dir.path().join("public").join("aliens"),
            ..Config::default()
        };

        let mut records = vec![
            record(1, "Rodian"),
            record(2, "Hutt"),
            record(3, "Geonosian Worker"),
            record(4, "Geonosian"),
        ];
        let report = convert_catalog(&mut records, &config).unwrap();

        assert_eq!(report.missing, vec!["Hutt"]);
        assert_eq!(report.converted.len(), 3);
        assert_eq!(records[0].image_url, "rodian.webp");
        assert_eq!(records[0].image_path, "aliens/rodian.webp");
        assert!(records[0].has_image);
        assert!(!records[1].has_image);
        assert_eq!(records[2].image_url, "geonosian-worker.webp");
        assert_eq!(records[3].image_url, "geonosian.webp");
        assert!(config.image_target_dir.join("rodian.webp").is_file());
    }

    #[test]
    fn test_duplicate_names_get_id_suffixed_files() {
        let dir = tempfile::tempdir().unwrap();
        let source_dir = dir.path().join("Aliens");
        fs::create_dir(&source_dir).unwrap();
        write_png(&source_dir.join("verpine.png"));

        let config = Config {
            image_source_dir: source_dir,
            image_target_dir: dir.path().join("out"),
            ..Config::default()
        };
        let mut records = vec![record(40, "Verpine"), record(41, "Verpine")];
        convert_catalog(&mut records, &config).unwrap();
        assert_eq!(records[0].image_url, "verpine.webp");
        assert_eq!(records[1].image_url, "verpine-41.webp");
    }

    #[test]
    fn test_missing_source_dir() {
        let config = Config {
            image_source_dir: PathBuf::from("/no/such/dir"),
            ..Config::default()
        };
        assert!(matches!(
            convert_catalog(&mut [], &config),
            Err(CatalogError::MissingInputFile(_))
        ));
    }
}

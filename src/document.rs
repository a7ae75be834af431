use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{CatalogError, Result};

/// Load a source document as plain text.
///
/// - `.json` with a string `wikitext` field → that string
/// - `.json` with a `species` list → rejected, that shape belongs to bulk import
/// - anything else (including JSON that fails to parse) → the raw text
///
/// Line endings are normalized to `\n` and the result is trimmed.
pub fn load_source_text(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(CatalogError::MissingInputFile(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let text = if is_json {
        unwrap_json_document(path, raw)?
    } else {
        raw
    };
    Ok(normalize_text(&text))
}

fn unwrap_json_document(path: &Path, raw: String) -> Result<String> {
    let Ok(Value::Object(payload)) = serde_json::from_str::<Value>(&raw) else {
        return Ok(raw);
    };
    if let Some(Value::String(wikitext)) = payload.get("wikitext") {
        return Ok(wikitext.clone());
    }
    if let Some(Value::Array(_)) = payload.get("species") {
        return Err(CatalogError::UnsupportedDocumentShape(path.to_path_buf()));
    }
    Ok(raw)
}

pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}

/// Every file under `root`, relative to it, sorted.
pub fn list_source_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_plain_text_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "rodian.txt", "\r\nRodian\r\nPersonality: Bold.\r\n\r\n");
        assert_eq!(load_source_text(&path).unwrap(), "Rodian\nPersonality: Bold.");
    }

    #[test]
    fn test_wikitext_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bith.json", r#"{"title":"Bith","wikitext":"Bith\nMove: 5/8"}"#);
        assert_eq!(load_source_text(&path).unwrap(), "Bith\nMove: 5/8");
    }

    #[test]
    fn test_species_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bulk.json", r#"{"species":[{"name":"Bith","notes":""}]}"#);
        assert!(matches!(
            load_source_text(&path),
            Err(CatalogError::UnsupportedDocumentShape(_))
        ));
    }

    #[test]
    fn test_invalid_json_falls_back_to_raw() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "odd.json", "Gand\nMove: 10/12");
        assert_eq!(load_source_text(&path).unwrap(), "Gand\nMove: 10/12");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(matches!(
            load_source_text(&missing),
            Err(CatalogError::MissingInputFile(p)) if p == missing
        ));
    }

    #[test]
    fn test_list_source_files_is_relative_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write(&dir, "b.txt", "");
        write(&dir, "a.txt", "");
        fs::write(dir.path().join("sub").join("c.json"), "{}").unwrap();
        assert_eq!(
            list_source_files(dir.path()),
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("sub").join("c.json"),
            ]
        );
    }
}

//! Bulk import: push every catalog record to the remote store, with the
//! search and sort fields the web client queries on.

use std::collections::BTreeSet;

use serde_json::Value;
use species_types::SpeciesRecord;

use crate::error::Result;
use crate::normalize::slugify;
use crate::remote::DocumentStore;

/// Lowercased words of every part, split on whitespace, `/` and `,`,
/// deduplicated and sorted.
pub fn tokenize(parts: &[&str]) -> Vec<String> {
    let tokens: BTreeSet<String> = parts
        .iter()
        .flat_map(|part| part.split(|c: char| c.is_whitespace() || c == '/' || c == ','))
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    tokens.into_iter().collect()
}

/// Slug the record is stored under: its own, else one derived from the
/// name, else a positional fallback.
pub fn import_slug(record: &SpeciesRecord, index: usize) -> String {
    if !record.slug.trim().is_empty() {
        return record.slug.clone();
    }
    if record.name.trim().is_empty() {
        return format!("species-{index}");
    }
    slugify(&record.name)
}

/// The document sent for one record: dice codes uppercased, image flags
/// derived from `imageUrl`, plus `searchName`, `sortName`, `searchTokens`
/// and `updatedAt`.
pub fn prepare_import(
    record: &SpeciesRecord,
    index: usize,
    image_prefix: &str,
    updated_at: &str,
) -> (String, SpeciesRecord) {
    let slug = import_slug(record, index);
    let mut doc = record.clone();
    doc.slug = slug.clone();

    doc.stats.attribute_dice = doc.stats.attribute_dice.to_uppercase();
    for range in doc.stats.attributes.values_mut() {
        range.min = range.min.to_uppercase();
        range.max = range.max.to_uppercase();
    }

    doc.has_image = !doc.image_url.trim().is_empty();
    doc.image_path = if doc.has_image {
        format!("{image_prefix}/{slug}.webp")
    } else {
        String::new()
    };

    let search_name = doc.name.trim().to_lowercase();
    let mut parts = vec![doc.name.as_str(), doc.homeworld.as_str()];
    parts.extend(doc.sources.iter().map(String::as_str));
    let tokens = tokenize(&parts);

    doc.extra.insert("searchName".into(), Value::String(search_name.clone()));
    doc.extra.insert("sortName".into(), Value::String(search_name));
    doc.extra.insert(
        "searchTokens".into(),
        Value::Array(tokens.into_iter().map(Value::String).collect()),
    );
    doc.extra.insert("updatedAt".into(), Value::String(updated_at.to_string()));

    (slug, doc)
}

/// Upsert every record in catalog order. The first failure stops the run;
/// records already sent stay sent.
pub fn import_catalog(
    records: &[SpeciesRecord],
    store: &dyn DocumentStore,
    image_prefix: &str,
    updated_at: &str,
) -> Result<Vec<String>> {
    let mut imported = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let (slug, doc) = prepare_import(record, index, image_prefix, updated_at);
        store.upsert(&slug, &doc)?;
        tracing::debug!("imported {slug}");
        imported.push(slug);
    }
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use serde_json::json;
    use species_types::{AttributeCategory, AttributeRange};

    use crate::error::CatalogError;
    use crate::remote::document_body;

    const NOW: &str = "2026-10-17T12:00:00+00:00";

    #[derive(Default)]
    struct RecordingStore {
        sent: RefCell<Vec<(String, Value)>>,
        fail_on: Option<&'static str>,
    }

    impl DocumentStore for RecordingStore {
        fn upsert(&self, slug: &str, record: &SpeciesRecord) -> Result<()> {
            if self.fail_on == Some(slug) {
                return Err(CatalogError::RemoteUpsert {
                    slug: slug.to_string(),
                    status: Some(500),
                    detail: "boom".into(),
                });
            }
            self.sent.borrow_mut().push((slug.to_string(), document_body(record)?));
            Ok(())
        }
    }

    fn record(name: &str) -> SpeciesRecord {
        SpeciesRecord {
            name: name.to_string(),
            ..SpeciesRecord::default()
        }
    }

    // ── tokenize ─────────────────────────────────────────────────────

    #[test]
    fn test_tokenize_splits_dedups_and_sorts() {
        assert_eq!(
            tokenize(&["Mon Calamari", "Dac/Mon Cala", "Core Rulebook, 2nd Ed"]),
            vec!["2nd", "cala", "calamari", "core", "dac", "ed", "mon", "rulebook"]
        );
        assert!(tokenize(&["", "  "]).is_empty());
    }

    // ── payload ──────────────────────────────────────────────────────

    #[test]
    fn test_prepare_import_adds_search_fields() {
        let mut rec = record("Twi'lek");
        rec.homeworld = "Ryloth".into();
        rec.sources = vec!["Core".into()];
        rec.image_url = "twi-lek.webp".into();
        rec.stats.attribute_dice = "12d".into();
        rec.stats
            .attributes
            .insert(AttributeCategory::Strength, AttributeRange::new("2d", "4d+1"));

        let (slug, doc) = prepare_import(&rec, 3, "aliens", NOW);
        assert_eq!(slug, "twi-lek");
        assert_eq!(doc.stats.attribute_dice, "12D");
        assert_eq!(doc.stats.attributes[&AttributeCategory::Strength], AttributeRange::new("2D", "4D+1"));
        assert!(doc.has_image);
        assert_eq!(doc.image_path, "aliens/twi-lek.webp");

        let body = document_body(&doc).unwrap();
        let fields = &body["fields"];
        assert_eq!(fields["searchName"], json!({"stringValue": "twi'lek"}));
        assert_eq!(fields["sortName"], json!({"stringValue": "twi'lek"}));
        assert_eq!(fields["updatedAt"], json!({"stringValue": NOW}));
        assert_eq!(
            fields["searchTokens"]["arrayValue"]["values"],
            json!([{"stringValue": "core"}, {"stringValue": "ryloth"}, {"stringValue": "twi'lek"}])
        );
    }

    #[test]
    fn test_prepare_import_without_image() {
        let mut rec = record("Hutt");
        rec.has_image = true;
        rec.image_path = "aliens/old.webp".into();
        let (_, doc) = prepare_import(&rec, 0, "aliens", NOW);
        assert!(!doc.has_image);
        assert!(doc.image_path.is_empty());
    }

    #[test]
    fn test_import_slug_fallbacks() {
        let mut rec = record("Chadra-Fan");
        assert_eq!(import_slug(&rec, 0), "chadra-fan");
        rec.slug = "chadra-fan-12".into();
        assert_eq!(import_slug(&rec, 0), "chadra-fan-12");
        assert_eq!(import_slug(&record(" "), 7), "species-7");
    }

    // ── import_catalog ───────────────────────────────────────────────

    #[test]
    fn test_import_catalog_sends_every_record_in_order() {
        let store = RecordingStore::default();
        let records = vec![record("Rodian"), record("Bith")];
        let slugs = import_catalog(&records, &store, "aliens", NOW).unwrap();
        assert_eq!(slugs, vec!["rodian", "bith"]);
        let sent = store.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].1["fields"]["name"], json!({"stringValue": "Bith"}));
    }

    #[test]
    fn test_import_catalog_stops_at_first_failure() {
        let store = RecordingStore {
            fail_on: Some("bith"),
            ..RecordingStore::default()
        };
        let records = vec![record("Rodian"), record("Bith"), record("Gand")];
        let err = import_catalog(&records, &store, "aliens", NOW).unwrap_err();
        assert!(matches!(err, CatalogError::RemoteUpsert { status: Some(500), .. }));
        assert_eq!(store.sent.borrow().len(), 1);
    }
}

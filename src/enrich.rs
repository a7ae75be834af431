//! Fill gaps in existing catalog records from a multi-species corpus.

use species_types::SpeciesRecord;

use crate::config::Config;
use crate::normalize::merge_into;
use crate::sections::Sections;
use crate::species::Extractor;

#[derive(Debug, Default)]
pub struct EnrichReport {
    pub processed: usize,
    /// (record name, fields filled), only for records that changed.
    pub filled: Vec<(String, Vec<&'static str>)>,
    /// Records with no matching section.
    pub unmatched: Vec<String>,
}

impl EnrichReport {
    pub fn updated(&self) -> usize {
        self.filled.len()
    }
}

/// Match every record to its corpus section and merge what the section
/// yields. Existing non-empty fields are kept.
pub fn enrich_catalog(
    records: &mut [SpeciesRecord],
    sections: &Sections,
    extractor: &Extractor,
    config: &Config,
) -> EnrichReport {
    let mut report = EnrichReport::default();

    for record in records.iter_mut() {
        report.processed += 1;
        let Some(text) = sections.lookup(&record.name, &config.aliases.entities) else {
            tracing::debug!("no section for '{}'", record.name);
            report.unmatched.push(record.name.clone());
            continue;
        };

        let mut draft = extractor.parse_body(text);
        draft.sources = vec![config.default_source.clone()];

        let fields = merge_into(record, &draft);
        if !fields.is_empty() {
            tracing::info!("{}: filled {}", record.name, fields.join(", "));
            report.filled.push((record.name.clone(), fields));
        }
    }

    report
}

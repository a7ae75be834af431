use species_types::{AbilityState, AttributeCategory, SpeciesRecord};

/// What is missing from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: u64,
    pub name: String,
    pub problems: Vec<String>,
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn audit_record(record: &SpeciesRecord) -> Issue {
    let mut problems = Vec::new();
    let stats = &record.stats;

    if is_blank(&stats.move_) {
        problems.push("missing move".to_string());
    }
    if is_blank(&stats.size) {
        problems.push("missing size".to_string());
    }

    match record.ability_state() {
        AbilityState::Empty => problems.push("no special abilities".to_string()),
        AbilityState::Placeholder => problems.push("placeholder special ability".to_string()),
        AbilityState::Extracted => {}
    }

    if record.sources.is_empty() {
        problems.push("missing sources".to_string());
    }

    for (field, value) in [
        ("description", &record.description),
        ("personality", &record.personality),
        ("physicalDescription", &record.physical_description),
        ("homeworld", &record.homeworld),
        ("languages.native", &record.languages.native),
        ("languages.description", &record.languages.description),
    ] {
        if is_blank(value) {
            problems.push(format!("missing {field}"));
        }
    }

    for category in AttributeCategory::ALL {
        let complete = stats
            .attributes
            .get(&category)
            .is_some_and(|r| r.is_complete());
        if !complete {
            problems.push(format!("incomplete {} range", category.as_str()));
        }
    }

    Issue {
        id: record.id,
        name: record.name.clone(),
        problems,
    }
}

/// Records with at least one problem, in catalog order.
pub fn audit_catalog(records: &[SpeciesRecord]) -> Vec<Issue> {
    records
        .iter()
        .map(audit_record)
        .filter(|i| !i.problems.is_empty())
        .collect()
}

pub fn render_markdown(issues: &[Issue]) -> String {
    let mut lines = vec!["# Missing fields in the species catalog".to_string(), String::new()];
    let mut total = 0;
    for issue in issues {
        total += issue.problems.len();
        lines.push(format!(
            "- ID {}: {} → {}",
            issue.id,
            issue.name,
            issue.problems.join(", ")
        ));
    }
    lines.push(String::new());
    lines.push(format!("Total problems: {total}"));
    lines.join("\n") + "\n"
}

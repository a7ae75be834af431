//! Label blocks: the text between `"<Label>:"` and the next known label.
//!
//! Instead of a lazy regex that grows with the schema, every occurrence of
//! every known label is located by offset; a block is the half-open span
//! from the end of its label to the nearest later label (or end of text).

// ── Known labels ─────────────────────────────────────────────────────────

pub const PERSONALITY: &str = "Personality";
pub const PHYSICAL_DESCRIPTION: &str = "Physical Description";
pub const LANGUAGES: &str = "Languages";
pub const EXAMPLE_NAMES: &str = "Example Names";
pub const ADVENTURERS: &str = "Adventurers";
pub const ATTRIBUTE_DICE: &str = "Attribute Dice";
pub const SPECIAL_ABILITIES: &str = "Special Abilities";
pub const STORY_FACTORS: &str = "Story Factors";
pub const MOVE: &str = "Move";
pub const SIZE: &str = "Size";

/// Labels of the record schema, homeworld synonyms excluded (those come
/// from configuration).
pub const FIELD_LABELS: &[&str] = &[
    PERSONALITY,
    PHYSICAL_DESCRIPTION,
    LANGUAGES,
    EXAMPLE_NAMES,
    ADVENTURERS,
    ATTRIBUTE_DICE,
    SPECIAL_ABILITIES,
    STORY_FACTORS,
    MOVE,
    SIZE,
];

/// The full label vocabulary of one run.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(homeworld_labels: &[String]) -> Self {
        let mut labels: Vec<String> = FIELD_LABELS.iter().map(|l| l.to_string()).collect();
        for h in homeworld_labels.iter().map(|h| h.trim()).filter(|h| !h.is_empty()) {
            if !labels.iter().any(|l| l.eq_ignore_ascii_case(h)) {
                labels.push(h.to_string());
            }
        }
        Self { labels }
    }

    /// Every known label except `label` itself.
    pub fn followers(&self, label: &str) -> Vec<&str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(|l| !l.eq_ignore_ascii_case(label.trim()))
            .collect()
    }

    /// Extract `label` using the rest of the vocabulary as followers.
    pub fn extract(&self, text: &str, label: &str) -> String {
        extract(text, label, &self.followers(label))
    }

    /// Try each label in turn and return the first non-empty block.
    pub fn extract_any(&self, text: &str, labels: &[String]) -> String {
        labels
            .iter()
            .map(|l| self.extract(text, l))
            .find(|block| !block.is_empty())
            .unwrap_or_default()
    }

    /// Offset of the earliest label occurrence, if the text has any label.
    pub fn first_offset(&self, text: &str) -> Option<usize> {
        let lower = text.to_ascii_lowercase();
        self.labels
            .iter()
            .filter_map(|l| find_label(text, &lower, l, 0, Anchor::WordStart))
            .map(|(start, _)| start)
            .min()
    }
}

// ── Extraction ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// Preceded by a non-alphanumeric character (or start of text)
    WordStart,
    /// Preceded only by horizontal whitespace on its line
    LineStart,
}

/// Return the trimmed text after `"<label>:"` up to the nearest later
/// `"<follower>:"` that begins a line, or to the end of `text`.
///
/// Matching is ASCII case-insensitive and spans newlines. An absent label
/// yields the empty string.
pub fn extract(text: &str, label: &str, followers: &[&str]) -> String {
    // ASCII lowercasing keeps byte offsets identical to `text`.
    let lower = text.to_ascii_lowercase();

    let Some((_, body_start)) = find_label(text, &lower, label, 0, Anchor::WordStart) else {
        return String::new();
    };

    let end = followers
        .iter()
        .filter_map(|f| find_label(text, &lower, f, body_start, Anchor::LineStart))
        .map(|(start, _)| start)
        .min()
        .unwrap_or(text.len());

    text[body_start..end].trim().to_string()
}

/// Offset of the first anchored `"<label>:"` at or after `from`, as the
/// start of the label and the end of its colon.
fn find_label(
    text: &str,
    lower: &str,
    label: &str,
    from: usize,
    anchor: Anchor,
) -> Option<(usize, usize)> {
    let label = label.trim();
    if label.is_empty() || !lower.is_char_boundary(from) {
        return None;
    }
    let needle = format!("{}:", label.to_ascii_lowercase());

    lower[from..]
        .match_indices(&needle)
        .map(|(i, m)| (from + i, from + i + m.len()))
        .find(|&(pos, _)| is_anchored(text, pos, anchor))
}

fn is_anchored(text: &str, pos: usize, anchor: Anchor) -> bool {
    let before = &text[..pos];
    match anchor {
        Anchor::WordStart => before
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric()),
        Anchor::LineStart => {
            let line_prefix = before.rsplit('\n').next().unwrap_or("");
            line_prefix.chars().all(|c| c == ' ' || c == '\t')
        }
    }
}

// ── Small block helpers ──────────────────────────────────────────────────

/// Collapse every whitespace run to one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First non-empty line of a block, whitespace-collapsed.
pub fn first_line(block: &str) -> String {
    block
        .lines()
        .map(collapse_whitespace)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelSet {
        LabelSet::new(&["Home Planet".to_string(), "Homeworld".to_string()])
    }

    // ── extract ──────────────────────────────────────────────────────

    #[test]
    fn test_extract_stops_at_follower() {
        let text = "Personality: Bold and curious.\nHomeworld: Rodia\n";
        let got = extract(text, "Personality", &["Homeworld", "Move", "Size"]);
        assert_eq!(got, "Bold and curious.");
    }

    #[test]
    fn test_extract_runs_to_end_without_follower() {
        let text = "Intro\nSize: 1.6-1.8 meters tall\n  and sometimes more  \n";
        assert_eq!(
            extract(text, "Size", &["Move"]),
            "1.6-1.8 meters tall\n  and sometimes more"
        );
    }

    #[test]
    fn test_extract_absent_label_is_empty() {
        assert_eq!(extract("Homeworld: Rodia", "Personality", &["Homeworld"]), "");
    }

    #[test]
    fn test_extract_case_insensitive_and_multiline() {
        let text = "PERSONALITY: Loyal.\n\nFierce in battle.\nmove: 10/12";
        assert_eq!(
            extract(text, "Personality", &["Move"]),
            "Loyal.\n\nFierce in battle."
        );
    }

    #[test]
    fn test_extract_uses_nearest_follower_regardless_of_order() {
        let text = "Languages: Rodese\nSize: 1.5m\nExample Names: Greedo\nMove: 10/12";
        assert_eq!(extract(text, "Languages", &["Move", "Example Names", "Size"]), "Rodese");
        assert_eq!(extract(text, "Size", &["Move", "Example Names", "Languages"]), "1.5m");
    }

    #[test]
    fn test_follower_must_start_a_line() {
        // "remove:" must not end the block at the embedded "move:"
        let text = "Special Abilities:\nRegrowth: They can remove: limbs regrow.\nMove: 8/10";
        assert_eq!(
            extract(text, "Special Abilities", &["Move"]),
            "Regrowth: They can remove: limbs regrow."
        );
    }

    #[test]
    fn test_label_needs_word_start() {
        let text = "They remove: nothing.\nMove: 10/12";
        assert_eq!(extract(text, "Move", &["Size"]), "10/12");
    }

    #[test]
    fn test_extract_handles_non_ascii_text() {
        let text = "Personality: Wary of “outsiders” – always.\nSize: 2m";
        assert_eq!(
            extract(text, "Personality", &["Size"]),
            "Wary of “outsiders” – always."
        );
    }

    #[test]
    fn test_padded_label_keeps_whole_value() {
        let text = "Rodian\nHomeworld:Rodia\nMove: 10";
        assert_eq!(extract(text, "Homeworld ", &["Move"]), "Rodia");
        assert_eq!(extract("Rodian\nHomeworld:", " Homeworld ", &["Move"]), "");
    }

    // ── LabelSet ─────────────────────────────────────────────────────

    #[test]
    fn test_configured_labels_are_trimmed() {
        let set = LabelSet::new(&["Homeworld ".to_string(), "  ".to_string()]);
        let labels = vec!["Homeworld ".to_string()];
        assert_eq!(set.extract_any("Rodian\nHomeworld:Rodia\nMove: 10", &labels), "Rodia");
        assert_eq!(set.extract_any("Rodian\nHomeworld:", &labels), "");
        assert!(set.followers("Move").contains(&"Homeworld"));
        assert!(!set.followers("Move").contains(&""));
    }

    #[test]
    fn test_followers_exclude_self() {
        let set = labels();
        let f = set.followers("Move");
        assert!(!f.contains(&"Move"));
        assert!(f.contains(&"Size"));
        assert!(f.contains(&"Home Planet"));
    }

    #[test]
    fn test_extract_any_prefers_first_alias() {
        let set = labels();
        let text = "Homeworld: Rodia\nHome Planet: Tatooine\n";
        let hw = set.extract_any(text, &["Home Planet".to_string(), "Homeworld".to_string()]);
        assert_eq!(hw, "Tatooine");
        let only = set.extract_any("Homeworld: Rodia", &["Home Planet".to_string(), "Homeworld".to_string()]);
        assert_eq!(only, "Rodia");
    }

    #[test]
    fn test_first_offset() {
        let set = labels();
        assert_eq!(set.first_offset("Rodian\nA hunter.\nMove: 10"), Some(17));
        assert_eq!(set.first_offset("No labels at all."), None);
    }

    // ── helpers ──────────────────────────────────────────────────────

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("\n   10/12   \nsecond"), "10/12");
        assert_eq!(first_line(""), "");
    }
}

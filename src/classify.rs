//! Label-free fallback: assign whole sentences to fields by keyword.
//!
//! Only used for text with no recognisable labels. It never guesses past
//! its lexicons; anything unmatched stays empty.

use std::sync::LazyLock;

use regex::Regex;

/// Temperament terms, in priority order.
pub const PERSONALITY_TERMS: &[&str] = &[
    "temper", "honor", "pragmatic", "curious", "xenoph", "peace", "violent", "creative",
    "driven", "reserved", "gregarious", "pleasant", "focused",
];

/// Physical-trait terms, in priority order.
pub const PHYSICAL_TERMS: &[&str] = &[
    "meters", "tall", "skin", "horn", "fur", "tentacl", "eyes", "snout", "exoskeleton",
    "biped", "amphibi", "reptil", "hairless", "domed",
];

/// Case-insensitive alternation over a term list.
fn build_lexicon_regex(terms: &[&str]) -> Regex {
    let alts: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
    Regex::new(&format!("(?i)(?:{})", alts.join("|"))).unwrap()
}

static RE_PERSONALITY: LazyLock<Regex> = LazyLock::new(|| build_lexicon_regex(PERSONALITY_TERMS));
static RE_PHYSICAL: LazyLock<Regex> = LazyLock::new(|| build_lexicon_regex(PHYSICAL_TERMS));

// "homeworld of Ryloth", "Homeworld: Dac", "homeworlds of Mon Calamari"
static RE_HOMEWORLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i:homeworlds?)\s*(?:(?i:of)|:)\s*(?P<place>[A-Z][\w'\-]*(?:[ \t]+[A-Z][\w'\-]*)*)",
    )
    .unwrap()
});

// "they speak Rodese", "Wookiees speak Shyriiwook"
static RE_SPEAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i:\bspeaks?)\s+(?P<lang>[A-Z][\w'\-]+)").unwrap());

/// Fields recovered from unlabeled prose. Empty means "not matched".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classified {
    pub description: String,
    pub personality: String,
    pub physical_description: String,
    pub homeworld: String,
    pub native_language: String,
}

/// Split on `.`, `!` or `?` followed by whitespace. The terminator stays
/// with its sentence.
pub fn split_sentences(block: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = block.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?')
            && let Some(&(_, next)) = chars.peek()
            && next.is_whitespace()
        {
            let end = i + c.len_utf8();
            sentences.push(&block[start..end]);
            start = end;
        }
    }
    sentences.push(&block[start..]);

    sentences
        .into_iter()
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn classify(block: &str) -> Classified {
    let sentences = split_sentences(block);

    let first_match = |re: &Regex| {
        sentences
            .iter()
            .find(|s| re.is_match(s))
            .cloned()
            .unwrap_or_default()
    };

    let homeworld = RE_HOMEWORLD
        .captures(block)
        .and_then(|c| c.name("place"))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let native_language = RE_SPEAKS
        .captures(block)
        .and_then(|c| c.name("lang"))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Classified {
        description: sentences.first().cloned().unwrap_or_default(),
        personality: first_match(&RE_PERSONALITY),
        physical_description: first_match(&RE_PHYSICAL),
        homeworld,
        native_language,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "Rodians are a species of hunters. They are violent and driven by \
                         the thrill of the hunt! Rodians have green skin and large eyes.\n\
                         The homeworld of Rodia lies in the Tyrius system. Most speak Rodese.";

    #[test]
    fn test_split_sentences() {
        let s = split_sentences("One. Two!  Three?\nFour 3.5 meters");
        assert_eq!(s, vec!["One.", "Two!", "Three?", "Four 3.5 meters"]);
    }

    #[test]
    fn test_split_sentences_empty() {
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_classify_all_fields() {
        let c = classify(BLOCK);
        assert_eq!(c.description, "Rodians are a species of hunters.");
        assert_eq!(c.personality, "They are violent and driven by the thrill of the hunt!");
        assert_eq!(c.physical_description, "Rodians have green skin and large eyes.");
        assert_eq!(c.homeworld, "Rodia");
        assert_eq!(c.native_language, "Rodese");
    }

    #[test]
    fn test_first_matching_sentence_wins() {
        let c = classify("Intro. They are curious. They are also pleasant.");
        assert_eq!(c.personality, "They are curious.");
    }

    #[test]
    fn test_unmatched_fields_stay_empty() {
        let c = classify("A short note with nothing useful");
        assert_eq!(c.description, "A short note with nothing useful");
        assert!(c.personality.is_empty());
        assert!(c.physical_description.is_empty());
        assert!(c.homeworld.is_empty());
        assert!(c.native_language.is_empty());
    }

    #[test]
    fn test_homeworld_colon_form_and_multiword() {
        assert_eq!(classify("Homeworld: Mon Calamari, a water world.").homeworld, "Mon Calamari");
        assert_eq!(classify("their homeworlds of Kashyyyk and").homeworld, "Kashyyyk");
    }

    #[test]
    fn test_homeworld_requires_capitalized_place() {
        assert!(classify("the homeworld of nobody knows").homeworld.is_empty());
    }
}

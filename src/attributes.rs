use std::collections::BTreeMap;

use species_types::{AttributeCategory, AttributeMap, AttributeRange};

/// Parse per-category min/max die codes, one category per line.
///
/// A line counts only when its first token (uppercased) is a known alias,
/// it has at least two tokens, and its last token is `min/max`. Anything
/// else is commentary and skipped.
///
///   DEXTERITY 1D/4D
///   STRENGTH  2D/4D+2
pub fn parse_attributes(block: &str, aliases: &BTreeMap<String, AttributeCategory>) -> AttributeMap {
    block
        .lines()
        .filter_map(|line| parse_attribute_line(line, aliases))
        .collect()
}

fn parse_attribute_line(
    line: &str,
    aliases: &BTreeMap<String, AttributeCategory>,
) -> Option<(AttributeCategory, AttributeRange)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    let category = *aliases.get(&tokens[0].to_uppercase())?;
    let (min, max) = tokens.last()?.split_once('/')?;
    Some((category, AttributeRange::new(min.trim(), max.trim())))
}

/// Split an `Attribute Dice` block into its total-dice line and the
/// attribute ranges below it.
///
///   12D
///   DEXTERITY 1D/4D
///   ...
///
/// When the first line is already an attribute line there is no total.
pub fn parse_attribute_block(
    block: &str,
    aliases: &BTreeMap<String, AttributeCategory>,
) -> (String, AttributeMap) {
    let mut lines = block.lines().filter(|l| !l.trim().is_empty());
    let Some(first) = lines.next() else {
        return (String::new(), AttributeMap::new());
    };

    if parse_attribute_line(first, aliases).is_some() {
        return (String::new(), parse_attributes(block, aliases));
    }

    let dice = first.rsplit(':').next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();
    (dice, parse_attributes(&rest.join("\n"), aliases))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Aliases;

    fn aliases() -> BTreeMap<String, AttributeCategory> {
        Aliases::default().attributes
    }

    #[test]
    fn test_junk_lines_are_skipped() {
        let attrs = parse_attributes("STRENGTH 2D/4D\nJUNK LINE\n", &aliases());
        assert_eq!(attrs.len(), 1);
        assert_eq!(
            attrs.get(&AttributeCategory::Strength),
            Some(&AttributeRange::new("2D", "4D"))
        );
    }

    #[test]
    fn test_all_six_categories() {
        let block = "DEXTERITY 1D/4D\nKNOWLEDGE 1D/4D\nMECHANICAL 1D/3D\n\
                     PERCEPTION 2D/4D+2\nStrength 2D/4D\ntechnical 1D/3D+1";
        let attrs = parse_attributes(block, &aliases());
        assert_eq!(attrs.len(), 6);
        assert_eq!(attrs[&AttributeCategory::Perception].max, "4D+2");
        assert_eq!(attrs[&AttributeCategory::Technical].max, "3D+1");
    }

    #[test]
    fn test_requires_two_tokens_and_slash() {
        let block = "STRENGTH\nDEXTERITY 2D\nKNOWLEDGE 2D / 4D\n";
        // "KNOWLEDGE 2D / 4D": last token is "4D" with no slash
        assert!(parse_attributes(block, &aliases()).is_empty());
    }

    #[test]
    fn test_unknown_category_is_ignored() {
        assert!(parse_attributes("LUCK 1D/2D", &aliases()).is_empty());
    }

    #[test]
    fn test_attribute_block_with_total() {
        let (dice, attrs) =
            parse_attribute_block("12D\nDEXTERITY 1D/4D\nSTRENGTH 2D/4D", &aliases());
        assert_eq!(dice, "12D");
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_attribute_block_total_after_colon() {
        let (dice, _) = parse_attribute_block("Attribute Dice: 11D\nSTRENGTH 1D/3D", &aliases());
        assert_eq!(dice, "11D");
    }

    #[test]
    fn test_attribute_block_without_total() {
        let (dice, attrs) = parse_attribute_block("STRENGTH 2D/4D\nDEXTERITY 1D/3D", &aliases());
        assert_eq!(dice, "");
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_attribute_block_empty() {
        let (dice, attrs) = parse_attribute_block("", &aliases());
        assert!(dice.is_empty());
        assert!(attrs.is_empty());
    }
}

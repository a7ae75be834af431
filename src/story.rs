use species_types::StoryFactor;

/// Parse one story-factor line.
///
/// `Name: description` splits on the first colon. Without a colon the
/// first word is the name and the rest the description; a single word is
/// used as both.
pub fn parse_story_factor(line: &str) -> StoryFactor {
    let line = line.trim();
    if let Some((name, desc)) = line.split_once(':') {
        return StoryFactor::new(name.trim(), desc.trim());
    }
    match line.split_once(char::is_whitespace) {
        Some((name, desc)) => StoryFactor::new(name, desc.trim()),
        None => StoryFactor::new(line, line),
    }
}

/// Every non-empty line of the block is one factor.
pub fn parse_story_factors(block: &str) -> Vec<StoryFactor> {
    block
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(parse_story_factor)
        .filter(|f| !f.name.is_empty())
        .collect()
}

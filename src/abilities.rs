use species_types::Ability;

/// Parser state: either between abilities or collecting one.
#[derive(Debug)]
enum State {
    NoCurrentAbility,
    InAbility { name: String, lines: Vec<String> },
}

impl State {
    /// Finish the in-progress ability, if any.
    fn flush(self, out: &mut Vec<Ability>) {
        if let State::InAbility { name, lines } = self {
            out.push(Ability {
                name: name.trim().to_string(),
                description: lines.join(" ").trim().to_string(),
            });
        }
    }
}

/// Segment a Special Abilities block into named abilities.
///
/// A line with a colon starts a new ability (`Name: first line`); a line
/// without one continues the current description. A line starting with
/// "story factors" ends the block, so the parser can run over a corpus
/// section that has no hard boundary after the abilities.
pub fn parse_abilities(block: &str) -> Vec<Ability> {
    let mut out = Vec::new();
    let mut state = State::NoCurrentAbility;

    for raw in block.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.to_lowercase().starts_with("story factors") {
            break;
        }

        if let Some((name, rest)) = line.split_once(':') {
            state.flush(&mut out);
            state = State::InAbility {
                name: name.to_string(),
                lines: vec![rest.trim().to_string()],
            };
        } else if let State::InAbility { lines, .. } = &mut state {
            lines.push(line.to_string());
        }
    }
    state.flush(&mut out);

    out.retain(|a| !a.name.is_empty());
    out
}

//! Turn free-form advisor text into a validated action sequence
//!
//! The advisor is asked for a bare comma-separated list but small models
//! wander: numbering, markdown fences, mixed case, commentary around the
//! list. Anything that does not name a currently legal action is dropped;
//! what survives must still clear the recognized/attack minimums.

use crate::boss::actions::BossAction;
use crate::core::config::AdvisoryConfig;
use crate::core::error::{GameError, Result};

/// Acceptance thresholds for a parsed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRules {
    pub min_recognized: usize,
    pub min_attacks: usize,
}

impl Default for SequenceRules {
    fn default() -> Self {
        Self {
            min_recognized: 2,
            min_attacks: 1,
        }
    }
}

impl From<&AdvisoryConfig> for SequenceRules {
    fn from(config: &AdvisoryConfig) -> Self {
        Self {
            min_recognized: config.min_recognized,
            min_attacks: config.min_attacks,
        }
    }
}

/// Parse and validate an advisor response
///
/// Returns the recognized actions in response order, or
/// `GameError::InvalidSequence` when too few survive.
pub fn parse_sequence(
    response: &str,
    legal: &[BossAction],
    rules: &SequenceRules,
) -> Result<Vec<BossAction>> {
    let sequence: Vec<BossAction> = candidate_actions(response)
        .into_iter()
        .filter(|action| legal.contains(action))
        .collect();

    let attacks = sequence.iter().filter(|a| a.is_attack()).count();
    if sequence.len() < rules.min_recognized || attacks < rules.min_attacks {
        return Err(GameError::InvalidSequence {
            recognized: sequence.len(),
            attacks,
        });
    }

    Ok(sequence)
}

/// Every catalog action named in the text, legal or not
fn candidate_actions(response: &str) -> Vec<BossAction> {
    let mut found = Vec::new();

    for chunk in response.split(|c: char| matches!(c, ',' | ';' | '\n' | '|')) {
        let cleaned = clean_chunk(chunk);
        if cleaned.is_empty() {
            continue;
        }

        // Whole chunk first so "Spread Shot" still reads as one action
        if let Ok(action) = cleaned.parse::<BossAction>() {
            found.push(action);
            continue;
        }

        found.extend(
            cleaned
                .split_whitespace()
                .filter_map(|word| clean_chunk(word).parse::<BossAction>().ok()),
        );
    }

    found
}

/// Strip list numbering, bullets, quotes and fences around a chunk
fn clean_chunk(chunk: &str) -> &str {
    let trimmed = chunk.trim().trim_matches(|c: char| !is_token_char(c));
    let without_number = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if without_number.len() != trimmed.len() {
        // "1. SINGLE_SHOT" or "2) DODGE"
        without_number.trim_matches(|c: char| !is_token_char(c))
    } else {
        trimmed
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

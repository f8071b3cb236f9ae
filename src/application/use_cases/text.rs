//! Deterministic post-processing applied to model output before submission.

use tracing::debug;

use crate::domain::DomainError;

/// Collapses runs of `marker` separated by single spaces into one marker,
/// e.g. `"CENZURA CENZURA CENZURA"` becomes `"CENZURA"`.
pub fn collapse_repeated(text: &str, marker: &str) -> String {
    let doubled = format!("{marker} {marker}");
    let mut collapsed = text.to_string();
    while collapsed.contains(&doubled) {
        collapsed = collapsed.replace(&doubled, marker);
    }
    collapsed
}

/// One keyword per line, trimmed and lower-cased; blank lines dropped.
pub fn keyword_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Evaluates an `a + b` question. A wrong `answer` is logged and replaced by
/// the sum.
pub fn correct_sum(question: &str, answer: i64) -> Result<i64, DomainError> {
    let mut operands = question.split('+').map(str::trim);
    let (Some(a), Some(b), None) = (operands.next(), operands.next(), operands.next()) else {
        return Err(DomainError::invalid_input(format!(
            "expected 'a + b', got '{question}'"
        )));
    };

    let parse = |operand: &str| {
        operand.parse::<i64>().map_err(|e| {
            DomainError::invalid_input(format!("bad operand '{operand}' in '{question}': {e}"))
        })
    };

    let sum = parse(a)?
        .checked_add(parse(b)?)
        .ok_or_else(|| DomainError::invalid_input(format!("'{question}' overflows i64")))?;
    if sum != answer {
        debug!("Correcting '{}': {} -> {}", question, answer, sum);
    }
    Ok(sum)
}

/// Category a note was sorted into by the classifier prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteCategory {
    People,
    Hardware,
    Irrelevant,
}

impl NoteCategory {
    /// Maps the classifier's one-word reply; anything unexpected is irrelevant.
    pub fn from_reply(reply: &str) -> Self {
        match reply.trim() {
            "LUDZIE" => NoteCategory::People,
            "HARDWARE" => NoteCategory::Hardware,
            _ => NoteCategory::Irrelevant,
        }
    }
}

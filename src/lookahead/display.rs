use std::fmt;

use super::set::LookaheadSet;
use crate::base::{TokenId, Vocabulary};

/// Marker printed for the epsilon (may continue in the caller) position.
pub const EPSILON: &str = "<epsilon>";

/// Render one sequence as space-separated token names.
pub fn render_sequence(sequence: &[TokenId], vocabulary: &Vocabulary) -> String {
    sequence
        .iter()
        .map(|&token| vocabulary.display(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render an epsilon prefix, ending in the epsilon marker.
pub fn render_epsilon_prefix(prefix: &[TokenId], vocabulary: &Vocabulary) -> String {
    if prefix.is_empty() {
        EPSILON.to_string()
    } else {
        format!("{} {}", render_sequence(prefix, vocabulary), EPSILON)
    }
}

/// [`LookaheadSet`] paired with the vocabulary that names its tokens.
pub struct DisplaySet<'a> {
    set: &'a LookaheadSet,
    vocabulary: &'a Vocabulary,
}

impl LookaheadSet {
    /// Display with token names, e.g. `{ID "=", ID "(", <epsilon>}`.
    pub fn display<'a>(&'a self, vocabulary: &'a Vocabulary) -> DisplaySet<'a> {
        DisplaySet {
            set: self,
            vocabulary,
        }
    }

    /// Every member rendered, complete sequences first.
    pub fn render(&self, vocabulary: &Vocabulary) -> Vec<String> {
        self.sequences()
            .map(|s| render_sequence(s, vocabulary))
            .chain(
                self.epsilon_prefixes()
                    .map(|p| render_epsilon_prefix(p, vocabulary)),
            )
            .collect()
    }
}

impl fmt::Display for DisplaySet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.set.render(self.vocabulary).join(", "))
    }
}

//! Error types for grammar construction.

use smol_str::SmolStr;
use thiserror::Error;

/// Structural problems that make a grammar graph unusable for analysis.
///
/// All of these are fatal and reported by [`GrammarBuilder::build`](super::GrammarBuilder::build)
/// before any lookahead is computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// Maximum lookahead depth outside `1..=255`.
    #[error("invalid maximum lookahead depth {0}: expected 1..=255")]
    InvalidMaxK(usize),

    /// Rule name is not an identifier.
    #[error("invalid rule name '{0}'")]
    InvalidRuleName(SmolStr),

    /// Two rules share a name.
    #[error("rule '{0}' is defined more than once")]
    DuplicateRule(SmolStr),

    /// Reference to a rule that is never defined.
    #[error("rule '{from}' references undefined rule '{name}'")]
    UnresolvedRule { name: SmolStr, from: SmolStr },

    /// A rule without alternatives can never be matched.
    #[error("rule '{0}' has no alternatives")]
    EmptyRule(SmolStr),

    /// An alternative with no path to its block's terminator.
    #[error("alternative {alternative} of a block in rule '{rule}' never reaches its terminator: {reason}")]
    DeadEnd {
        rule: SmolStr,
        alternative: usize,
        reason: &'static str,
    },
}

impl GrammarError {
    /// Create a dead-end error.
    pub fn dead_end(rule: impl Into<SmolStr>, alternative: usize, reason: &'static str) -> Self {
        Self::DeadEnd {
            rule: rule.into(),
            alternative,
            reason,
        }
    }
}

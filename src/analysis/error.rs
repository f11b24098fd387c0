//! Error types for lookahead queries.

use thiserror::Error;

use crate::base::BlockId;
use crate::grammar::Node;

/// Invalid arguments rejected at the analyzer's API boundary.
///
/// Analysis itself cannot fail on a built grammar; these only describe
/// queries that do not make sense for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Requested depth outside `1..=max_k`.
    #[error("lookahead depth {depth} is out of range 1..={max_k}")]
    DepthOutOfRange { depth: usize, max_k: usize },

    /// No rule with this name.
    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    /// Handle does not belong to the grammar.
    #[error("node {0:?} does not exist in the grammar")]
    UnknownNode(Node),

    /// Alternative index past the end of a block.
    #[error("block {block} has no alternative {alternative}")]
    UnknownAlternative { block: BlockId, alternative: usize },
}

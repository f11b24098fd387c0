//! # llk-core
//!
//! LL(k) lookahead analysis for a parser generator: lookahead sets for
//! every decision of a grammar graph, with ambiguity detection.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! report    → Ambiguity reporter, diagnostics, decision summaries
//!   ↓
//! analysis  → Memoized fixed-point LOOK/FIRST/FOLLOW computation
//!   ↓
//! lookahead → LookaheadSet value type
//!   ↓
//! grammar   → Grammar graph, builder, validation
//!   ↓
//! base      → Primitives (typed ids, Vocabulary, identifiers)
//! ```

// ============================================================================
// MODULES (dependency order: base → grammar → lookahead → analysis → report)
// ============================================================================

/// Foundation types: typed arena ids, token vocabulary
pub mod base;

/// Grammar graph: rules, blocks, elements and their construction
pub mod grammar;

/// Lookahead sets of token sequences
pub mod lookahead;

/// LL(k) analysis over a grammar graph
pub mod analysis;

/// Ambiguity reporting and decision summaries
pub mod report;

/// JSON export of analysis reports
#[cfg(feature = "export")]
pub mod export;

// Re-export commonly needed items
pub use analysis::{AnalysisError, Analyzer, AnalyzerConfig};
pub use base::{BlockId, ElementId, RuleId, TokenId, Vocabulary};
pub use grammar::{Grammar, GrammarBuilder, GrammarError, Node};
pub use lookahead::LookaheadSet;
pub use report::{AnalysisReport, analyze, analyze_all};

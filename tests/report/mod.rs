//! Reporter tests: ambiguities, decision summaries, diagnostics and
//! parallel analysis of several grammars.

pub mod tests_ambiguity;
pub mod tests_parallel;

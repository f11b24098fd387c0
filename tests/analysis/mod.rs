//! Analyzer tests over complete grammars:
//! - FIRST/FOLLOW and per-alternative lookahead
//! - Termination and least fixed points on cyclic grammars
//! - Determinism across runs and query orders

pub mod tests_lookahead;
pub mod tests_properties;

//! LL(k) analysis: lookahead sets for any node of a grammar graph.
//!
//! ```
//! use llk::analysis::Analyzer;
//! use llk::grammar::GrammarBuilder;
//!
//! let mut builder = GrammarBuilder::new(2);
//! builder.entry_rule("pair", |r| {
//!     r.alt(|a| {
//!         a.token("a").token("b");
//!     });
//!     r.alt(|a| {
//!         a.token("a").token("c");
//!     });
//! });
//! let grammar = builder.build().unwrap();
//! let block = grammar.rule(grammar.rule_by_name("pair").unwrap()).block;
//!
//! let mut analyzer = Analyzer::new(&grammar);
//! let first = analyzer.look_alternative(2, block, 0).unwrap();
//! assert_eq!(first.display(grammar.vocabulary()).to_string(), "{a b}");
//! ```

mod analyzer;
mod config;
mod error;

pub use analyzer::{AnalysisStats, Analyzer};
pub use config::AnalyzerConfig;
pub use error::AnalysisError;

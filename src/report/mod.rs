//! Ambiguity reporting: compares the branches of every decision and turns
//! the overlaps into diagnostics and decision summaries.
//!
//! ```
//! use llk::grammar::GrammarBuilder;
//! use llk::report::{analyze, Branch};
//! use llk::analysis::AnalyzerConfig;
//!
//! let mut builder = GrammarBuilder::new(1);
//! builder.entry_rule("stmt", |r| {
//!     r.alt(|a| {
//!         a.token("ID").token("=");
//!     });
//!     r.alt(|a| {
//!         a.token("ID").token("(");
//!     });
//! });
//! let grammar = builder.build().unwrap();
//!
//! let report = analyze(&grammar, &AnalyzerConfig::default());
//! let ambiguity = &report.ambiguities[0];
//! assert_eq!(ambiguity.first, Branch::Alternative(0));
//! assert_eq!(ambiguity.second, Branch::Alternative(1));
//! assert_eq!(ambiguity.overlap.display(grammar.vocabulary()).to_string(), "{ID}");
//! ```

mod diagnostics;
mod parallel;
mod reporter;

pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use parallel::{analyze, analyze_all};
pub use reporter::{
    AmbiguityReporter, Ambiguity, AnalysisReport, Branch, BranchLookahead, Decision,
};

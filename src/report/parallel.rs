//! Analysis of several grammars at once.

use rayon::prelude::*;

use super::reporter::{AmbiguityReporter, AnalysisReport};
use crate::analysis::{Analyzer, AnalyzerConfig};
use crate::grammar::Grammar;

/// Check every rule and decision of one grammar.
pub fn analyze(grammar: &Grammar, config: &AnalyzerConfig) -> AnalysisReport {
    let mut analyzer = Analyzer::with_config(grammar, config.clone());
    let mut reporter = AmbiguityReporter::new(&mut analyzer);
    reporter.check_all();
    reporter.report()
}

/// Analyze independent grammars on the rayon pool.
///
/// Each grammar gets its own [`Analyzer`]; nothing is shared between them.
/// Reports come back in input order.
pub fn analyze_all(grammars: &[Grammar], config: &AnalyzerConfig) -> Vec<AnalysisReport> {
    let reports: Vec<_> = grammars
        .par_iter()
        .map(|grammar| analyze(grammar, config))
        .collect();
    tracing::debug!("[REPORT] analyzed {} grammars", reports.len());
    reports
}

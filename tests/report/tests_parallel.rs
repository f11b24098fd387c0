use llk::{AnalyzerConfig, Grammar, analyze, analyze_all};

use crate::helpers::grammar_fixtures::*;

fn grammars() -> Vec<Grammar> {
    vec![
        operator_grammar(),
        common_prefix_grammar(1),
        expression_grammar(2),
        statement_grammar(1),
        epsilon_conflict_grammar(1),
        left_recursive_list(2),
    ]
}

#[test]
fn test_parallel_reports_match_sequential_ones() {
    let grammars = grammars();
    let config = AnalyzerConfig::default();

    let parallel = analyze_all(&grammars, &config);
    assert_eq!(parallel.len(), grammars.len());

    for (grammar, report) in grammars.iter().zip(&parallel) {
        let sequential = analyze(grammar, &config);
        assert_eq!(report.decisions, sequential.decisions);
        assert_eq!(report.ambiguities, sequential.ambiguities);
        assert_eq!(report.diagnostics, sequential.diagnostics);
        assert_eq!(report.left_recursive, sequential.left_recursive);
    }
}

#[test]
fn test_empty_input_gives_no_reports() {
    assert!(analyze_all(&[], &AnalyzerConfig::default()).is_empty());
}

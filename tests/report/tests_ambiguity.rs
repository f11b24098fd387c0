use rstest::rstest;

use llk::grammar::BlockKind;
use llk::report::{Branch, Severity, codes};
use llk::{AnalyzerConfig, analyze};

use crate::helpers::grammar_fixtures::*;
use crate::helpers::lookahead_assertions::*;

// =============================================================================
// DISJOINT DECISIONS
// =============================================================================

#[test]
fn test_distinct_operators_are_not_ambiguous() {
    let grammar = operator_grammar();
    let report = analyze(&grammar, &AnalyzerConfig::default());

    assert!(report.ambiguities.is_empty());
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.decisions.len(), 1);
    let decision = &report.decisions[0];
    assert_eq!(decision.depth, 1);
    assert_eq!(decision.branches.len(), 3);
}

#[test]
fn test_expression_grammar_is_ll1() {
    let grammar = expression_grammar(1);
    let report = analyze(&grammar, &AnalyzerConfig::default());

    assert!(report.is_deterministic(), "{:#?}", report.ambiguities);
    assert_eq!(report.decisions.len(), 5);
    assert!(report.decisions.iter().all(|d| d.deterministic && d.depth == 1));

    let loops: Vec<_> = report
        .decisions
        .iter()
        .filter(|d| d.kind == BlockKind::ZeroOrMore)
        .collect();
    assert_eq!(loops.len(), 2);
    let expr_loop = loops[0];
    assert_members(
        &grammar,
        expr_loop.lookahead(Branch::Alternative(0)).unwrap(),
        &["\"+\"", "\"-\""],
    );
    assert_members(
        &grammar,
        expr_loop.lookahead(Branch::Exit).unwrap(),
        &["EOF", "\")\""],
    );
}

// =============================================================================
// COMMON PREFIXES
// =============================================================================

#[rstest]
#[case(1, 1)]
#[case(2, 0)]
#[case(3, 0)]
fn test_common_prefix_needs_two_tokens(#[case] max_k: usize, #[case] expected: usize) {
    let grammar = common_prefix_grammar(max_k);
    let report = analyze(&grammar, &AnalyzerConfig::default());
    assert_eq!(report.ambiguities.len(), expected);
}

#[test]
fn test_common_prefix_evidence() {
    let grammar = common_prefix_grammar(1);
    let report = analyze(&grammar, &AnalyzerConfig::default());

    let ambiguity = &report.ambiguities[0];
    assert_eq!(ambiguity.first, Branch::Alternative(0));
    assert_eq!(ambiguity.second, Branch::Alternative(1));
    assert_eq!(ambiguity.depth, 1);
    assert_members(&grammar, &ambiguity.overlap, &["a"]);

    let decision = &report.decisions[0];
    assert!(!decision.deterministic);
    assert_eq!(decision.depth, 1);
}

#[test]
fn test_common_prefix_decision_depth() {
    let grammar = common_prefix_grammar(3);
    let report = analyze(&grammar, &AnalyzerConfig::default());

    let decision = &report.decisions[0];
    assert!(decision.deterministic);
    assert_eq!(decision.depth, 2);
    assert_members(&grammar, decision.lookahead(Branch::Alternative(1)).unwrap(), &["a c"]);
}

#[test]
fn test_statement_ambiguity_diagnostic() {
    let grammar = statement_grammar(1);
    let report = analyze(&grammar, &AnalyzerConfig::default());

    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert_eq!(diagnostic.code.as_deref(), Some(codes::AMBIGUOUS_ALTERNATIVES));
    assert_eq!(diagnostic.rule.as_deref(), Some("stmt"));
    assert_eq!(
        diagnostic.message.as_ref(),
        "rule block b0 of rule 'stmt': alternative 1 and alternative 2 are both predicted by {ID}"
    );
    assert_eq!(diagnostic.notes[0].as_ref(), "resolved in favour of alternative 1");

    let wider = statement_grammar(2);
    assert!(analyze(&wider, &AnalyzerConfig::default()).diagnostics.is_empty());
}

// =============================================================================
// EPSILON ALTERNATIVES
// =============================================================================

#[test]
fn test_epsilon_alternative_of_entry_rule_is_disjoint() {
    let grammar = epsilon_alternative_grammar(1);
    let report = analyze(&grammar, &AnalyzerConfig::default());

    assert!(report.ambiguities.is_empty());
    let decision = &report.decisions[0];
    assert_members(&grammar, decision.lookahead(Branch::Alternative(1)).unwrap(), &["EOF"]);
}

#[test]
fn test_epsilon_alternative_overlaps_exit_lookahead() {
    let grammar = epsilon_conflict_grammar(1);
    let report = analyze(&grammar, &AnalyzerConfig::default());

    assert_eq!(report.ambiguities.len(), 1);
    let ambiguity = &report.ambiguities[0];
    assert_eq!(grammar.rule(ambiguity.rule).name.as_str(), "opt");
    assert_members(&grammar, &ambiguity.overlap, &["x"]);

    let deeper = epsilon_conflict_grammar(2);
    let report = analyze(&deeper, &AnalyzerConfig::default());
    assert!(report.ambiguities.is_empty());
    assert_eq!(report.decisions[0].depth, 2);
}

// =============================================================================
// LEFT RECURSION
// =============================================================================

#[test]
fn test_left_recursion_is_an_error() {
    let grammar = left_recursive_list(1);
    let report = analyze(&grammar, &AnalyzerConfig::default());

    assert!(report.has_errors());
    assert!(!report.is_deterministic());
    let errors: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code.as_deref(), Some(codes::LEFT_RECURSION));
    assert_eq!(errors[0].rule.as_deref(), Some("list"));
}

#[test]
fn test_bottomless_rule_has_no_decisions() {
    let grammar = bottomless_grammar(2);
    let report = analyze(&grammar, &AnalyzerConfig::default());

    assert!(report.decisions.is_empty());
    assert_eq!(report.left_recursive.len(), 1);
}

use rstest::rstest;

use llk::Analyzer;

use crate::helpers::grammar_fixtures::*;
use crate::helpers::lookahead_assertions::*;

// =============================================================================
// FIRST AND FOLLOW
// =============================================================================

#[test]
fn test_expression_first_sets() {
    let grammar = expression_grammar(1);
    let mut analyzer = Analyzer::new(&grammar);

    for rule in ["expr", "term", "factor"] {
        let first = analyzer.look_rule(1, rule).unwrap();
        assert_members(&grammar, &first, &["INT", "\"(\""]);
    }
}

#[rstest]
#[case("expr", &["EOF", "\")\""])]
#[case("term", &["EOF", "\")\"", "\"+\"", "\"-\""])]
#[case("factor", &["EOF", "\")\"", "\"+\"", "\"-\"", "\"*\"", "\"/\""])]
fn test_expression_follow_sets(#[case] rule: &str, #[case] expected: &[&str]) {
    let grammar = expression_grammar(1);
    let mut analyzer = Analyzer::new(&grammar);

    let follow = analyzer.follow(1, rule).unwrap();
    assert_members(&grammar, &follow, expected);
}

#[test]
fn test_parenthesized_factor_at_depth_two() {
    let grammar = expression_grammar(2);
    let set = alternative_lookahead(&grammar, "factor", 1, 2);
    assert_members(&grammar, &set, &["\"(\" INT", "\"(\" \"(\""]);
}

#[test]
fn test_term_follow_at_depth_two_crosses_rules() {
    let grammar = expression_grammar(2);
    let mut analyzer = Analyzer::new(&grammar);

    let follow = analyzer.follow(2, "term").unwrap();
    assert_members(
        &grammar,
        &follow,
        &[
            "EOF",
            "\")\" EOF",
            "\")\" \")\"",
            "\")\" \"+\"",
            "\")\" \"-\"",
            "\")\" \"*\"",
            "\")\" \"/\"",
            "\"+\" INT",
            "\"+\" \"(\"",
            "\"-\" INT",
            "\"-\" \"(\"",
        ],
    );
}

// =============================================================================
// DEPTH
// =============================================================================

#[rstest]
#[case(1, &["ID"], &["ID"])]
#[case(2, &["ID \"=\""], &["ID \"(\""])]
fn test_statement_alternatives(
    #[case] depth: usize,
    #[case] assign: &[&str],
    #[case] call: &[&str],
) {
    let grammar = statement_grammar(2);
    assert_members(&grammar, &alternative_lookahead(&grammar, "stmt", 0, depth), assign);
    assert_members(&grammar, &alternative_lookahead(&grammar, "stmt", 1, depth), call);
}

// =============================================================================
// EPSILON
// =============================================================================

#[test]
fn test_epsilon_alternative_in_call_site_context() {
    let grammar = epsilon_alternative_grammar(1);
    let mut analyzer = Analyzer::new(&grammar);

    let first = analyzer.look_rule(1, "opt").unwrap();
    assert_members(&grammar, &first, &["x", "<epsilon>"]);
    assert!(first.has_epsilon());
}

#[rstest]
#[case(1, &["EOF"])]
#[case(2, &["EOF"])]
fn test_epsilon_alternative_of_entry_rule_sees_end_of_input(
    #[case] depth: usize,
    #[case] expected: &[&str],
) {
    let grammar = epsilon_alternative_grammar(2);
    let set = alternative_lookahead(&grammar, "opt", 1, depth);
    assert_members(&grammar, &set, expected);
    assert!(!set.has_epsilon());
}

#[test]
fn test_epsilon_alternative_sees_caller_continuation() {
    let grammar = epsilon_conflict_grammar(2);
    assert_members(&grammar, &alternative_lookahead(&grammar, "opt", 0, 2), &["x x"]);
    assert_members(&grammar, &alternative_lookahead(&grammar, "opt", 1, 2), &["x EOF"]);
}

use llk::{Analyzer, ElementId, Grammar, LookaheadSet, Node};

use crate::helpers::grammar_fixtures::*;
use crate::helpers::lookahead_assertions::*;

// =============================================================================
// HELPERS
// =============================================================================

fn all_nodes(grammar: &Grammar) -> Vec<Node> {
    let elements = (0..grammar.element_count()).map(|i| Node::Element(ElementId::new(i)));
    let blocks = grammar.blocks().map(|(id, _)| Node::Block(id));
    elements.chain(blocks).collect()
}

fn look_everything(grammar: &Grammar, nodes: &[Node], depth: usize) -> Vec<LookaheadSet> {
    let mut analyzer = Analyzer::new(grammar);
    nodes
        .iter()
        .map(|&node| analyzer.look(depth, node).unwrap())
        .collect()
}

// =============================================================================
// BOUNDS AND DETERMINISM
// =============================================================================

#[test]
fn test_sequences_never_exceed_depth() {
    for grammar in [expression_grammar(3), statement_grammar(3), left_recursive_list(3)] {
        let nodes = all_nodes(&grammar);
        for depth in 1..=3 {
            for set in look_everything(&grammar, &nodes, depth) {
                assert_bounded(&set, depth);
                assert_eq!(set.depth(), depth);
            }
        }
    }
}

#[test]
fn test_repeated_runs_agree() {
    let grammar = expression_grammar(2);
    let nodes = all_nodes(&grammar);

    let first = look_everything(&grammar, &nodes, 2);
    let second = look_everything(&grammar, &nodes, 2);
    assert_eq!(first, second);
}

#[test]
fn test_query_order_does_not_matter() {
    for grammar in [expression_grammar(2), left_recursive_list(2), epsilon_conflict_grammar(2)] {
        let nodes = all_nodes(&grammar);
        let forward = look_everything(&grammar, &nodes, 2);

        let reversed: Vec<Node> = nodes.iter().rev().copied().collect();
        let mut backward = look_everything(&grammar, &reversed, 2);
        backward.reverse();

        assert_eq!(forward, backward);
    }
}

#[test]
fn test_each_query_matches_a_fresh_analyzer() {
    let grammar = left_recursive_list(2);
    let nodes = all_nodes(&grammar);
    let shared = look_everything(&grammar, &nodes, 2);

    for (node, expected) in nodes.iter().zip(&shared) {
        let mut fresh = Analyzer::new(&grammar);
        assert_eq!(&fresh.look(2, *node).unwrap(), expected, "{:?}", node);
    }
}

// =============================================================================
// CYCLES
// =============================================================================

#[test]
fn test_rule_without_base_case_terminates_empty() {
    let grammar = bottomless_grammar(3);
    let mut analyzer = Analyzer::new(&grammar);

    for depth in 1..=3 {
        assert!(analyzer.look(depth, rule_block(&grammar, "r")).unwrap().is_empty());
        assert!(analyzer.look_rule(depth, "r").unwrap().is_empty());
    }
    assert_eq!(analyzer.left_recursive_rules().count(), 1);
}

#[test]
fn test_left_recursive_list_lookahead() {
    let grammar = left_recursive_list(2);
    let mut analyzer = Analyzer::new(&grammar);

    let first = analyzer.look_rule(2, "list").unwrap();
    assert_members(&grammar, &first, &["ID \",\"", "ID <epsilon>"]);

    let follow = analyzer.follow(2, "list").unwrap();
    assert_members(&grammar, &follow, &["EOF", "\",\" ID"]);

    assert_members(&grammar, &alternative_lookahead(&grammar, "list", 0, 2), &["ID \",\""]);
    assert_members(
        &grammar,
        &alternative_lookahead(&grammar, "list", 1, 2),
        &["ID EOF", "ID \",\""],
    );
}

#[test]
fn test_cycle_statistics_are_recorded() {
    let grammar = left_recursive_list(2);
    let mut analyzer = Analyzer::new(&grammar);
    analyzer.look_rule(2, "list").unwrap();

    let stats = analyzer.stats();
    assert!(stats.cycle_breaks > 0);
    assert!(stats.fixpoint_iterations > 0);
    assert!(stats.expansions >= stats.fixpoint_iterations);
}

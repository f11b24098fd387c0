//! Lookahead queries and assertions phrased with token names.

use llk::{Analyzer, BlockId, Grammar, LookaheadSet};

pub fn rule_block(grammar: &Grammar, rule: &str) -> BlockId {
    match grammar.rule_by_name(rule) {
        Some(id) => grammar.rule(id).block,
        None => panic!("no rule named '{}'", rule),
    }
}

/// Lookahead of one alternative of a rule's block.
pub fn alternative_lookahead(
    grammar: &Grammar,
    rule: &str,
    alternative: usize,
    depth: usize,
) -> LookaheadSet {
    let mut analyzer = Analyzer::new(grammar);
    match analyzer.look_alternative(depth, rule_block(grammar, rule), alternative) {
        Ok(set) => set,
        Err(error) => panic!("lookahead query failed: {}", error),
    }
}

/// Assert a set's members, in any order. Sequences are written as
/// space-separated token names, e.g. `"ID \"=\""` or `"x <epsilon>"`.
pub fn assert_members(grammar: &Grammar, set: &LookaheadSet, expected: &[&str]) {
    let mut actual = set.render(grammar.vocabulary());
    actual.sort();
    let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(
        actual,
        expected,
        "unexpected lookahead {}",
        set.display(grammar.vocabulary())
    );
}

/// Every member fits in `depth` tokens.
pub fn assert_bounded(set: &LookaheadSet, depth: usize) {
    assert!(
        set.longest() <= depth,
        "member longer than {} tokens (longest is {})",
        depth,
        set.longest()
    );
}

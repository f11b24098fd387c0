use super::Grammar;
use super::error::GrammarError;
use super::node::{BlockKind, ElementKind};
use crate::base::BlockId;

/// Check the structural invariants analysis relies on.
///
/// # Errors
///
/// Returns an error for a rule without alternatives or an alternative that
/// cannot reach its block's terminator.
pub(super) fn validate(grammar: &Grammar) -> Result<(), GrammarError> {
    for (_, rule) in grammar.rules() {
        if grammar.block(rule.block).alternatives.is_empty() {
            return Err(GrammarError::EmptyRule(rule.name.clone()));
        }
    }

    for (id, block) in grammar.blocks() {
        if block.kind != BlockKind::Rule && block.alternatives.is_empty() {
            let (parent, alternative) = position_of_owner(grammar, id);
            return Err(GrammarError::dead_end(
                grammar.rule_name_of(parent),
                alternative,
                "contains a block with no alternatives",
            ));
        }
        check_sequences(grammar, id)?;
    }

    Ok(())
}

/// Every alternative's `next` chain must stay inside its block and end at
/// the block's terminator.
fn check_sequences(grammar: &Grammar, id: BlockId) -> Result<(), GrammarError> {
    let block = grammar.block(id);
    let limit = grammar.element_count();

    for (index, alternative) in block.alternatives.iter().enumerate() {
        let mut current = alternative.first;
        let mut steps = 0;
        while current != block.end {
            let element = grammar.element(current);
            if element.block != id || element.kind.is_terminator() {
                return Err(GrammarError::dead_end(
                    grammar.rule_name_of(id),
                    index,
                    "sequence leaves its block",
                ));
            }
            steps += 1;
            current = match element.next {
                Some(next) if steps <= limit => next,
                Some(_) => {
                    return Err(GrammarError::dead_end(
                        grammar.rule_name_of(id),
                        index,
                        "sequence loops back on itself",
                    ));
                }
                None => {
                    return Err(GrammarError::dead_end(
                        grammar.rule_name_of(id),
                        index,
                        "sequence stops before the terminator",
                    ));
                }
            };
        }
    }

    Ok(())
}

/// Block and alternative index that contain the owner element of a nested block.
fn position_of_owner(grammar: &Grammar, id: BlockId) -> (BlockId, usize) {
    let Some(owner) = grammar.block(id).owner else {
        return (id, 0);
    };
    let parent = grammar.enclosing_block(owner);
    let alternative = grammar
        .block(parent)
        .alternatives
        .iter()
        .position(|alt| alt.elements.contains(&owner))
        .unwrap_or(0);
    debug_assert!(matches!(
        grammar.element(owner).kind,
        ElementKind::NestedBlock(_) | ElementKind::Loop(_)
    ));
    (parent, alternative)
}

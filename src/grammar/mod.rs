//! Grammar graph: rules, alternative blocks and elements.
//!
//! All nodes live in arena vectors owned by [`Grammar`] and refer to each
//! other through typed indices, so the cyclic structure of a grammar
//! (recursive rules, loop back-edges, terminators pointing at their blocks)
//! needs no shared ownership. A grammar is immutable once built; analysis
//! state lives in the [`Analyzer`](crate::analysis::Analyzer).

mod builder;
mod error;
mod node;
mod validate;

pub use builder::{AltBuilder, BlockBuilder, GrammarBuilder, MAX_DEPTH};
pub use error::GrammarError;
pub use node::{
    Alternative, AlternativeBlock, BlockKind, BlockOptions, Element, ElementKind, Node, Rule,
};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{BlockId, ElementId, RuleId, Vocabulary};

/// A fully linked grammar graph.
#[derive(Debug, Clone)]
pub struct Grammar {
    max_k: usize,
    vocabulary: Vocabulary,
    rules: Vec<Rule>,
    /// Rule name -> RuleId (IndexMap preserves declaration order).
    rule_index: IndexMap<SmolStr, RuleId>,
    blocks: Vec<AlternativeBlock>,
    elements: Vec<Element>,
}

impl Grammar {
    /// Maximum lookahead depth analysis may use.
    pub fn max_k(&self) -> usize {
        self.max_k
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn rule_by_name(&self, name: &str) -> Option<RuleId> {
        self.rule_index.get(name).copied()
    }

    /// All rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| (RuleId::new(index), rule))
    }

    pub fn block(&self, id: BlockId) -> &AlternativeBlock {
        &self.blocks[id.index()]
    }

    /// All blocks in creation order (a rule block precedes its nested blocks).
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &AlternativeBlock)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (BlockId::new(index), block))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks where the generated parser must choose between branches.
    pub fn decisions(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks()
            .filter(|(_, block)| block.is_decision())
            .map(|(id, _)| id)
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Element that follows `id` in its sequence.
    pub fn next(&self, id: ElementId) -> Option<ElementId> {
        self.elements[id.index()].next
    }

    /// Block whose alternative contains `id` (for terminators, the block they end).
    pub fn enclosing_block(&self, id: ElementId) -> BlockId {
        self.elements[id.index()].block
    }

    /// Rule invoked by a `RuleReference` element.
    pub fn target_rule(&self, id: ElementId) -> Option<RuleId> {
        match self.elements[id.index()].kind {
            ElementKind::RuleReference { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Call sites of a rule.
    pub fn callers(&self, rule: RuleId) -> &[ElementId] {
        &self.rules[rule.index()].callers
    }

    /// Where control continues once a nested block or loop is left.
    /// `None` for rule blocks, whose exit is the rule's FOLLOW.
    pub fn exit_of(&self, block: BlockId) -> Option<ElementId> {
        self.block(block).owner.and_then(|owner| self.next(owner))
    }

    /// Name of the rule a block belongs to.
    pub fn rule_name_of(&self, block: BlockId) -> &str {
        &self.rule(self.block(block).rule).name
    }

    /// Human-readable location of a block, for diagnostics.
    pub fn describe_block(&self, id: BlockId) -> String {
        let block = self.block(id);
        let shape = match block.kind {
            BlockKind::Rule => "rule block",
            BlockKind::Subrule => "subrule",
            BlockKind::Optional => "optional block",
            BlockKind::ZeroOrMore => "(...)* loop",
            BlockKind::OneOrMore => "(...)+ loop",
        };
        format!("{} {} of rule '{}'", shape, id, self.rule_name_of(id))
    }
}

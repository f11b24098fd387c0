//! Grammar graph node types.

use smol_str::SmolStr;

use crate::base::{BlockId, ElementId, RuleId, TokenId};

/// Shape of an alternative block, which decides how its exit is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "export",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum BlockKind {
    /// Root block of a rule, terminated by the rule's `RuleEnd`.
    Rule,
    /// `( ... )`
    Subrule,
    /// `( ... )?`
    Optional,
    /// `( ... )*`
    ZeroOrMore,
    /// `( ... )+`
    OneOrMore,
}

impl BlockKind {
    /// Loops fall back from their terminator to their alternatives.
    pub fn is_loop(self) -> bool {
        matches!(self, BlockKind::ZeroOrMore | BlockKind::OneOrMore)
    }

    /// Blocks whose entry may skip every alternative.
    pub fn can_skip(self) -> bool {
        matches!(self, BlockKind::Optional | BlockKind::ZeroOrMore)
    }

    /// Blocks whose exit competes with their alternatives at a decision.
    pub fn has_exit_branch(self) -> bool {
        self.can_skip() || self == BlockKind::OneOrMore
    }
}

/// Per-block options set by the grammar author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockOptions {
    /// Explicit greediness of a loop or optional block. When set, the
    /// alternative-vs-exit conflict is considered resolved by the author.
    pub greedy: Option<bool>,
}

/// One candidate sequence of elements within a block.
#[derive(Debug, Clone)]
pub struct Alternative {
    /// Elements in sequence order.
    pub elements: Vec<ElementId>,
    /// First element, or the block terminator for an empty alternative.
    pub first: ElementId,
}

impl Alternative {
    /// Alternatives with no elements match nothing and fall through.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// An ordered choice of alternatives converging on one terminator.
#[derive(Debug, Clone)]
pub struct AlternativeBlock {
    pub kind: BlockKind,
    pub alternatives: Vec<Alternative>,
    /// `BlockEnd` element, or the rule's `RuleEnd` for a rule block.
    pub end: ElementId,
    /// Rule this block belongs to.
    pub rule: RuleId,
    /// `NestedBlock`/`Loop` element that contains this block. `None` for rule blocks.
    pub owner: Option<ElementId>,
    pub options: BlockOptions,
}

impl AlternativeBlock {
    /// A decision point needs lookahead to pick a branch.
    pub fn is_decision(&self) -> bool {
        self.alternatives.len() > 1 || (self.kind.has_exit_branch() && !self.alternatives.is_empty())
    }
}

/// Variants of an alternative element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// A token reference or literal.
    Terminal(TokenId),
    /// `.`: any token but end of input.
    Wildcard,
    /// `~T`: any token but `T` and end of input.
    NotTerminal(TokenId),
    /// Reference to another rule, resolved by name at build time.
    RuleReference { name: SmolStr, target: RuleId },
    /// A `Subrule` or `Optional` block.
    NestedBlock(BlockId),
    /// A `ZeroOrMore` or `OneOrMore` block.
    Loop(BlockId),
    /// Terminator of a nested block or loop.
    BlockEnd(BlockId),
    /// Terminator of a rule.
    RuleEnd(RuleId),
}

impl ElementKind {
    pub fn is_terminator(&self) -> bool {
        matches!(self, ElementKind::BlockEnd(_) | ElementKind::RuleEnd(_))
    }
}

/// A node of the grammar graph.
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ElementKind,
    /// Element that follows in sequence. `None` only for terminators.
    pub next: Option<ElementId>,
    /// Block whose alternative contains this element (for terminators, the
    /// block they terminate).
    pub block: BlockId,
}

/// A named entry point of the grammar.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: SmolStr,
    pub block: BlockId,
    pub end: ElementId,
    /// `RuleReference` elements targeting this rule, in declaration order.
    pub callers: Vec<ElementId>,
    /// Entry rules are followed by end of input.
    pub entry: bool,
}

/// Anything `look` can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    Element(ElementId),
    Block(BlockId),
}

impl From<ElementId> for Node {
    fn from(id: ElementId) -> Self {
        Node::Element(id)
    }
}

impl From<BlockId> for Node {
    fn from(id: BlockId) -> Self {
        Node::Block(id)
    }
}

//! Construction API for grammar graphs.
//!
//! The textual front end (or a test) describes rules as nested blocks of
//! alternatives; [`GrammarBuilder::build`] then links `next` pointers,
//! resolves rule references by name and validates the result.
//!
//! ```
//! use llk::grammar::GrammarBuilder;
//!
//! let mut builder = GrammarBuilder::new(2);
//! builder.entry_rule("stmt", |r| {
//!     r.alt(|a| {
//!         a.token("ID").token("=").rule_ref("expr");
//!     });
//!     r.alt(|a| {
//!         a.token("ID").token("(").token(")");
//!     });
//! });
//! builder.rule("expr", |r| {
//!     r.alt(|a| {
//!         a.token("INT").zero_or_more(|b| {
//!             b.alt(|a| {
//!                 a.token("+").token("INT");
//!             });
//!         });
//!     });
//! });
//! let grammar = builder.build().unwrap();
//! assert_eq!(grammar.rules().count(), 2);
//! ```

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use super::error::GrammarError;
use super::node::{
    Alternative, AlternativeBlock, BlockKind, BlockOptions, Element, ElementKind, Rule,
};
use super::validate::validate;
use super::Grammar;
use crate::base::{BlockId, ElementId, RuleId, Vocabulary, is_identifier};

/// Largest supported lookahead depth.
pub const MAX_DEPTH: usize = u8::MAX as usize;

#[derive(Debug)]
enum PendingKind {
    Ready(ElementKind),
    RuleReference(SmolStr),
}

#[derive(Debug)]
struct PendingElement {
    kind: PendingKind,
    block: BlockId,
}

#[derive(Debug)]
struct PendingBlock {
    kind: BlockKind,
    alternatives: Vec<Vec<ElementId>>,
    end: ElementId,
    rule: RuleId,
    owner: Option<ElementId>,
    options: BlockOptions,
}

#[derive(Debug)]
struct PendingRule {
    name: SmolStr,
    block: BlockId,
    end: ElementId,
    entry: bool,
}

/// Collects rules, blocks and elements before linking them into a [`Grammar`].
#[derive(Debug)]
pub struct GrammarBuilder {
    max_k: usize,
    vocabulary: Vocabulary,
    rules: Vec<PendingRule>,
    blocks: Vec<PendingBlock>,
    elements: Vec<PendingElement>,
}

impl GrammarBuilder {
    /// Start a grammar analyzed with lookahead depth up to `max_k`.
    pub fn new(max_k: usize) -> Self {
        Self {
            max_k,
            vocabulary: Vocabulary::new(),
            rules: Vec::new(),
            blocks: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Define a rule. Its alternatives are added through the block builder.
    pub fn rule(&mut self, name: &str, define: impl FnOnce(&mut BlockBuilder<'_>)) -> &mut Self {
        self.add_rule(name, false, define)
    }

    /// Define a rule that the parser may be started at; it is followed by end of input.
    pub fn entry_rule(
        &mut self,
        name: &str,
        define: impl FnOnce(&mut BlockBuilder<'_>),
    ) -> &mut Self {
        self.add_rule(name, true, define)
    }

    /// Intern a token name ahead of use, so its id is known to the caller.
    pub fn token(&mut self, name: &str) -> crate::base::TokenId {
        self.vocabulary.intern(name)
    }

    fn add_rule(
        &mut self,
        name: &str,
        entry: bool,
        define: impl FnOnce(&mut BlockBuilder<'_>),
    ) -> &mut Self {
        let rule = RuleId::new(self.rules.len());
        let block = BlockId::new(self.blocks.len());
        let end = self.push_element(ElementKind::RuleEnd(rule), block);
        self.blocks.push(PendingBlock {
            kind: BlockKind::Rule,
            alternatives: Vec::new(),
            end,
            rule,
            owner: None,
            options: BlockOptions::default(),
        });
        self.rules.push(PendingRule {
            name: SmolStr::new(name),
            block,
            end,
            entry,
        });

        define(&mut BlockBuilder {
            builder: &mut *self,
            block,
        });
        self
    }

    fn push_element(&mut self, kind: ElementKind, block: BlockId) -> ElementId {
        let id = ElementId::new(self.elements.len());
        self.elements.push(PendingElement {
            kind: PendingKind::Ready(kind),
            block,
        });
        id
    }

    /// Link, resolve and validate the grammar.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found: invalid `max_k`, bad or
    /// duplicate rule names, unresolved rule references, dead-end alternatives.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if self.max_k == 0 || self.max_k > MAX_DEPTH {
            return Err(GrammarError::InvalidMaxK(self.max_k));
        }

        let mut rule_index: IndexMap<SmolStr, RuleId> = IndexMap::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter().enumerate() {
            if !is_identifier(&rule.name) {
                return Err(GrammarError::InvalidRuleName(rule.name.clone()));
            }
            if rule_index.insert(rule.name.clone(), RuleId::new(index)).is_some() {
                return Err(GrammarError::DuplicateRule(rule.name.clone()));
            }
        }

        // Resolve rule references by name.
        let mut elements = Vec::with_capacity(self.elements.len());
        for pending in self.elements {
            let kind = match pending.kind {
                PendingKind::Ready(kind) => kind,
                PendingKind::RuleReference(name) => match rule_index.get(&name) {
                    Some(&target) => ElementKind::RuleReference { name, target },
                    None => {
                        let from = self.blocks[pending.block.index()].rule;
                        return Err(GrammarError::UnresolvedRule {
                            name,
                            from: self.rules[from.index()].name.clone(),
                        });
                    }
                },
            };
            elements.push(Element {
                kind,
                next: None,
                block: pending.block,
            });
        }

        // Link sequences: each element points at its successor, the last one
        // at the block terminator.
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for pending in self.blocks {
            let mut alternatives = Vec::with_capacity(pending.alternatives.len());
            for sequence in pending.alternatives {
                for pair in sequence.windows(2) {
                    elements[pair[0].index()].next = Some(pair[1]);
                }
                if let Some(&last) = sequence.last() {
                    elements[last.index()].next = Some(pending.end);
                }
                let first = sequence.first().copied().unwrap_or(pending.end);
                alternatives.push(Alternative {
                    elements: sequence,
                    first,
                });
            }
            blocks.push(AlternativeBlock {
                kind: pending.kind,
                alternatives,
                end: pending.end,
                rule: pending.rule,
                owner: pending.owner,
                options: pending.options,
            });
        }

        let mut rules: Vec<Rule> = self
            .rules
            .into_iter()
            .map(|rule| Rule {
                name: rule.name,
                block: rule.block,
                end: rule.end,
                callers: Vec::new(),
                entry: rule.entry,
            })
            .collect();
        for (index, element) in elements.iter().enumerate() {
            if let ElementKind::RuleReference { target, .. } = element.kind {
                rules[target.index()].callers.push(ElementId::new(index));
            }
        }

        let grammar = Grammar {
            max_k: self.max_k,
            vocabulary: self.vocabulary,
            rules,
            rule_index,
            blocks,
            elements,
        };
        validate(&grammar)?;

        debug!(
            "built grammar: {} rules, {} blocks, {} elements, {} tokens, max_k={}",
            grammar.rules.len(),
            grammar.blocks.len(),
            grammar.elements.len(),
            grammar.vocabulary.len(),
            grammar.max_k
        );
        Ok(grammar)
    }
}

/// Adds alternatives to a rule block or a nested block.
pub struct BlockBuilder<'a> {
    builder: &'a mut GrammarBuilder,
    block: BlockId,
}

impl BlockBuilder<'_> {
    /// Handle of the block being built.
    pub fn id(&self) -> BlockId {
        self.block
    }

    /// Append an alternative. An alternative with no elements matches nothing.
    pub fn alt(&mut self, define: impl FnOnce(&mut AltBuilder<'_>)) -> &mut Self {
        let alternatives = &mut self.builder.blocks[self.block.index()].alternatives;
        let alt = alternatives.len();
        alternatives.push(Vec::new());
        define(&mut AltBuilder {
            builder: &mut *self.builder,
            block: self.block,
            alt,
        });
        self
    }

    /// Append an alternative that matches nothing.
    pub fn empty_alt(&mut self) -> &mut Self {
        self.alt(|_| {})
    }

    /// Declare the block greedy (or not), settling its exit-branch conflict.
    pub fn greedy(&mut self, greedy: bool) -> &mut Self {
        self.builder.blocks[self.block.index()].options.greedy = Some(greedy);
        self
    }
}

/// Appends elements to one alternative.
pub struct AltBuilder<'a> {
    builder: &'a mut GrammarBuilder,
    block: BlockId,
    alt: usize,
}

impl AltBuilder<'_> {
    fn push(&mut self, kind: PendingKind) -> ElementId {
        let id = ElementId::new(self.builder.elements.len());
        self.builder.elements.push(PendingElement {
            kind,
            block: self.block,
        });
        self.builder.blocks[self.block.index()].alternatives[self.alt].push(id);
        id
    }

    /// Match a token (by name; literals such as `"+"` are names too).
    pub fn token(&mut self, name: &str) -> &mut Self {
        let token = self.builder.vocabulary.intern(name);
        self.push(PendingKind::Ready(ElementKind::Terminal(token)));
        self
    }

    /// Match any token except `name`.
    pub fn not_token(&mut self, name: &str) -> &mut Self {
        let token = self.builder.vocabulary.intern(name);
        self.push(PendingKind::Ready(ElementKind::NotTerminal(token)));
        self
    }

    /// Match any single token.
    pub fn wildcard(&mut self) -> &mut Self {
        self.push(PendingKind::Ready(ElementKind::Wildcard));
        self
    }

    /// Invoke another rule, resolved by name at build time.
    pub fn rule_ref(&mut self, name: &str) -> &mut Self {
        self.push(PendingKind::RuleReference(SmolStr::new(name)));
        self
    }

    /// `( ... )`
    pub fn subrule(&mut self, define: impl FnOnce(&mut BlockBuilder<'_>)) -> &mut Self {
        self.nested(BlockKind::Subrule, define)
    }

    /// `( ... )?`
    pub fn optional(&mut self, define: impl FnOnce(&mut BlockBuilder<'_>)) -> &mut Self {
        self.nested(BlockKind::Optional, define)
    }

    /// `( ... )*`
    pub fn zero_or_more(&mut self, define: impl FnOnce(&mut BlockBuilder<'_>)) -> &mut Self {
        self.nested(BlockKind::ZeroOrMore, define)
    }

    /// `( ... )+`
    pub fn one_or_more(&mut self, define: impl FnOnce(&mut BlockBuilder<'_>)) -> &mut Self {
        self.nested(BlockKind::OneOrMore, define)
    }

    fn nested(
        &mut self,
        kind: BlockKind,
        define: impl FnOnce(&mut BlockBuilder<'_>),
    ) -> &mut Self {
        let block = BlockId::new(self.builder.blocks.len());
        let element = if kind.is_loop() {
            ElementKind::Loop(block)
        } else {
            ElementKind::NestedBlock(block)
        };
        let owner = self.push(PendingKind::Ready(element));
        let end = self.builder.push_element(ElementKind::BlockEnd(block), block);
        let rule = self.builder.blocks[self.block.index()].rule;
        self.builder.blocks.push(PendingBlock {
            kind,
            alternatives: Vec::new(),
            end,
            rule,
            owner: Some(owner),
            options: BlockOptions::default(),
        });

        define(&mut BlockBuilder {
            builder: &mut *self.builder,
            block,
        });
        self
    }
}

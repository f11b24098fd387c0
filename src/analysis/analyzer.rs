//! The LL(k) lookahead computation.
//!
//! `look(k, node)` is the set of token sequences of length up to `k` that
//! can be seen when a parser stands at `node`. It is computed depth-first
//! over the grammar graph with three pieces of side state, all owned here
//! and none stored in the graph:
//!
//! - a **cache** of finished results keyed by (node, depth, context);
//! - a **lock table** of keys currently being expanded. Reaching a locked
//!   key means the grammar cycles without consuming a token (left recursion,
//!   nullable loop bodies, mutually tail-calling rules). The lock answers
//!   with the key's provisional value, initially the empty set;
//! - **provisional values** for keys that were re-entered while locked.
//!   The lowest frame of a cycle re-expands the cycle in rounds until no
//!   provisional value grows, which yields the least fixed point.
//!
//! A key whose result read a lock held lower on the stack is *pending*: it
//! is answered from the pending table for the rest of the round and dropped
//! when the round is repeated. When the cycle's lowest frame stabilises,
//! every pending result of its last round is final and moves to the cache.
//! Each key is therefore expanded at most once per round, and at most once
//! per outer query outside cycles.
//!
//! The *context* says what a rule end means. In global context the rule's
//! FOLLOW is used: the union over every call site of what follows that call.
//! In call-site context (inside a rule entered through a `RuleReference`) a
//! rule end yields the epsilon marker, and the reference splices in the
//! lookahead after its own position.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use tracing::trace;

use super::config::AnalyzerConfig;
use super::error::AnalysisError;
use crate::base::{BlockId, ElementId, RuleId, TokenId};
use crate::grammar::{BlockKind, ElementKind, Grammar, Node};
use crate::lookahead::LookaheadSet;

/// What a rule end resolves to while computing a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Context {
    /// Rule ends continue with the rule's FOLLOW set.
    Global,
    /// Rule ends yield epsilon; the caller supplies the continuation.
    CallSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LookKey {
    node: Node,
    depth: usize,
    context: Context,
}

impl LookKey {
    fn element(id: ElementId, depth: usize, context: Context) -> Self {
        Self {
            node: Node::Element(id),
            depth,
            context,
        }
    }

    fn block(id: BlockId, depth: usize, context: Context) -> Self {
        Self {
            node: Node::Block(id),
            depth,
            context,
        }
    }
}

/// Counters describing the work done by an analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Public queries answered.
    pub queries: usize,
    /// Keys expanded (each fixed-point round counts).
    pub expansions: usize,
    /// Keys answered from the cache or from the current round's pending results.
    pub cache_hits: usize,
    /// Locked keys reached again.
    pub cycle_breaks: usize,
    /// Extra rounds a cycle's lowest frame spent growing provisional values.
    pub fixpoint_iterations: usize,
}

/// Computes lookahead sets over one grammar.
///
/// An analyzer is cheap to create and owns all of its state, so several
/// analyzers (over the same or different grammars) can run on different
/// threads.
pub struct Analyzer<'g> {
    grammar: &'g Grammar,
    config: AnalyzerConfig,
    cache: FxHashMap<LookKey, LookaheadSet>,
    /// Lock table: key -> stack frame that is expanding it.
    active: FxHashMap<LookKey, usize>,
    /// Per stack frame: was the key re-entered while locked.
    reentered: Vec<bool>,
    /// Lowest stack frame the current expansion read a provisional value from.
    floor: Option<usize>,
    /// Whether a provisional value grew in the current round without being
    /// re-expanded yet.
    unstable: bool,
    provisional: FxHashMap<LookKey, LookaheadSet>,
    /// Finished results that still depend on a lock: result and that frame.
    pending: FxHashMap<LookKey, (LookaheadSet, usize)>,
    /// Pending keys in the order they finished.
    pending_order: Vec<LookKey>,
    left_recursive: BTreeSet<RuleId>,
    stats: AnalysisStats,
}

impl<'g> Analyzer<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_config(grammar, AnalyzerConfig::default())
    }

    pub fn with_config(grammar: &'g Grammar, config: AnalyzerConfig) -> Self {
        Self {
            grammar,
            config,
            cache: FxHashMap::default(),
            active: FxHashMap::default(),
            reentered: Vec::new(),
            floor: None,
            unstable: false,
            provisional: FxHashMap::default(),
            pending: FxHashMap::default(),
            pending_order: Vec::new(),
            left_recursive: BTreeSet::new(),
            stats: AnalysisStats::default(),
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn stats(&self) -> AnalysisStats {
        self.stats
    }

    /// Rules found to reach themselves without consuming a token.
    pub fn left_recursive_rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.left_recursive.iter().copied()
    }

    /// Number of cached results.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.left_recursive.clear();
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Lookahead of `depth` tokens at a graph node.
    ///
    /// Reaching the end of a rule continues with the rule's FOLLOW set.
    ///
    /// # Errors
    ///
    /// Returns an error if `depth` is outside `1..=max_k` or the node is not
    /// part of the grammar.
    pub fn look(
        &mut self,
        depth: usize,
        node: impl Into<Node>,
    ) -> Result<LookaheadSet, AnalysisError> {
        let node = node.into();
        self.check_depth(depth)?;
        self.check_node(node)?;
        Ok(self.query(LookKey {
            node,
            depth,
            context: Context::Global,
        }))
    }

    /// Lookahead of one alternative of a block.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid depth, block or alternative index.
    pub fn look_alternative(
        &mut self,
        depth: usize,
        block: BlockId,
        alternative: usize,
    ) -> Result<LookaheadSet, AnalysisError> {
        self.check_node(Node::Block(block))?;
        let first = self
            .grammar
            .block(block)
            .alternatives
            .get(alternative)
            .map(|alt| alt.first)
            .ok_or(AnalysisError::UnknownAlternative { block, alternative })?;
        self.look(depth, first)
    }

    /// Lookahead after leaving a block: what its exit branch sees.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid depth or block.
    pub fn look_exit(
        &mut self,
        depth: usize,
        block: BlockId,
    ) -> Result<LookaheadSet, AnalysisError> {
        self.check_node(Node::Block(block))?;
        let exit = self.exit_target(block);
        self.look(depth, exit)
    }

    /// FIRST set of a rule as seen from a call site: where the rule can end
    /// without `depth` tokens, the result carries epsilon prefixes.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid depth or an unknown rule.
    pub fn look_rule(&mut self, depth: usize, rule: &str) -> Result<LookaheadSet, AnalysisError> {
        let rule = self.rule_id(rule)?;
        self.check_depth(depth)?;
        let block = self.grammar.rule(rule).block;
        Ok(self.query(LookKey::block(block, depth, Context::CallSite)))
    }

    /// FOLLOW set of a rule: union over all call sites of what follows the
    /// call, plus end of input for entry rules and rules nobody calls.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid depth or an unknown rule.
    pub fn follow(&mut self, depth: usize, rule: &str) -> Result<LookaheadSet, AnalysisError> {
        let rule = self.rule_id(rule)?;
        self.check_depth(depth)?;
        let end = self.grammar.rule(rule).end;
        Ok(self.query(LookKey::element(end, depth, Context::Global)))
    }

    fn check_depth(&self, depth: usize) -> Result<(), AnalysisError> {
        let max_k = self.grammar.max_k();
        if depth == 0 || depth > max_k {
            return Err(AnalysisError::DepthOutOfRange { depth, max_k });
        }
        Ok(())
    }

    fn check_node(&self, node: Node) -> Result<(), AnalysisError> {
        let exists = match node {
            Node::Element(id) => id.index() < self.grammar.element_count(),
            Node::Block(id) => id.index() < self.grammar.block_count(),
        };
        if exists {
            Ok(())
        } else {
            Err(AnalysisError::UnknownNode(node))
        }
    }

    fn rule_id(&self, name: &str) -> Result<RuleId, AnalysisError> {
        self.grammar
            .rule_by_name(name)
            .ok_or_else(|| AnalysisError::UnknownRule(name.to_string()))
    }

    fn query(&mut self, key: LookKey) -> LookaheadSet {
        self.stats.queries += 1;
        let result = self.look_key(key);
        if self.reentered.is_empty() {
            self.provisional.clear();
            self.pending.clear();
            self.pending_order.clear();
            self.floor = None;
            self.unstable = false;
        }
        result
    }

    // ========================================================================
    // FIXED POINT
    // ========================================================================

    fn look_key(&mut self, key: LookKey) -> LookaheadSet {
        if let Some(found) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            return found.clone();
        }
        if let Some((found, floor)) = self.pending.get(&key) {
            self.stats.cache_hits += 1;
            let (found, floor) = (found.clone(), *floor);
            self.lower_floor(floor);
            return found;
        }
        if let Some(&frame) = self.active.get(&key) {
            return self.break_cycle(key, frame);
        }

        let frame = self.reentered.len();
        self.active.insert(key, frame);
        self.reentered.push(false);
        let outer_floor = self.floor.take();
        let outer_unstable = std::mem::replace(&mut self.unstable, false);
        let mark = self.pending_order.len();

        let (result, floor, unstable) = loop {
            self.stats.expansions += 1;
            let result = self.expand(key);
            // Reads of this frame's own provisional value are settled here.
            let floor = self.floor.take().filter(|&f| f < frame);
            let reentered = std::mem::replace(&mut self.reentered[frame], false);
            let grew = reentered
                && self
                    .provisional
                    .get(&key)
                    .map_or(!result.is_empty(), |seed| *seed != result);
            let unstable = std::mem::replace(&mut self.unstable, false) || grew;
            if grew {
                self.provisional.insert(key, result.clone());
            }
            if unstable && floor.is_none() {
                self.stats.fixpoint_iterations += 1;
                trace!(
                    "[LOOK] {:?} depth={} grew to {} members, iterating",
                    key.node,
                    key.depth,
                    result.len()
                );
                self.discard_pending(mark);
                continue;
            }
            break (result, floor, unstable);
        };

        self.reentered.pop();
        self.active.remove(&key);
        self.floor = outer_floor;
        self.unstable = outer_unstable;

        match floor {
            None => {
                self.commit_pending(mark);
                self.provisional.remove(&key);
                self.cache.insert(key, result.clone());
            }
            Some(floor) => {
                // The lowest frame of the cycle repeats the round if needed.
                self.unstable |= unstable;
                for pending in &self.pending_order[mark..] {
                    if let Some(entry) = self.pending.get_mut(pending) {
                        entry.1 = entry.1.min(floor);
                    }
                }
                self.pending.insert(key, (result.clone(), floor));
                self.pending_order.push(key);
                self.provisional.insert(key, result.clone());
                self.lower_floor(floor);
            }
        }
        result
    }

    fn lower_floor(&mut self, frame: usize) {
        self.floor = Some(self.floor.map_or(frame, |f| f.min(frame)));
    }

    /// Forget the pending results finished since `mark`.
    fn discard_pending(&mut self, mark: usize) {
        for key in self.pending_order.drain(mark..) {
            self.pending.remove(&key);
        }
    }

    /// Move the pending results finished since `mark` to the cache.
    fn commit_pending(&mut self, mark: usize) {
        for key in self.pending_order.drain(mark..) {
            if let Some((result, _)) = self.pending.remove(&key) {
                self.provisional.remove(&key);
                self.cache.insert(key, result);
            }
        }
    }

    fn break_cycle(&mut self, key: LookKey, frame: usize) -> LookaheadSet {
        self.stats.cycle_breaks += 1;
        self.reentered[frame] = true;
        self.lower_floor(frame);

        if let Node::Block(id) = key.node {
            let block = self.grammar.block(id);
            if block.kind == BlockKind::Rule && key.context == Context::CallSite {
                self.left_recursive.insert(block.rule);
            }
        }

        trace!(
            "[LOOK] cycle at {:?} depth={} (frame {})",
            key.node, key.depth, frame
        );
        self.provisional
            .get(&key)
            .cloned()
            .unwrap_or_else(|| LookaheadSet::empty(key.depth))
    }

    // ========================================================================
    // EXPANSION
    // ========================================================================

    fn expand(&mut self, key: LookKey) -> LookaheadSet {
        let LookKey {
            node,
            depth,
            context,
        } = key;
        match node {
            Node::Block(id) => self.expand_block(id, depth, context),
            Node::Element(id) => self.expand_element(id, depth, context),
        }
    }

    /// Union of all alternatives; blocks that may be skipped add their exit.
    fn expand_block(&mut self, id: BlockId, depth: usize, context: Context) -> LookaheadSet {
        let grammar = self.grammar;
        let block = grammar.block(id);
        let mut result = LookaheadSet::empty(depth);
        for alt in &block.alternatives {
            let set = self.look_key(LookKey::element(alt.first, depth, context));
            result.union_with(&set);
        }
        if block.kind.can_skip() {
            let exit = self.exit_target(id);
            let set = self.look_key(LookKey::element(exit, depth, context));
            result.union_with(&set);
        }
        result
    }

    fn expand_element(&mut self, id: ElementId, depth: usize, context: Context) -> LookaheadSet {
        let grammar = self.grammar;
        match &grammar.element(id).kind {
            ElementKind::Terminal(token) => self.look_tokens([*token], id, depth, context),
            ElementKind::Wildcard => {
                self.look_tokens(grammar.vocabulary().matchable(), id, depth, context)
            }
            ElementKind::NotTerminal(excluded) => {
                let excluded = *excluded;
                let tokens = grammar.vocabulary().matchable().filter(|&t| t != excluded);
                self.look_tokens(tokens, id, depth, context)
            }
            ElementKind::RuleReference { target, .. } => {
                self.look_reference(*target, id, depth, context)
            }
            ElementKind::NestedBlock(block) | ElementKind::Loop(block) => {
                self.look_key(LookKey::block(*block, depth, context))
            }
            ElementKind::BlockEnd(block) => {
                let exit = self.exit_target(*block);
                let mut result = self.look_key(LookKey::element(exit, depth, context));
                if grammar.block(*block).kind.is_loop() {
                    let again = self.look_key(LookKey::block(*block, depth, context));
                    result.union_with(&again);
                }
                result
            }
            ElementKind::RuleEnd(rule) => match context {
                Context::CallSite => LookaheadSet::epsilon(depth),
                Context::Global => self.follow_set(*rule, depth),
            },
        }
    }

    /// Each token followed by `look(depth - 1, next)`.
    fn look_tokens(
        &mut self,
        tokens: impl IntoIterator<Item = TokenId>,
        id: ElementId,
        depth: usize,
        context: Context,
    ) -> LookaheadSet {
        let mut result = LookaheadSet::empty(depth);
        let mut tail: Option<LookaheadSet> = None;
        for token in tokens {
            if depth == 1 || token.is_eof() {
                result.insert(vec![token]);
                continue;
            }
            if tail.is_none() {
                tail = Some(self.look_next(id, depth - 1, context));
            }
            if let Some(tail) = &tail {
                result.union_with(&tail.prepend(token));
            }
        }
        result
    }

    /// The referenced rule's lookahead, continued after the call site
    /// wherever the rule can end early.
    fn look_reference(
        &mut self,
        target: RuleId,
        id: ElementId,
        depth: usize,
        context: Context,
    ) -> LookaheadSet {
        let block = self.grammar.rule(target).block;
        let head = self.look_key(LookKey::block(block, depth, Context::CallSite));
        if !head.has_epsilon() {
            return head;
        }
        let mut tails = BTreeMap::new();
        for remaining in head.epsilon_depths() {
            tails.insert(remaining, self.look_next(id, remaining, context));
        }
        head.splice(&tails)
    }

    /// FOLLOW: union over call sites, with end of input for entry rules and
    /// rules that are never called.
    fn follow_set(&mut self, rule: RuleId, depth: usize) -> LookaheadSet {
        let grammar = self.grammar;
        let rule = grammar.rule(rule);
        let mut result = LookaheadSet::empty(depth);
        if rule.entry || rule.callers.is_empty() {
            result.insert(vec![TokenId::EOF]);
        }
        for &site in &rule.callers {
            let set = self.look_next(site, depth, Context::Global);
            result.union_with(&set);
        }
        result
    }

    fn look_next(&mut self, id: ElementId, depth: usize, context: Context) -> LookaheadSet {
        match self.grammar.next(id) {
            Some(next) => self.look_key(LookKey::element(next, depth, context)),
            None => LookaheadSet::epsilon(depth),
        }
    }

    /// Element control reaches when a block is left.
    fn exit_target(&self, block: BlockId) -> ElementId {
        self.grammar
            .exit_of(block)
            .unwrap_or_else(|| self.grammar.block(block).end)
    }
}

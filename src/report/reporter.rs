//! Per-decision lookahead comparison.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use super::diagnostics::{Diagnostic, DiagnosticCollector};
use crate::analysis::{AnalysisError, AnalysisStats, Analyzer};
use crate::base::{BlockId, RuleId};
use crate::grammar::{BlockKind, Grammar, Node};
use crate::lookahead::LookaheadSet;

// ============================================================================
// REPORT TYPES
// ============================================================================

/// One way out of a decision block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    /// Alternative by index, in declaration order.
    Alternative(usize),
    /// Skip an optional block or leave a loop.
    Exit,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Alternative(index) => write!(f, "alternative {}", index + 1),
            Branch::Exit => f.write_str("the exit branch"),
        }
    }
}

/// Two branches of a decision that share lookahead at `depth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    pub block: BlockId,
    pub rule: RuleId,
    /// The earlier branch; the generated parser prefers it.
    pub first: Branch,
    pub second: Branch,
    pub depth: usize,
    /// Overlapping sequences, at most `max_evidence` of them.
    pub overlap: LookaheadSet,
    /// Size of the full overlap before it was capped.
    pub overlap_size: usize,
}

impl Ambiguity {
    pub fn involves_exit(&self) -> bool {
        self.first == Branch::Exit || self.second == Branch::Exit
    }
}

/// A branch and its lookahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchLookahead {
    pub branch: Branch,
    pub lookahead: LookaheadSet,
}

/// What a code generator needs to emit one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub block: BlockId,
    pub rule: RuleId,
    pub kind: BlockKind,
    /// Smallest depth at which all branches are disjoint, or `max_k`.
    pub depth: usize,
    /// Whether the branches are disjoint at `depth`.
    pub deterministic: bool,
    pub branches: Vec<BranchLookahead>,
}

impl Decision {
    pub fn lookahead(&self, branch: Branch) -> Option<&LookaheadSet> {
        self.branches
            .iter()
            .find(|b| b.branch == branch)
            .map(|b| &b.lookahead)
    }
}

/// Everything found by checking a grammar.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub decisions: Vec<Decision>,
    pub ambiguities: Vec<Ambiguity>,
    pub diagnostics: Vec<Diagnostic>,
    pub left_recursive: Vec<RuleId>,
    pub stats: AnalysisStats,
}

impl AnalysisReport {
    /// No branch pair overlaps and no rule is left-recursive.
    pub fn is_deterministic(&self) -> bool {
        self.ambiguities.is_empty() && self.left_recursive.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn decision(&self, block: BlockId) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.block == block)
    }

    pub fn ambiguities_in(&self, block: BlockId) -> impl Iterator<Item = &Ambiguity> + '_ {
        self.ambiguities.iter().filter(move |a| a.block == block)
    }
}

// ============================================================================
// REPORTER
// ============================================================================

/// Checks decision blocks through an [`Analyzer`] and collects the findings.
///
/// Every branch is compared with every other branch at the grammar's
/// `max_k`. Overlaps are kept as [`Ambiguity`] records and reported as
/// warnings; the parser resolves them by taking the earlier branch.
pub struct AmbiguityReporter<'a, 'g> {
    analyzer: &'a mut Analyzer<'g>,
    checked: FxHashSet<BlockId>,
    decisions: Vec<Decision>,
    ambiguities: Vec<Ambiguity>,
    collector: DiagnosticCollector,
}

impl<'a, 'g> AmbiguityReporter<'a, 'g> {
    pub fn new(analyzer: &'a mut Analyzer<'g>) -> Self {
        Self {
            analyzer,
            checked: FxHashSet::default(),
            decisions: Vec::new(),
            ambiguities: Vec::new(),
            collector: DiagnosticCollector::new(),
        }
    }

    /// Check every rule and every decision of the grammar.
    pub fn check_all(&mut self) {
        let grammar = self.analyzer.grammar();
        let max_k = grammar.max_k();
        // Rule FIRST sets surface left recursion in rules without decisions.
        for (_, rule) in grammar.rules() {
            if let Err(error) = self.analyzer.look_rule(max_k, &rule.name) {
                debug!("[REPORT] skipped rule '{}': {}", rule.name, error);
            }
        }
        for block in grammar.decisions() {
            if let Err(error) = self.check_block(block) {
                debug!("[REPORT] skipped {}: {}", block, error);
            }
        }
    }

    /// Compare the branches of one block. Blocks with a single branch are
    /// not decisions and record nothing; checking a block twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is not part of the analyzed grammar.
    pub fn check_block(&mut self, block: BlockId) -> Result<(), AnalysisError> {
        let grammar = self.analyzer.grammar();
        if block.index() >= grammar.block_count() {
            return Err(AnalysisError::UnknownNode(Node::Block(block)));
        }
        if !self.checked.insert(block) {
            return Ok(());
        }
        let data = grammar.block(block);
        let branches = branches_of(grammar, block);
        if branches.len() < 2 {
            return Ok(());
        }

        let max_k = grammar.max_k();
        let sets = self.branch_lookahead(block, &branches, max_k)?;

        if self.analyzer.config().report_unreachable {
            for (branch, set) in branches.iter().zip(&sets) {
                let Branch::Alternative(index) = *branch else {
                    continue;
                };
                if set.is_empty() {
                    self.collector.unreachable_alternative(
                        grammar.rule_name_of(block),
                        block,
                        &grammar.describe_block(block),
                        index,
                    );
                }
            }
        }

        for i in 0..branches.len() {
            for j in i + 1..branches.len() {
                let overlap = sets[i].intersection(&sets[j]);
                if overlap.is_empty() {
                    continue;
                }
                let ambiguity = Ambiguity {
                    block,
                    rule: data.rule,
                    first: branches[i],
                    second: branches[j],
                    depth: max_k,
                    overlap_size: overlap.len(),
                    overlap: cap(&overlap, self.analyzer.config().max_evidence),
                };
                if ambiguity.involves_exit() && data.options.greedy.is_some() {
                    // An explicit greedy option settles the conflict.
                    continue;
                }
                self.record(ambiguity);
            }
        }

        let decision = self.summarize(block, &branches, sets)?;
        self.decisions.push(decision);
        Ok(())
    }

    /// Finish checking and hand over the findings.
    pub fn report(mut self) -> AnalysisReport {
        let grammar = self.analyzer.grammar();
        let left_recursive: Vec<RuleId> = self.analyzer.left_recursive_rules().collect();
        for &rule in &left_recursive {
            self.collector.left_recursion(&grammar.rule(rule).name);
        }
        debug!(
            "[REPORT] {} decisions, {} ambiguities, {} left-recursive rules",
            self.decisions.len(),
            self.ambiguities.len(),
            left_recursive.len()
        );
        AnalysisReport {
            decisions: self.decisions,
            ambiguities: self.ambiguities,
            diagnostics: self.collector.take(),
            left_recursive,
            stats: self.analyzer.stats(),
        }
    }

    fn record(&mut self, ambiguity: Ambiguity) {
        let grammar = self.analyzer.grammar();
        let location = grammar.describe_block(ambiguity.block);
        let evidence = ambiguity.overlap.display(grammar.vocabulary()).to_string();
        warn!(
            "[REPORT] {}: {} and {} overlap on {}",
            location, ambiguity.first, ambiguity.second, evidence
        );
        if !ambiguity.involves_exit() || self.analyzer.config().warn_exit_ambiguities {
            let first = ambiguity.first.to_string();
            let second = ambiguity.second.to_string();
            self.collector.ambiguity(
                grammar.rule_name_of(ambiguity.block),
                ambiguity.block,
                &location,
                (first.as_str(), second.as_str()),
                &evidence,
                ambiguity.involves_exit(),
            );
        }
        self.ambiguities.push(ambiguity);
    }

    fn branch_lookahead(
        &mut self,
        block: BlockId,
        branches: &[Branch],
        depth: usize,
    ) -> Result<Vec<LookaheadSet>, AnalysisError> {
        branches
            .iter()
            .map(|branch| match *branch {
                Branch::Alternative(index) => self.analyzer.look_alternative(depth, block, index),
                Branch::Exit => self.analyzer.look_exit(depth, block),
            })
            .collect()
    }

    /// Find the smallest depth separating all branches.
    fn summarize(
        &mut self,
        block: BlockId,
        branches: &[Branch],
        at_max: Vec<LookaheadSet>,
    ) -> Result<Decision, AnalysisError> {
        let grammar = self.analyzer.grammar();
        let max_k = grammar.max_k();
        let mut chosen = (max_k, false, at_max);
        for depth in 1..=max_k {
            let sets = if depth == max_k {
                chosen.2.clone()
            } else {
                self.branch_lookahead(block, branches, depth)?
            };
            if pairwise_disjoint(&sets) {
                chosen = (depth, true, sets);
                break;
            }
        }
        let (depth, deterministic, sets) = chosen;
        let data = grammar.block(block);
        Ok(Decision {
            block,
            rule: data.rule,
            kind: data.kind,
            depth,
            deterministic,
            branches: branches
                .iter()
                .zip(sets)
                .map(|(&branch, lookahead)| BranchLookahead { branch, lookahead })
                .collect(),
        })
    }
}

/// Alternatives in order, then the exit for blocks that can be left early.
fn branches_of(grammar: &Grammar, block: BlockId) -> Vec<Branch> {
    let data = grammar.block(block);
    let mut branches: Vec<Branch> = (0..data.alternatives.len())
        .map(Branch::Alternative)
        .collect();
    if data.kind.has_exit_branch() && !data.alternatives.is_empty() {
        branches.push(Branch::Exit);
    }
    branches
}

fn pairwise_disjoint(sets: &[LookaheadSet]) -> bool {
    sets.iter()
        .enumerate()
        .all(|(i, a)| sets[i + 1..].iter().all(|b| a.is_disjoint(b)))
}

/// Keep the first `max` members of an overlap.
fn cap(overlap: &LookaheadSet, max: usize) -> LookaheadSet {
    if overlap.len() <= max {
        return overlap.clone();
    }
    let mut capped = LookaheadSet::empty(overlap.depth());
    for sequence in overlap.sequences().take(max) {
        capped.insert(sequence.clone());
    }
    let room = max.saturating_sub(capped.len());
    for prefix in overlap.epsilon_prefixes().take(room) {
        capped.insert_epsilon(prefix.clone());
    }
    capped
}

use std::collections::{BTreeMap, BTreeSet};

use crate::base::TokenId;

/// A sequence of upcoming tokens.
pub type TokenSeq = Vec<TokenId>;

/// The token sequences that can be seen from a point in the grammar, looking
/// at most `depth` tokens ahead.
///
/// Two kinds of members are kept apart:
/// - *complete* sequences have exactly `depth` tokens, or fewer when they
///   end in `EOF` (nothing can follow end of input);
/// - *epsilon prefixes* have fewer than `depth` tokens and mark where the
///   lookahead runs into the end of a rule entered from a call site: the
///   rest depends on the caller. The empty prefix is the plain epsilon
///   marker ("may match nothing here").
///
/// Both sets are ordered, so equal sets compare, hash and print identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookaheadSet {
    depth: usize,
    sequences: BTreeSet<TokenSeq>,
    epsilon: BTreeSet<TokenSeq>,
}

impl LookaheadSet {
    /// The set with no members: nothing can be seen here.
    pub fn empty(depth: usize) -> Self {
        Self {
            depth,
            sequences: BTreeSet::new(),
            epsilon: BTreeSet::new(),
        }
    }

    /// The set holding only the epsilon marker.
    pub fn epsilon(depth: usize) -> Self {
        let mut set = Self::empty(depth);
        set.insert_epsilon(Vec::new());
        set
    }

    /// A set with one sequence, truncated to `depth`.
    pub fn singleton(depth: usize, tokens: impl IntoIterator<Item = TokenId>) -> Self {
        let mut set = Self::empty(depth);
        set.insert(tokens.into_iter().collect());
        set
    }

    /// A set from several sequences, each truncated to `depth`.
    pub fn from_sequences<I, S>(depth: usize, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = TokenId>,
    {
        let mut set = Self::empty(depth);
        for sequence in sequences {
            set.insert(sequence.into_iter().collect());
        }
        set
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Complete sequences in order.
    pub fn sequences(&self) -> impl Iterator<Item = &TokenSeq> + '_ {
        self.sequences.iter()
    }

    /// Epsilon prefixes in order.
    pub fn epsilon_prefixes(&self) -> impl Iterator<Item = &TokenSeq> + '_ {
        self.epsilon.iter()
    }

    /// Number of members, complete sequences and epsilon prefixes together.
    pub fn len(&self) -> usize {
        self.sequences.len() + self.epsilon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty() && self.epsilon.is_empty()
    }

    /// Whether the epsilon marker (or any epsilon prefix) is present.
    pub fn has_epsilon(&self) -> bool {
        !self.epsilon.is_empty()
    }

    /// Whether the bare epsilon marker is present: the point may match nothing.
    pub fn is_nullable(&self) -> bool {
        self.epsilon.iter().any(|prefix| prefix.is_empty())
    }

    pub fn contains(&self, sequence: &[TokenId]) -> bool {
        self.sequences.contains(sequence)
    }

    pub fn contains_epsilon_prefix(&self, prefix: &[TokenId]) -> bool {
        self.epsilon.contains(prefix)
    }

    /// Add a complete sequence. Tokens after `EOF` and beyond `depth` are dropped.
    pub fn insert(&mut self, mut sequence: TokenSeq) {
        if let Some(eof) = sequence.iter().position(|t| t.is_eof()) {
            sequence.truncate(eof + 1);
        }
        sequence.truncate(self.depth);
        self.sequences.insert(sequence);
    }

    /// Add an epsilon prefix. A prefix that already fills `depth` (or hits
    /// `EOF`) is complete and stored as a sequence instead.
    pub fn insert_epsilon(&mut self, prefix: TokenSeq) {
        if prefix.len() >= self.depth || prefix.iter().any(|t| t.is_eof()) {
            self.insert(prefix);
        } else {
            self.epsilon.insert(prefix);
        }
    }

    /// Set union at this set's depth. Members of a deeper `other` are truncated.
    ///
    /// `other` must be at least as deep as this set: a shorter complete
    /// sequence of a shallower set says nothing about the tokens after it.
    pub fn union(&self, other: &LookaheadSet) -> LookaheadSet {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    /// In-place union, with the same depth requirement as [`union`](Self::union).
    pub fn union_with(&mut self, other: &LookaheadSet) {
        debug_assert!(
            other.depth >= self.depth,
            "union of a depth {} set into a depth {} set",
            other.depth,
            self.depth
        );
        if other.depth == self.depth {
            self.sequences.extend(other.sequences.iter().cloned());
            self.epsilon.extend(other.epsilon.iter().cloned());
            return;
        }
        for sequence in &other.sequences {
            self.insert(sequence.clone());
        }
        for prefix in &other.epsilon {
            self.insert_epsilon(prefix.clone());
        }
    }

    /// Put `token` in front of every member. The result is one token deeper.
    ///
    /// Prepending `EOF` yields `{EOF}`: nothing is seen past end of input.
    pub fn prepend(&self, token: TokenId) -> LookaheadSet {
        let mut result = LookaheadSet::empty(self.depth + 1);
        if token.is_eof() {
            result.insert(vec![token]);
            return result;
        }
        for sequence in &self.sequences {
            result.insert(prefixed(token, sequence));
        }
        for prefix in &self.epsilon {
            result.insert_epsilon(prefixed(token, prefix));
        }
        result
    }

    /// Remaining depths at which epsilon prefixes need a continuation:
    /// `depth - prefix.len()` for every prefix.
    pub fn epsilon_depths(&self) -> BTreeSet<usize> {
        self.epsilon
            .iter()
            .map(|prefix| self.depth - prefix.len())
            .collect()
    }

    /// Continue every epsilon prefix `p` with the members of
    /// `tails[depth - p.len()]`. Prefixes without a tail are kept as they are.
    pub fn splice(&self, tails: &BTreeMap<usize, LookaheadSet>) -> LookaheadSet {
        let mut result = LookaheadSet {
            depth: self.depth,
            sequences: self.sequences.clone(),
            epsilon: BTreeSet::new(),
        };
        for prefix in &self.epsilon {
            let Some(tail) = tails.get(&(self.depth - prefix.len())) else {
                result.epsilon.insert(prefix.clone());
                continue;
            };
            for sequence in &tail.sequences {
                result.insert(concat(prefix, sequence));
            }
            for rest in &tail.epsilon {
                result.insert_epsilon(concat(prefix, rest));
            }
        }
        result
    }

    /// Members both sets can see.
    ///
    /// Complete sequences overlap when equal. An epsilon prefix overlaps any
    /// member it is a prefix of, since anything may follow it; the longer of
    /// the two is kept as evidence.
    pub fn intersection(&self, other: &LookaheadSet) -> LookaheadSet {
        let mut result = LookaheadSet::empty(self.depth.max(other.depth));
        for sequence in self.sequences.intersection(&other.sequences) {
            result.insert(sequence.clone());
        }
        for (open, other_side) in [(self, other), (other, self)] {
            for prefix in &open.epsilon {
                for sequence in &other_side.sequences {
                    if sequence.starts_with(prefix) {
                        result.insert(sequence.clone());
                    }
                }
                for other_prefix in &other_side.epsilon {
                    if other_prefix.starts_with(prefix) {
                        result.insert_epsilon(other_prefix.clone());
                    }
                }
            }
        }
        result
    }

    /// No member of one set can be seen by the other.
    pub fn is_disjoint(&self, other: &LookaheadSet) -> bool {
        if !self.sequences.is_disjoint(&other.sequences) {
            return false;
        }
        if self.epsilon.is_empty() && other.epsilon.is_empty() {
            return true;
        }
        self.intersection(other).is_empty()
    }

    /// The same lookahead seen only `depth` tokens ahead. Epsilon prefixes
    /// that fill the shorter depth become complete.
    pub fn truncate(&self, depth: usize) -> LookaheadSet {
        let mut result = LookaheadSet::empty(depth.min(self.depth));
        result.union_with(self);
        result
    }

    /// Longest complete sequence or epsilon prefix.
    pub fn longest(&self) -> usize {
        self.sequences
            .iter()
            .chain(self.epsilon.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }
}

fn prefixed(token: TokenId, rest: &[TokenId]) -> TokenSeq {
    let mut sequence = Vec::with_capacity(rest.len() + 1);
    sequence.push(token);
    sequence.extend_from_slice(rest);
    sequence
}

fn concat(prefix: &[TokenId], rest: &[TokenId]) -> TokenSeq {
    let mut sequence = Vec::with_capacity(prefix.len() + rest.len());
    sequence.extend_from_slice(prefix);
    sequence.extend_from_slice(rest);
    sequence
}

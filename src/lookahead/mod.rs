//! Lookahead sets: depth-bounded sets of token sequences.
//!
//! A [`LookaheadSet`] is the value computed by the analyzer for one graph
//! node at one depth. It is a plain value: immutable once computed, compared
//! structurally, and cached by the analyzer per node and depth.

mod display;
mod set;

pub use display::{DisplaySet, EPSILON, render_epsilon_prefix, render_sequence};
pub use set::{LookaheadSet, TokenSeq};

//! Foundation types for the llk toolchain.
//!
//! This module provides fundamental types used throughout the analyzer:
//! - [`TokenId`], [`RuleId`], [`BlockId`], [`ElementId`] - Typed arena handles
//! - [`Vocabulary`] - Token name interning with a reserved `EOF`
//! - Identifier checks for rule names
//!
//! This module has NO dependencies on other llk modules.

pub mod ident;
mod ids;
mod vocabulary;

pub use ident::is_identifier;
pub use ids::{BlockId, ElementId, RuleId, TokenId};
pub use vocabulary::{EOF_NAME, Vocabulary};

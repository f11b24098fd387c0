//! Typed arena handles.
//!
//! Every node of a grammar graph lives in an arena vector owned by the
//! [`Grammar`](crate::grammar::Grammar). Links between nodes (including the
//! cyclic ones: rule references, loop back-edges, terminator back-references)
//! are stored as these plain indices, never as ownership.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "export", derive(serde::Serialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Create an id from an arena index
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            /// Get the index into the arena
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Interned token type. `TokenId::EOF` is reserved for end of input.
    TokenId,
    "t"
);

arena_id!(
    /// Handle of a rule in the grammar.
    RuleId,
    "r"
);

arena_id!(
    /// Handle of an alternative block (rule block, subrule, optional or loop).
    BlockId,
    "b"
);

arena_id!(
    /// Handle of an alternative element, terminators included.
    ElementId,
    "e"
);

impl TokenId {
    /// End of input. Always the first token of every vocabulary.
    pub const EOF: TokenId = TokenId(0);

    pub fn is_eof(self) -> bool {
        self == Self::EOF
    }
}

//! Token vocabulary: interned token names.
//!
//! Token names are deduplicated so identical names share one [`TokenId`].
//! Ids are dense and assigned in first-use order, which keeps lookahead
//! sets (ordered by id) stable across runs.

use indexmap::IndexSet;
use smol_str::SmolStr;

use super::ident::is_identifier;
use super::ids::TokenId;

/// Name of the reserved end-of-input token.
pub const EOF_NAME: &str = "EOF";

/// Token interner for one grammar.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    names: IndexSet<SmolStr>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let mut names = IndexSet::new();
        names.insert(SmolStr::new_static(EOF_NAME));
        Self { names }
    }
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a token name, returning its id.
    ///
    /// If the name was already interned, returns the existing id.
    pub fn intern(&mut self, name: &str) -> TokenId {
        if let Some(index) = self.names.get_index_of(name) {
            return TokenId::new(index);
        }
        let (index, _) = self.names.insert_full(SmolStr::new(name));
        TokenId::new(index)
    }

    /// Get the id of a token if it exists, without creating it.
    pub fn get(&self, name: &str) -> Option<TokenId> {
        self.names.get_index_of(name).map(TokenId::new)
    }

    /// Name of a token. Unknown ids render as `<unknown>`.
    pub fn name(&self, id: TokenId) -> &str {
        self.names
            .get_index(id.index())
            .map(|s| s.as_str())
            .unwrap_or("<unknown>")
    }

    /// Render a token the way grammars write it: identifiers bare,
    /// everything else quoted.
    pub fn display(&self, id: TokenId) -> String {
        let name = self.name(id);
        if is_identifier(name) {
            name.to_string()
        } else {
            format!("\"{}\"", name)
        }
    }

    /// Number of tokens, `EOF` included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: `EOF` is interned on construction.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All token ids, `EOF` included.
    pub fn iter(&self) -> impl Iterator<Item = TokenId> + '_ {
        (0..self.names.len()).map(TokenId::new)
    }

    /// Token ids a wildcard can match: everything except `EOF`.
    pub fn matchable(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.iter().filter(|t| !t.is_eof())
    }
}

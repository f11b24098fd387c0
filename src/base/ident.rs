//! Identifier checks for rule and token names.

/// Check if a character can start an identifier.
///
/// Uses Unicode Standard Annex #31 rules, with `_` allowed as a start character.
#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_identifier_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Check whether `name` is a valid identifier (rule names must be).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_continue),
        _ => false,
    }
}

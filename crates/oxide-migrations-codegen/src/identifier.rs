//! Column identifiers for the nested table DSL.
//!
//! Inside `CreateTable` each column is bound to an identifier
//! (`PostId = table.Column(...)`) that constraint selectors refer to
//! (`x => x.PostId`).

use std::borrow::Cow;

/// Words the DSL lexer reads as keywords.
pub const RESERVED: [&str; 4] = ["new", "true", "false", "null"];

/// Derives the identifier for a column name.
///
/// Keeps alphanumeric characters and `_` and drops everything else. The
/// result is prefixed with `_` when it is empty or does not start with a
/// letter or `_`.
///
/// ```rust
/// use oxide_migrations_codegen::identifier::derive;
///
/// assert_eq!(derive("Post Id"), "PostId");
/// assert_eq!(derive("2nd"), "_2nd");
/// assert_eq!(derive("!!"), "_");
/// ```
#[must_use]
pub fn derive(column_name: &str) -> String {
    let ident: String = column_name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    match ident.chars().next() {
        Some(first) if first.is_alphabetic() || first == '_' => ident,
        _ => format!("_{ident}"),
    }
}

/// Returns true if `ident` is a reserved DSL word.
#[must_use]
pub fn is_reserved(ident: &str) -> bool {
    RESERVED.contains(&ident)
}

/// Renders an identifier for output, escaping reserved words as verbatim
/// identifiers (`@new`).
#[must_use]
pub fn render(ident: &str) -> Cow<'_, str> {
    if is_reserved(ident) {
        Cow::Owned(format!("@{ident}"))
    } else {
        Cow::Borrowed(ident)
    }
}

/// Returns true if `name` can be written as a plain identifier.
#[must_use]
pub fn is_valid(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !is_reserved(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_drops_punctuation_and_spaces() {
        assert_eq!(derive("Post Id"), "PostId");
        assert_eq!(derive("Blog-Id.2"), "BlogId2");
        assert_eq!(derive("already_fine"), "already_fine");
        assert_eq!(derive("Ünïcode"), "Ünïcode");
    }

    #[test]
    fn derive_prefixes_when_needed() {
        assert_eq!(derive("1st"), "_1st");
        assert_eq!(derive(""), "_");
        assert_eq!(derive("$$"), "_");
    }

    #[test]
    fn derive_keeps_reserved_words() {
        assert_eq!(derive("new"), "new");
        assert_eq!(render("new"), "@new");
        assert_eq!(render("Null"), "Null");
        assert_eq!(render("PostId"), "PostId");
    }

    #[test]
    fn builder_names() {
        assert!(is_valid("mb"));
        assert!(is_valid("_migration2"));
        assert!(!is_valid(""));
        assert!(!is_valid("2mb"));
        assert!(!is_valid("m b"));
        assert!(!is_valid("null"));
    }
}

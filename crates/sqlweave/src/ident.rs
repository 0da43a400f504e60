//! SQL identifier quoting.
//!
//! An identifier is written bare when it is already lower-case, free of the
//! restricted characters (space, `.`, `-`), does not start with a digit and is
//! not a reserved word of the dialect. Anything else is wrapped in the
//! dialect's quote character, with embedded quotes doubled. Aliases are always
//! wrapped.

use crate::error::{SqlError, SqlResult};

const RESTRICTED: &[char] = &[' ', '.', '-'];

/// Words Postgres refuses as bare identifiers.
pub const POSTGRES_RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both", "case",
    "cast", "check", "collate", "column", "constraint", "create", "current_catalog",
    "current_date", "current_role", "current_time", "current_timestamp", "current_user",
    "default", "deferrable", "desc", "distinct", "do", "else", "end", "except", "false", "fetch",
    "for", "foreign", "from", "grant", "group", "having", "in", "initially", "intersect", "into",
    "lateral", "leading", "limit", "localtime", "localtimestamp", "not", "null", "offset", "on",
    "only", "or", "order", "placing", "primary", "references", "returning", "select",
    "session_user", "some", "symmetric", "table", "then", "to", "trailing", "true", "union",
    "unique", "user", "using", "variadic", "when", "where", "window", "with",
];

/// Words MySQL refuses as bare identifiers (subset that collides with common column names).
pub const MYSQL_RESERVED: &[&str] = &[
    "add", "all", "alter", "and", "as", "asc", "between", "by", "case", "change", "check",
    "column", "condition", "create", "cross", "current_date", "current_time",
    "current_timestamp", "database", "default", "delete", "desc", "distinct", "div", "drop",
    "else", "exists", "false", "for", "force", "foreign", "from", "group", "having", "in",
    "index", "inner", "insert", "interval", "into", "is", "join", "key", "keys", "left", "like",
    "limit", "lock", "match", "mod", "natural", "not", "null", "on", "or", "order", "outer",
    "primary", "range", "read", "references", "regexp", "rename", "replace", "right", "rlike",
    "select", "set", "show", "table", "then", "to", "true", "union", "unique", "update", "usage",
    "use", "using", "values", "when", "where", "with", "write", "xor",
];

/// Reject identifiers that cannot be rendered at all.
pub fn validate(name: &str) -> SqlResult<()> {
    if name.is_empty() {
        return Err(SqlError::serialize("identifier", "identifier cannot be empty"));
    }
    if name.contains('\0') {
        return Err(SqlError::serialize(
            "identifier",
            format!("identifier {name:?} contains a NUL character"),
        ));
    }
    Ok(())
}

/// Whether `name` must be quote-wrapped.
pub fn needs_quoting(name: &str, reserved: &[&str]) -> bool {
    if name.chars().any(|c| c.is_uppercase() || RESTRICTED.contains(&c)) {
        return true;
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return true;
    }
    reserved.contains(&name)
}

/// Append `name` wrapped in `quote`, doubling embedded quote characters.
pub fn push_quoted(out: &mut String, name: &str, quote: char) {
    out.reserve(name.len() + 2);
    out.push(quote);
    for ch in name.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_case_names_stay_bare() {
        assert!(!needs_quoting("table1", POSTGRES_RESERVED));
        assert!(!needs_quoting("col_float", POSTGRES_RESERVED));
    }

    #[test]
    fn mixed_case_is_quoted() {
        assert!(needs_quoting("CamelCase", POSTGRES_RESERVED));
    }

    #[test]
    fn restricted_characters_are_quoted() {
        assert!(needs_quoting("my table", POSTGRES_RESERVED));
        assert!(needs_quoting("a.b", POSTGRES_RESERVED));
        assert!(needs_quoting("kebab-case", POSTGRES_RESERVED));
    }

    #[test]
    fn leading_digit_is_quoted() {
        assert!(needs_quoting("1col", POSTGRES_RESERVED));
    }

    #[test]
    fn reserved_words_depend_on_dialect() {
        assert!(needs_quoting("user", POSTGRES_RESERVED));
        assert!(!needs_quoting("user", MYSQL_RESERVED));
        assert!(needs_quoting("key", MYSQL_RESERVED));
    }

    #[test]
    fn quotes_are_doubled() {
        let mut out = String::new();
        push_quoted(&mut out, r#"has"quote"#, '"');
        assert_eq!(out, r#""has""quote""#);

        out.clear();
        push_quoted(&mut out, "a`b", '`');
        assert_eq!(out, "`a``b`");
    }

    #[test]
    fn validate_rejects_empty_and_nul() {
        assert!(validate("").is_err());
        assert!(validate("a\0b").is_err());
        assert!(validate("ok").is_ok());
    }
}

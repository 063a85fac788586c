//! SQL identifier utilities
//!
//! The history table name is the only identifier Schemaflow interpolates into
//! SQL text, so it is validated up front and quoted on use.

/// Quote a SQL identifier to prevent injection.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use sf_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("schemaflow_migrations"), r#""schemaflow_migrations""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name (e.g. `schema.table`).
///
/// # Examples
/// ```
/// use sf_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("history"), r#""history""#);
/// assert_eq!(quote_qualified("ops.history"), r#""ops"."history""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a schema-qualified name into `(Some(schema), table)`.
///
/// Unqualified names yield `(None, name)`.
pub fn split_schema(name: &str) -> (Option<&str>, &str) {
    match name.split_once('.') {
        Some((schema, table)) => (Some(schema), table),
        None => (None, name),
    }
}

/// Check that `name` is a plain table name, optionally qualified by one schema.
///
/// Each part must be non-empty, start with a letter or underscore, and contain
/// only ASCII alphanumerics and underscores.
pub fn is_valid_table_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 {
        return false;
    }
    parts.iter().all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_qualified_escapes_each_part() {
        assert_eq!(quote_qualified(r#"a"b.c"#), r#""a""b"."c""#);
    }

    #[test]
    fn test_split_schema() {
        assert_eq!(split_schema("history"), (None, "history"));
        assert_eq!(split_schema("ops.history"), (Some("ops"), "history"));
    }

    #[test]
    fn test_valid_table_names() {
        assert!(is_valid_table_name("schemaflow_migrations"));
        assert!(is_valid_table_name("_history2"));
        assert!(is_valid_table_name("ops.history"));
    }

    #[test]
    fn test_invalid_table_names() {
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2fast"));
        assert!(!is_valid_table_name("a.b.c"));
        assert!(!is_valid_table_name("ops."));
        assert!(!is_valid_table_name("history; DROP TABLE users"));
        assert!(!is_valid_table_name("my-table"));
    }
}

//! SQL text for table statements
//!
//! Table names are the only thing ever spliced into statement text, and only
//! after they have passed [`crate::sane_name`]. Keys, values and
//! patterns are always bound as parameters.

use crate::value::TypeTag;

/// Rows fetched per round trip by a cursor
pub const CURSOR_BATCH_SIZE: usize = 256;

/// Quote an identifier for SQLite
pub fn quote_ident(name: &str) -> String { format!(r#""{}""#, name.replace('"', r#""""#)) }

/// `CREATE TABLE IF NOT EXISTS` for a key/value table
pub fn create_table(name: &str, key_type: Option<TypeTag>, value_type: Option<TypeTag>) -> String {
    let key_column = match key_type {
        Some(t) => format!(r#""key" {} PRIMARY KEY"#, t.sqlite_type()),
        None => r#""key" PRIMARY KEY"#.to_string(),
    };
    let value_column = match value_type {
        Some(t) => format!(r#""value" {}"#, t.sqlite_type()),
        None => r#""value""#.to_string(),
    };
    format!("CREATE TABLE IF NOT EXISTS {}({}, {})", quote_ident(name), key_column, value_column)
}

/// Which rows a key cursor walks over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFilter {
    All,
    Like,
    Glob,
    Equal,
}

impl KeyFilter {
    fn condition(&self) -> Option<&'static str> {
        match self {
            KeyFilter::All => None,
            KeyFilter::Like => Some(r#""value" LIKE ?3 ESCAPE '\'"#),
            KeyFilter::Glob => Some(r#""value" GLOB ?3"#),
            KeyFilter::Equal => Some(r#""value" = ?3"#),
        }
    }

    /// Whether the statement takes the filter argument as `?3`
    pub fn has_argument(&self) -> bool { self.condition().is_some() }
}

/// One page of a key scan.
///
/// `?1` is the last rowid seen (or NULL to start) and `?2` the highest rowid
/// the scan may return. A replaced row gets a new rowid above every existing
/// one, so the bound keeps a scan from reaching rows rewritten behind it.
pub fn key_page(table: &str, filter: KeyFilter) -> String {
    let mut query =
        format!(r#"SELECT rowid, "key" FROM {} WHERE (?1 IS NULL OR rowid > ?1) AND rowid <= ?2"#, quote_ident(table));
    if let Some(condition) = filter.condition() {
        query.push_str(" AND ");
        query.push_str(condition);
    }
    query.push_str(&format!(" ORDER BY rowid LIMIT {}", CURSOR_BATCH_SIZE));
    query
}

/// One page of the table listing from the schema
pub fn table_name_page() -> String {
    format!(
        r#"SELECT rowid, "name" FROM "sqlite_master" WHERE (?1 IS NULL OR rowid > ?1) AND rowid <= ?2 AND "type" = 'table' ORDER BY rowid LIMIT {}"#,
        CURSOR_BATCH_SIZE
    )
}

/// The upper rowid bound for a scan of `table`, NULL when it is empty
pub fn max_rowid(table: &str) -> String { format!("SELECT max(rowid) FROM {}", quote_ident(table)) }

pub fn select_value(table: &str) -> String { format!(r#"SELECT "value" FROM {} WHERE "key" = ?1"#, quote_ident(table)) }

pub fn select_exists(table: &str) -> String { format!(r#"SELECT EXISTS(SELECT 1 FROM {} WHERE "key" = ?1)"#, quote_ident(table)) }

pub fn replace(table: &str) -> String { format!(r#"REPLACE INTO {}("key", "value") VALUES(?1, ?2)"#, quote_ident(table)) }

pub fn delete(table: &str) -> String { format!(r#"DELETE FROM {} WHERE "key" = ?1"#, quote_ident(table)) }

pub fn count(table: &str) -> String { format!("SELECT count(*) FROM {}", quote_ident(table)) }

/// Make every GLOB metacharacter in `text` match itself.
///
/// GLOB has no escape character; a bracket expression holding a single
/// character matches exactly that character. `]` is only special inside a
/// bracket expression, so it is left alone.
pub fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '*' | '?' | '[' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_untyped() {
        assert_eq!(create_table("another", None, None), r#"CREATE TABLE IF NOT EXISTS "another"("key" PRIMARY KEY, "value")"#);
    }

    #[test]
    fn test_create_table_typed() {
        assert_eq!(
            create_table("words", Some(TypeTag::Integer), Some(TypeTag::Text)),
            r#"CREATE TABLE IF NOT EXISTS "words"("key" INTEGER PRIMARY KEY, "value" TEXT)"#
        );
        assert_eq!(
            create_table("counter_index", None, Some(TypeTag::Integer)),
            r#"CREATE TABLE IF NOT EXISTS "counter_index"("key" PRIMARY KEY, "value" INTEGER)"#
        );
    }

    #[test]
    fn test_key_page() {
        assert_eq!(
            key_page("t", KeyFilter::All),
            r#"SELECT rowid, "key" FROM "t" WHERE (?1 IS NULL OR rowid > ?1) AND rowid <= ?2 ORDER BY rowid LIMIT 256"#
        );
        assert_eq!(
            key_page("t", KeyFilter::Like),
            r#"SELECT rowid, "key" FROM "t" WHERE (?1 IS NULL OR rowid > ?1) AND rowid <= ?2 AND "value" LIKE ?3 ESCAPE '\' ORDER BY rowid LIMIT 256"#
        );
        assert!(!KeyFilter::All.has_argument());
        assert!(KeyFilter::Equal.has_argument());
        assert_eq!(max_rowid("t"), r#"SELECT max(rowid) FROM "t""#);
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("plain"), r#""plain""#);
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn test_escape_glob() {
        assert_eq!(escape_glob("huh"), "huh");
        assert_eq!(escape_glob("a*b?c[d]"), "a[*]b[?]c[[]d]");
    }
}

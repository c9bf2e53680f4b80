//! A single key/value table

use std::fmt;
use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::codec::Codec;
use crate::connection::SqliteConfig;
use crate::cursor::{Key, KeyCursor};
use crate::error::{Error, Result};
use crate::sql_builder::{self, KeyFilter};
use crate::value::{SqlValue, TypeTag};

/// Check if a table name is valid.
///
/// Only ASCII letters and underscores are accepted, and the name must not be
/// empty. This is what makes it safe to splice table names into DDL.
pub fn sane_name(name: &str) -> bool { !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '_') }

/// Check that `key` can be found again with `=`.
///
/// NULL never compares equal to anything, and SQLite stores a NaN real as NULL.
fn checked_key(key: impl Into<Key>) -> Result<Key> {
    match key.into() {
        SqlValue::Null => Err(Error::InvalidKey(SqlValue::Null)),
        SqlValue::Real(r) if r.is_nan() => Err(Error::InvalidKey(SqlValue::Real(r))),
        key => Ok(key),
    }
}

/// Column type hints applied when a table is first created.
///
/// They have no effect on a table that already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableOptions {
    key_type: Option<TypeTag>,
    value_type: Option<TypeTag>,
}

impl TableOptions {
    pub fn new() -> Self { Self::default() }

    pub fn key_type(mut self, key_type: TypeTag) -> Self {
        self.key_type = Some(key_type);
        self
    }

    pub fn value_type(mut self, value_type: TypeTag) -> Self {
        self.value_type = Some(value_type);
        self
    }
}

/// An associative array backed by one SQLite table with `key` and `value` columns.
///
/// Every mutation runs in SQLite's autocommit mode and is durable as soon as
/// the call returns. Values pass through the table's codec on the way in and
/// out; the search methods match against the encoded value.
pub struct Table<'s, C> {
    conn: &'s Connection,
    config: &'s SqliteConfig,
    name: String,
    codec: Arc<C>,
}

impl<'s, C: Codec> Table<'s, C> {
    /// Validate `name` and make sure the table exists
    pub(crate) fn create(
        conn: &'s Connection,
        config: &'s SqliteConfig,
        name: &str,
        options: TableOptions,
        codec: Arc<C>,
    ) -> Result<Self> {
        let table = Self::existing(conn, config, name, codec)?;
        let query = sql_builder::create_table(name, options.key_type, options.value_type);
        debug!("Creating table: {}", query);
        conn.execute(&query, [])?;
        Ok(table)
    }

    /// A handle to a table already known to exist; no DDL is issued
    pub(crate) fn existing(conn: &'s Connection, config: &'s SqliteConfig, name: &str, codec: Arc<C>) -> Result<Self> {
        if !sane_name(name) {
            return Err(Error::InvalidName(name.to_owned()));
        }
        Ok(Self { conn, config, name: name.to_owned(), codec })
    }

    pub fn name(&self) -> &str { &self.name }

    /// The codec values are converted with
    pub fn codec(&self) -> &C { &self.codec }

    /// Get the decoded value stored under `key`
    pub fn get(&self, key: impl Into<Key>) -> Result<C::Value> {
        let stored = self.get_raw(key)?;
        Ok(self.codec.decode(stored)?)
    }

    /// Get the value stored under `key` as it is in the database, without decoding
    pub fn get_raw(&self, key: impl Into<Key>) -> Result<SqlValue> {
        let key = checked_key(key)?;
        match self.fetch(&key)? {
            Some(stored) => Ok(stored),
            None => Err(self.not_found(key)),
        }
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> Result<bool> {
        let key = checked_key(key)?;
        let mut stmt = self.conn.prepare_cached(&sql_builder::select_exists(&self.name))?;
        let exists: bool = stmt.query_row(params![key], |row| row.get(0))?;
        Ok(exists)
    }

    /// Store `value` under `key`, replacing whatever was there
    pub fn set(&self, key: impl Into<Key>, value: impl Into<C::Value>) -> Result<()> {
        let key = checked_key(key)?;
        let stored = self.codec.encode(&value.into())?;
        self.conn.prepare_cached(&sql_builder::replace(&self.name))?.execute(params![key, stored])?;
        Ok(())
    }

    /// Remove `key`, failing with [`Error::KeyNotFound`] if it is not present
    pub fn delete(&self, key: impl Into<Key>) -> Result<()> {
        let key = checked_key(key)?;
        let removed = self.conn.prepare_cached(&sql_builder::delete(&self.name))?.execute(params![key])?;
        if removed == 0 {
            return Err(self.not_found(key));
        }
        Ok(())
    }

    /// Number of rows, counted afresh on every call
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self.conn.prepare_cached(&sql_builder::count(&self.name))?.query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> { Ok(self.len()? == 0) }

    /// All keys, in rowid order
    pub fn keys(&self) -> KeyCursor<'s> { self.cursor(KeyFilter::All, None) }

    /// All keys, collected
    pub fn list(&self) -> Result<Vec<Key>> { self.keys().collect() }

    /// Keys whose stored value matches a SQL `LIKE` pattern.
    ///
    /// `%` and `_` are wildcards, `\` escapes them. Matching ignores ASCII case.
    pub fn like(&self, pattern: &str) -> KeyCursor<'s> { self.cursor(KeyFilter::Like, Some(pattern.into())) }

    /// Keys whose stored value matches a case-sensitive `GLOB` pattern (`*`, `?`, `[...]`)
    pub fn glob(&self, pattern: &str) -> KeyCursor<'s> { self.cursor(KeyFilter::Glob, Some(pattern.into())) }

    /// Keys whose stored value contains `substring`, case-sensitively.
    ///
    /// Glob metacharacters in `substring` match literally.
    pub fn search(&self, substring: &str) -> KeyCursor<'s> {
        let pattern = format!("*{}*", sql_builder::escape_glob(substring));
        self.glob(&pattern)
    }

    /// Keys whose stored value is exactly `value`
    pub fn equal(&self, value: impl Into<SqlValue>) -> KeyCursor<'s> { self.cursor(KeyFilter::Equal, Some(value.into())) }

    fn cursor(&self, filter: KeyFilter, argument: Option<SqlValue>) -> KeyCursor<'s> {
        debug_assert_eq!(filter.has_argument(), argument.is_some());
        KeyCursor::new(self.conn, sql_builder::key_page(&self.name, filter), sql_builder::max_rowid(&self.name), argument)
    }

    fn fetch(&self, key: &Key) -> Result<Option<SqlValue>> {
        let mut stmt = self.conn.prepare_cached(&sql_builder::select_value(&self.name))?;
        Ok(stmt.query_row(params![key], |row| row.get(0)).optional()?)
    }

    fn not_found(&self, key: Key) -> Error { Error::KeyNotFound { table: self.name.clone(), key } }
}

impl<C> fmt::Display for Table<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.name) }
}

impl<C> fmt::Debug for Table<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Store('{}')['{}']", self.config, self.name) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sane_name() {
        assert!(sane_name("words"));
        assert!(sane_name("counter_index"));
        assert!(sane_name("_Mixed_Case"));

        assert!(!sane_name(""));
        assert!(!sane_name("table1"));
        assert!(!sane_name("with space"));
        assert!(!sane_name("dotted.name"));
        assert!(!sane_name(r#"Robert"); DROP TABLE *"#));
        assert!(!sane_name("naïve"));
    }
}

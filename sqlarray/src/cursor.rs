//! Lazy single-pass key cursors

use std::collections::VecDeque;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::Result;
use crate::sql_builder::CURSOR_BATCH_SIZE;
use crate::value::SqlValue;

/// Keys are stored exactly as given, so any SQLite value can be one
pub type Key = SqlValue;

/// A forward-only sequence of keys from one query.
///
/// Rows are read a page at a time, keyed on `rowid`, so no statement stays
/// open between calls to `next` and memory use is bounded by the page size.
/// A cursor cannot be restarted; ask the table for a new one instead. Rows
/// written while a cursor is being consumed may or may not be seen by it,
/// but the scan stops at the highest rowid present when it began, so
/// rewriting every key as it is visited still ends.
///
/// The cursor borrows the store's connection and so cannot outlive it.
pub struct KeyCursor<'c> {
    conn: &'c Connection,
    query: String,
    bound_query: String,
    argument: Option<SqlValue>,
    last_rowid: Option<i64>,
    max_rowid: Option<i64>,
    buffer: VecDeque<Key>,
    exhausted: bool,
}

impl<'c> KeyCursor<'c> {
    /// `query` selects `(rowid, column)` pages as built by `sql_builder`, and
    /// `bound_query` the rowid it stops at; `argument` binds to `?3`
    pub(crate) fn new(conn: &'c Connection, query: String, bound_query: String, argument: Option<SqlValue>) -> Self {
        Self {
            conn,
            query,
            bound_query,
            argument,
            last_rowid: None,
            max_rowid: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    fn fetch_page(&mut self) -> Result<()> {
        let conn = self.conn;
        let max_rowid = match self.max_rowid {
            Some(max_rowid) => max_rowid,
            None => {
                let max_rowid: Option<i64> = conn.prepare_cached(&self.bound_query)?.query_row([], |row| row.get(0))?;
                let Some(max_rowid) = max_rowid else {
                    debug!("KeyCursor found nothing to scan");
                    self.exhausted = true;
                    return Ok(());
                };
                self.max_rowid = Some(max_rowid);
                max_rowid
            }
        };

        let mut stmt = conn.prepare_cached(&self.query)?;
        let last_rowid = self.last_rowid;
        let mut rows = match self.argument.as_ref() {
            Some(argument) => stmt.query(params![last_rowid, max_rowid, argument])?,
            None => stmt.query(params![last_rowid, max_rowid])?,
        };

        let mut fetched = 0;
        while let Some(row) = rows.next()? {
            self.last_rowid = Some(row.get(0)?);
            self.buffer.push_back(row.get(1)?);
            fetched += 1;
        }
        debug!("KeyCursor fetched {} rows after rowid {:?}", fetched, last_rowid);

        if fetched < CURSOR_BATCH_SIZE {
            self.exhausted = true;
        }
        Ok(())
    }
}

impl Iterator for KeyCursor<'_> {
    type Item = Result<Key>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(err) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(err));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

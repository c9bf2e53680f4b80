//! The top-level store: one SQLite database holding many tables

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tracing::info;

use crate::codec::{Codec, Identity};
use crate::connection::{OpenOptions, SqliteConfig};
use crate::cursor::KeyCursor;
use crate::error::{Error, Result};
use crate::sql_builder;
use crate::table::{Table, TableOptions};
use crate::value::SqlValue;

/// A SQLite database viewed as an array of tables.
///
/// The store owns the only connection. Tables and cursors borrow it, so they
/// have to be dropped before the store can be closed. Dropping the store
/// closes the connection; [`Store::close`] does the same but reports errors.
pub struct Store<C = Identity> {
    conn: Connection,
    config: SqliteConfig,
    codec: Arc<C>,
}

impl Store<Identity> {
    /// Open or create the store named `path`, storing values as given
    pub fn open(path: impl AsRef<Path>) -> Result<Self> { Self::open_with(path, OpenOptions::default()) }

    pub fn open_with(path: impl AsRef<Path>, options: OpenOptions) -> Result<Self> { Self::open_with_codec(path, options, Identity) }

    /// Open a private in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> { Self::in_memory_with_codec(Identity) }
}

impl<C: Codec> Store<C> {
    /// Open a store whose tables convert values with `codec` by default.
    ///
    /// If no file exists at `path`, the store lives in `path` with
    /// [`FILE_SUFFIX`](crate::FILE_SUFFIX) appended instead, which is created
    /// unless `options` forbids it.
    pub fn open_with_codec(path: impl AsRef<Path>, options: OpenOptions, codec: C) -> Result<Self> {
        let config = SqliteConfig::file(path, &options)?;
        let conn = config.connect(&options)?;
        info!("Opened store {}", config);
        Ok(Self { conn, config, codec: Arc::new(codec) })
    }

    pub fn in_memory_with_codec(codec: C) -> Result<Self> {
        let config = SqliteConfig::Memory;
        let conn = config.connect(&OpenOptions::default())?;
        Ok(Self { conn, config, codec: Arc::new(codec) })
    }

    /// The database file, or `None` for an in-memory store
    pub fn path(&self) -> Option<&Path> { self.config.path() }

    /// The default codec for this store's tables
    pub fn codec(&self) -> &C { &self.codec }

    /// Get the table called `name`, creating it if needed
    pub fn table(&self, name: &str) -> Result<Table<'_, C>> { self.create_table(name, TableOptions::default()) }

    /// Get the table called `name`, creating it with the given column types if needed
    pub fn create_table(&self, name: &str, options: TableOptions) -> Result<Table<'_, C>> {
        Table::create(&self.conn, &self.config, name, options, self.codec.clone())
    }

    /// Like [`Store::create_table`], but the table converts values with its own codec
    pub fn create_table_with_codec<D: Codec>(&self, name: &str, options: TableOptions, codec: D) -> Result<Table<'_, D>> {
        Table::create(&self.conn, &self.config, name, options, Arc::new(codec))
    }

    /// All tables in the database, in the order SQLite lists them
    pub fn tables(&self) -> Tables<'_, C> {
        Tables { store: self, names: self.table_name_cursor() }
    }

    pub fn table_names(&self) -> Result<Vec<String>> {
        self.table_name_cursor()
            .map(|name| name.map(|name| name.to_string()))
            .collect()
    }

    fn table_name_cursor(&self) -> KeyCursor<'_> {
        KeyCursor::new(&self.conn, sql_builder::table_name_page(), sql_builder::max_rowid("sqlite_master"), None)
    }

    /// Rebuild the database file to reclaim space left by deletions.
    ///
    /// This blocks until done and needs exclusive access to the database.
    pub fn compact(&self) -> Result<()> {
        info!("Compacting store {}", self.config);
        self.conn.execute_batch("VACUUM")?;
        Ok(())
    }

    /// Close the connection, reporting any error from SQLite
    pub fn close(self) -> Result<()> {
        info!("Closing store {}", self.config);
        self.conn.close().map_err(|(_conn, err)| Error::Sqlite(err))
    }
}

impl<C> fmt::Display for Store<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Store('{}')", self.config) }
}

impl<C> fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Store('{}')", self.config) }
}

/// Iterator over a store's tables, from [`Store::tables`]
pub struct Tables<'s, C> {
    store: &'s Store<C>,
    names: KeyCursor<'s>,
}

impl<'s, C: Codec> Iterator for Tables<'s, C> {
    type Item = Result<Table<'s, C>>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = match self.names.next()? {
            Ok(SqlValue::Text(name)) => name,
            Ok(other) => return Some(Err(Error::InvalidName(other.to_string()))),
            Err(err) => return Some(Err(err)),
        };
        let store = self.store;
        Some(Table::existing(&store.conn, &store.config, &name, store.codec.clone()))
    }
}

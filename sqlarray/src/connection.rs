//! Opening the SQLite connection behind a store

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{Error, Result};

/// Appended to a store name that does not name an existing file
pub const FILE_SUFFIX: &str = "_sa.sqlite";

/// Where a store's database lives
#[derive(Clone, Debug)]
pub enum SqliteConfig {
    /// File-based database
    File(PathBuf),
    /// In-memory database (for testing)
    Memory,
}

/// Options for opening a file-based store
#[derive(Clone, Debug)]
pub struct OpenOptions {
    create: bool,
    read_only: bool,
}

impl Default for OpenOptions {
    fn default() -> Self { Self { create: true, read_only: false } }
}

impl OpenOptions {
    pub fn new() -> Self { Self::default() }

    /// Create the database file if it does not exist (default `true`)
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Open the database read-only (default `false`). Implies `create(false)`.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        if read_only {
            self.create = false;
        }
        self
    }

    pub fn is_create(&self) -> bool { self.create }

    pub fn is_read_only(&self) -> bool { self.read_only }

    fn flags(&self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            base | OpenFlags::SQLITE_OPEN_READ_ONLY
        } else if self.create {
            base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        } else {
            base | OpenFlags::SQLITE_OPEN_READ_WRITE
        }
    }
}

/// Resolve a store name to the file it is kept in.
///
/// An existing file is used as-is. Otherwise the name gets [`FILE_SUFFIX`]
/// appended, so `resolve_path("db")` is `db` if that file exists and
/// `db_sa.sqlite` if it does not. Re-opening by the same name therefore finds
/// the file created the first time.
pub fn resolve_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_file() {
        return path.to_path_buf();
    }
    let mut derived = OsString::from(path.as_os_str());
    derived.push(FILE_SUFFIX);
    PathBuf::from(derived)
}

impl fmt::Display for SqliteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqliteConfig::File(path) => write!(f, "{}", path.display()),
            SqliteConfig::Memory => f.write_str(":memory:"),
        }
    }
}

impl SqliteConfig {
    /// Resolve a store name against the filesystem, honouring `create`
    pub fn file(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
        let resolved = resolve_path(path);
        if !options.is_create() && !resolved.is_file() {
            return Err(Error::FileNotFound(resolved));
        }
        Ok(SqliteConfig::File(resolved))
    }

    /// The database file, if this is not an in-memory store
    pub fn path(&self) -> Option<&Path> {
        match self {
            SqliteConfig::File(path) => Some(path),
            SqliteConfig::Memory => None,
        }
    }

    pub(crate) fn connect(&self, options: &OpenOptions) -> Result<Connection> {
        let conn = match self {
            SqliteConfig::File(path) => {
                debug!("Opening SQLite database {} ({:?})", path.display(), options);
                Connection::open_with_flags(path, options.flags())?
            }
            SqliteConfig::Memory => Connection::open_in_memory()?,
        };
        Ok(conn)
    }
}

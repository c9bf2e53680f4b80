//! A persistent array-of-tables backed by SQLite
//!
//! A [`Store`] is one SQLite database file. Each named [`Table`] in it is an
//! associative array from keys to values, kept in a SQLite table with a `key`
//! primary key column and a `value` column.
//!
//! - Table names are restricted to ASCII letters and underscores
//! - Values pass through a pluggable [`Codec`] (identity by default, or JSON,
//!   bincode, or a pair of functions)
//! - Keys, search results and the table listing are lazy [`KeyCursor`]s
//! - Every write is committed immediately
//!
//! # Example
//!
//! ```rust,no_run
//! use sqlarray::Store;
//!
//! # fn main() -> sqlarray::Result<()> {
//! // Uses "my_filename" if it exists, otherwise "my_filename_sa.sqlite"
//! let store = Store::open("my_filename")?;
//! let table = store.table("mytable")?;
//! table.set("hello", "world")?;
//! for key in table.search("or") {
//!     println!("{}", table.get(key?)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
mod connection;
mod cursor;
mod error;
mod sql_builder;
mod store;
mod table;
mod value;

pub use codec::{BincodeCodec, Codec, FnCodec, Identity, JsonCodec};
pub use connection::{resolve_path, OpenOptions, SqliteConfig, FILE_SUFFIX};
pub use cursor::{Key, KeyCursor};
pub use sql_builder::CURSOR_BATCH_SIZE;
pub use error::{CodecError, Error, Result};
pub use store::{Store, Tables};
pub use table::{sane_name, Table, TableOptions};
pub use value::{SqlValue, TypeTag};

use std::path::PathBuf;
use std::str::FromStr;

#[allow(unused)]
pub use sqlarray::{Error, Key, SqlValue, Store, TableOptions, TypeTag};
use tempfile::TempDir;
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

/// A scratch directory and a store name inside it
#[allow(unused)]
pub struct Scratch {
    pub dir: TempDir,
}

#[allow(unused)]
impl Scratch {
    pub fn new() -> Result<Self, anyhow::Error> { Ok(Self { dir: tempfile::tempdir()? }) }

    /// The logical store name, before suffix resolution
    pub fn name(&self, name: &str) -> PathBuf { self.dir.path().join(name) }

    pub fn open(&self, name: &str) -> Result<Store, anyhow::Error> { Ok(Store::open(self.name(name))?) }
}

/// Collect a cursor, failing on the first error
#[allow(unused)]
pub fn keys(cursor: impl Iterator<Item = Result<Key, Error>>) -> Result<Vec<Key>, anyhow::Error> {
    Ok(cursor.collect::<Result<Vec<_>, _>>()?)
}

/// Collect text keys, sorted
#[allow(unused)]
pub fn sorted_text(cursor: impl Iterator<Item = Result<Key, Error>>) -> Result<Vec<String>, anyhow::Error> {
    let mut names: Vec<String> = keys(cursor)?.into_iter().map(|k| k.to_string()).collect();
    names.sort();
    Ok(names)
}

//! Print every entry of one or more sqlarray stores.
//!
//! Each store is opened read-only and never created. One line is printed per
//! entry: `<file>['<table>']['<key>']: '<value>'`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use sqlarray::{Error, OpenOptions, Store};
use tracing::{warn, Level};

#[derive(Parser, Debug)]
#[command(name = "sqlarray-dump", version, about = "Print the contents of sqlarray stores")]
struct Args {
    /// Store files (or store names without the `_sa.sqlite` suffix)
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    // LOG_LEVEL picks the tracing level, warnings only by default
    let level = std::env::var("LOG_LEVEL").ok().and_then(|l| Level::from_str(&l).ok()).unwrap_or(Level::WARN);
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();

    let args = Args::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut status = ExitCode::SUCCESS;
    for file in &args.files {
        if let Err(err) = dump(file, &mut out) {
            eprintln!("sqlarray-dump: {:#}", err);
            status = ExitCode::FAILURE;
        }
    }
    status
}

/// Write every entry of the store at `file` to `out`
fn dump(file: &Path, out: &mut impl Write) -> Result<()> {
    let store = Store::open_with(file, OpenOptions::new().read_only(true)).with_context(|| format!("opening {}", file.display()))?;

    for table in store.tables() {
        let table = match table {
            Ok(table) => table,
            Err(Error::InvalidName(name)) => {
                warn!("{}: skipping table {:?} with an unsupported name", file.display(), name);
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        for key in table.keys() {
            let key = key?;
            let value = table.get_raw(key.clone())?;
            writeln!(out, "{}['{}']['{}']: '{}'", file.display(), table, key, value)?;
        }
    }

    store.close()?;
    Ok(())
}

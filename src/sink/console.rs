//! A store that only prints what it would have written.

use chrono::Utc;
use sink::{format_batch, Batch, Storage, StorageError};
use std::io::{self, Write};

/// Prints each batch as line protocol. Every dataset already "exists".
pub struct Console<W: Write> {
    out: W,
}

impl Console<io::Stdout> {
    /// Console printing to standard out.
    pub fn new() -> Console<io::Stdout> {
        Console { out: io::stdout() }
    }
}

impl<W: Write> Console<W> {
    /// Console printing to `out`.
    pub fn with_writer(out: W) -> Console<W> {
        Console { out: out }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Storage for Console<W> {
    fn ensure_database_exists(&mut self, _: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn write_batch(&mut self, batch: &Batch) -> Result<(), StorageError> {
        writeln!(
            self.out,
            "# {} db={} consistency={} records={}",
            Utc::now().to_rfc3339(),
            batch.database,
            batch.consistency.as_str(),
            batch.len()
        )?;
        self.out.write_all(format_batch(batch).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

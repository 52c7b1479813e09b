//! Storage collaborators: where batches of records end up.

use hyper;
use metric::Record;
use std::error;
use std::fmt;
use std::io;
use url;

mod console;
mod influxdb;

pub use self::console::Console;
pub use self::influxdb::{fmt_line, format_batch, InfluxDB, InfluxDBConfig};

/// Write acknowledgement level requested from the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consistency {
    /// Any node, hinted handoff included
    Any,
    /// A single replica
    One,
    /// A majority of replicas
    Quorum,
    /// Every replica the client knows about
    All,
}

impl Consistency {
    /// Wire name of the level.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Consistency::Any => "any",
            Consistency::One => "one",
            Consistency::Quorum => "quorum",
            Consistency::All => "all",
        }
    }
}

/// Records destined for one dataset, written all at once.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    /// Target dataset
    pub database: String,
    /// Requested acknowledgement level
    pub consistency: Consistency,
    /// The points, in order
    pub records: Vec<Record>,
}

impl Batch {
    /// Make an empty batch for `database`.
    pub fn new<S>(database: S, consistency: Consistency) -> Batch
    where
        S: Into<String>,
    {
        Batch {
            database: database.into(),
            consistency: consistency,
            records: Vec::new(),
        }
    }

    /// Append a record.
    pub fn point(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Failures talking to a store.
#[derive(Debug)]
pub enum StorageError {
    /// Transport level failure: connection refused, reset, DNS.
    Http(hyper::Error),
    /// The endpoint could not be turned into a URL.
    Url(url::ParseError),
    /// Reading or writing the payload failed.
    Io(io::Error),
    /// The store answered, but not with success.
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, usually the store's error message
        body: String,
    },
    /// The store answered with something we could not make sense of.
    Protocol(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StorageError::Http(ref e) => write!(f, "http error: {}", e),
            StorageError::Url(ref e) => write!(f, "bad url: {}", e),
            StorageError::Io(ref e) => write!(f, "io error: {}", e),
            StorageError::Rejected { status, ref body } => {
                write!(f, "rejected with status {}: {}", status, body.trim())
            }
            StorageError::Protocol(ref msg) => write!(f, "protocol error: {}", msg),
        }
    }
}

impl error::Error for StorageError {}

impl From<hyper::Error> for StorageError {
    fn from(e: hyper::Error) -> StorageError {
        StorageError::Http(e)
    }
}

impl From<url::ParseError> for StorageError {
    fn from(e: url::ParseError) -> StorageError {
        StorageError::Url(e)
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> StorageError {
        StorageError::Io(e)
    }
}

/// A time-series store.
///
/// Implementations block until the store has answered. Timeouts and
/// backoff, if any, are theirs to impose.
pub trait Storage {
    /// Create the dataset `name` unless it already exists.
    fn ensure_database_exists(&mut self, name: &str) -> Result<(), StorageError>;
    /// Write every record of `batch` in a single request.
    fn write_batch(&mut self, batch: &Batch) -> Result<(), StorageError>;
}

impl<'a, S: Storage + ?Sized> Storage for &'a mut S {
    fn ensure_database_exists(&mut self, name: &str) -> Result<(), StorageError> {
        (**self).ensure_database_exists(name)
    }

    fn write_batch(&mut self, batch: &Batch) -> Result<(), StorageError> {
        (**self).write_batch(batch)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn ensure_database_exists(&mut self, name: &str) -> Result<(), StorageError> {
        (**self).ensure_database_exists(name)
    }

    fn write_batch(&mut self, batch: &Batch) -> Result<(), StorageError> {
        (**self).write_batch(batch)
    }
}

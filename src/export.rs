//! Drives one GC model into a store.
//!
//! The pipeline resolves the environment tags once, at construction, and
//! makes sure both datasets exist. Each `export` then builds one point per
//! event into the `gcTimeSeries` batch and one summary point into the
//! `gcSummary` batch, and writes each batch in a single request at
//! consistency `all`. A failed write aborts the export; nothing is retried.

use constants::{GC_SUMMARY, GC_TIME_SERIES};
use metric::TagMap;
use model::GcModel;
use record::{event_record, summary_record};
use sink::{fmt_line, Batch, Consistency, Storage, StorageError};
use std::error;
use std::fmt;
use tags::{self, TagConfig};

/// Errors surfacing from an export.
#[derive(Debug)]
pub enum ExportError {
    /// The store could not be prepared: unreachable, unauthenticated or
    /// unable to create a dataset.
    Configuration(StorageError),
    /// A batch write was rejected or the connection was lost.
    Write {
        /// Dataset the batch was destined for
        database: String,
        /// What the store said
        cause: StorageError,
    },
    /// The GC model itself could not be read.
    Data(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ExportError::Configuration(ref e) => write!(f, "storage not ready: {}", e),
            ExportError::Write {
                ref database,
                ref cause,
            } => write!(f, "write to {} failed: {}", database, cause),
            ExportError::Data(ref msg) => write!(f, "bad data: {}", msg),
        }
    }
}

impl error::Error for ExportError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ExportError::Configuration(ref e) => Some(e),
            ExportError::Write { ref cause, .. } => Some(cause),
            ExportError::Data(_) => None,
        }
    }
}

/// What an export wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Points written to `gcTimeSeries`
    pub events: usize,
    /// Points written to `gcSummary`
    pub summaries: usize,
}

/// Export pipeline bound to a store and a resolved set of tags.
pub struct ExportPipeline<S: Storage> {
    storage: S,
    tags: TagMap,
}

impl<S: Storage> ExportPipeline<S> {
    /// Prepare `storage` for exports and resolve the environment tags.
    ///
    /// Both datasets are created if absent. Failing to do so is an
    /// `ExportError::Configuration`.
    pub fn new(mut storage: S, tag_config: &TagConfig) -> Result<ExportPipeline<S>, ExportError> {
        for db in &[GC_TIME_SERIES, GC_SUMMARY] {
            storage
                .ensure_database_exists(db)
                .map_err(ExportError::Configuration)?;
        }
        let tags = tags::resolve(tag_config);
        debug!("resolved tags: {:?}", tags);
        Ok(ExportPipeline {
            storage: storage,
            tags: tags,
        })
    }

    /// The tags every record of this pipeline carries.
    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// Build both batches for `model` without writing them.
    ///
    /// The first batch holds one point per event, the second the summary.
    pub fn batches(&self, model: &GcModel) -> (Batch, Batch) {
        let mut series = Batch::new(GC_TIME_SERIES, Consistency::All);
        for event in &model.events {
            let record = event_record(event, &self.tags);
            if log_enabled!(::log::Level::Debug) {
                let mut line = String::new();
                fmt_line(&record, &mut line);
                debug!("{}", line);
            }
            series.point(record);
        }

        let mut summary = Batch::new(GC_SUMMARY, Consistency::All);
        summary.point(summary_record(model, &self.tags));
        (series, summary)
    }

    /// Export `model`: the per-event batch first, then the summary.
    ///
    /// If the per-event write fails the summary is not attempted.
    pub fn export(&mut self, model: &GcModel) -> Result<ExportReport, ExportError> {
        let (series, summary) = self.batches(model);
        info!(
            "exporting {} events to {} and 1 summary to {}",
            series.len(),
            series.database,
            summary.database
        );
        let mut report = ExportReport::default();
        for batch in &[series, summary] {
            if let Err(e) = self.storage.write_batch(batch) {
                error!("write of {} records to {} failed: {}", batch.len(), batch.database, e);
                return Err(ExportError::Write {
                    database: batch.database.clone(),
                    cause: e,
                });
            }
            if batch.database == GC_TIME_SERIES {
                report.events = batch.len();
            } else {
                report.summaries = batch.len();
            }
        }
        Ok(report)
    }

    /// Give back the store.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

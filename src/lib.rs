//! gcflux turns a parsed garbage-collection event log into time-series data.
//! Every GC event becomes one point in the `gcTimeSeries` dataset and the run
//! as a whole becomes one aggregate point in the `gcSummary` dataset. All
//! points carry the same environment tags -- test type, build, application
//! and server -- so that runs can be compared side by side in the store.
//!
//! The moving parts, leaf first:
//!
//!  * `tags` resolves the environment tags, applying defaults.
//!  * `record` builds per-event and summary points.
//!  * `significance` judges how tightly pauses cluster around their mean.
//!  * `export` drives a whole run into a `sink::Storage`.
//!
//! Parsing raw GC log text is not done here. The shipped binary reads an
//! already structured model, see `model::load`.
#![allow(unknown_lints)]
#![deny(trivial_numeric_casts, missing_docs, unstable_features, unused_import_braces)]
extern crate chrono;
extern crate clap;
extern crate hyper;
extern crate serde;
extern crate serde_json;
extern crate toml;
extern crate trueno;
extern crate url;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
extern crate rand;
#[cfg(test)]
extern crate tempdir;
#[cfg(test)]
extern crate tiny_http;

pub mod config;
pub mod constants;
pub mod export;
pub mod format;
pub mod metric;
pub mod model;
pub mod record;
pub mod significance;
pub mod sink;
pub mod tags;
pub mod time;

//! Library level constants

/// Dataset receiving one point per GC event.
pub const GC_TIME_SERIES: &str = "gcTimeSeries";
/// Dataset receiving one aggregate point per run.
pub const GC_SUMMARY: &str = "gcSummary";

/// Measurement of per-event points.
pub const EVENT_MEASUREMENT: &str = "gc";
/// Measurement of summary points.
pub const SUMMARY_MEASUREMENT: &str = "gcSum";

/// Tag key for the test type, e.g. WEB or LOAD.
pub const TEST_TAG: &str = "test";
/// Tag key for the build identifier.
pub const BUILD_TAG: &str = "build";
/// Tag key for the application name.
pub const APP_TAG: &str = "app";
/// Tag key for the server / stage name, e.g. STG, PRF or DEV.
pub const SERVER_TAG: &str = "server";

/// Fallback for an unset test type.
pub const TEST_DEFAULT: &str = "WEB";
/// Fallback for an unset build. This is the literal string "build".
pub const BUILD_DEFAULT: &str = "build";
/// Fallback for an unset application name.
pub const APP_DEFAULT: &str = "app";
/// Fallback for an unset server name.
pub const SERVER_DEFAULT: &str = "server";

/// Summary line tag which carries the log identifier rather than a value.
pub const GC_LOG_FILE: &str = "gcLogFile";

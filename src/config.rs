//! Provides the CLI option parser
//!
//! Used to parse the argv/config file into a struct that the exporter can
//! consume and use as configuration data. The configuration file is toml:
//!
//! ```toml
//! [influxdb]
//! host = "influx.example"
//! port = 8086
//! user = "gc"
//! password = "secret"
//!
//! [tags]
//! test = "LOAD"
//! build = { environment = true, value = "BUILD_NUMBER" }
//! app = "checkout"
//! server = "PRF"
//! ```
//!
//! Tags given on the command line win over tags from the file.

use clap::{App, Arg, ArgMatches};
use sink::InfluxDBConfig;
use std::env;
use std::error;
use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use tags::TagConfig;
use toml;

const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

fn default_version() -> String {
    VERSION.unwrap_or("unknown").to_string()
}

/// Configuration problems. All of them are fatal at startup.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(PathBuf, io::Error),
    /// The configuration file is not valid toml.
    Toml(toml::de::Error),
    /// A key holds a value of the wrong type or range.
    Invalid(String),
    /// A tag reads its value from an unset environment variable.
    MissingEnv(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Io(ref path, ref e) => {
                write!(f, "could not read {}: {}", path.display(), e)
            }
            ConfigError::Toml(ref e) => write!(f, "could not parse config file: {}", e),
            ConfigError::Invalid(ref msg) => write!(f, "invalid configuration: {}", msg),
            ConfigError::MissingEnv(ref var) => {
                write!(f, "environment variable {} is not set", var)
            }
        }
    }
}

impl error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> ConfigError {
        ConfigError::Toml(e)
    }
}

/// Configuration struct for the gcflux executable
///
/// This struct is what we construct from parsing the command line and the
/// optional configuration file. Please see documentation on `parse_args` in
/// this module for more details.
#[derive(Debug, PartialEq)]
pub struct Args {
    /// The JSON GC model to export.
    pub input: PathBuf,
    /// Print line protocol to stdout instead of writing to InfluxDB.
    pub dry_run: bool,
    /// Also print the summary as one line per metric.
    pub summary_lines: bool,
    /// The verbosity setting. The higher the value the more chatty gcflux
    /// gets.
    pub verbose: u64,
    /// gcflux version string. This is set automatically.
    pub version: String,
    /// See `sink::InfluxDB` for more.
    pub influxdb: InfluxDBConfig,
    /// See `tags::resolve` for more.
    pub tags: TagConfig,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            input: PathBuf::new(),
            dry_run: false,
            summary_lines: false,
            verbose: 0,
            version: default_version(),
            influxdb: InfluxDBConfig::default(),
            tags: TagConfig::default(),
        }
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("gcflux")
        .version(VERSION.unwrap_or("unknown"))
        .about("export GC event logs into InfluxDB")
        .arg(
            Arg::with_name("config-file")
                .long("config")
                .short("C")
                .value_name("config")
                .help("The config file to feed in.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("input")
                .long("input")
                .short("i")
                .value_name("model.json")
                .required(true)
                .help("The parsed GC model to export.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("test")
                .long("test")
                .value_name("test")
                .help("Test type tag, WEB by default.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("build")
                .long("build")
                .value_name("build")
                .help("Build tag.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("app")
                .long("app")
                .value_name("app")
                .help("Application tag.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("server")
                .long("server")
                .value_name("server")
                .help("Server tag, e.g. STG, PRF or DEV.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("dry-run")
                .long("dry-run")
                .help("Print line protocol instead of writing to InfluxDB."),
        )
        .arg(
            Arg::with_name("summary-lines")
                .long("summary-lines")
                .help("Print the summary one metric per line."),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Turn on verbose output."),
        )
}

/// Parse the gcflux configuration arguments
///
/// This function will read the environment arguments and construct an
/// `Args`. See `gcflux --help` for more information.
pub fn parse_args() -> Result<Args, ConfigError> {
    parse_args_from(env::args_os())
}

/// Like `parse_args`, over an explicit argument list. The first item is the
/// program name.
pub fn parse_args_from<I, T>(argv: I) -> Result<Args, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = app().get_matches_from(argv);
    let verb = matches.occurrences_of("verbose");

    let mut args = match matches.value_of("config-file") {
        Some(filename) => {
            let path = PathBuf::from(filename);
            let mut buffer = String::new();
            File::open(&path)
                .and_then(|mut fp| fp.read_to_string(&mut buffer))
                .map_err(|e| ConfigError::Io(path.clone(), e))?;
            parse_config_file(&buffer, verb)?
        }
        None => {
            let mut args = Args::default();
            args.verbose = verb;
            args
        }
    };

    args.tags.overlay(&cli_tags(&matches));
    args.dry_run = matches.is_present("dry-run");
    args.summary_lines = matches.is_present("summary-lines");
    if let Some(input) = matches.value_of("input") {
        args.input = PathBuf::from(input);
    }
    Ok(args)
}

fn cli_tags(matches: &ArgMatches) -> TagConfig {
    TagConfig {
        test: matches.value_of("test").map(|s| s.to_string()),
        build: matches.value_of("build").map(|s| s.to_string()),
        app: matches.value_of("app").map(|s| s.to_string()),
        server: matches.value_of("server").map(|s| s.to_string()),
    }
}

fn get_str(tbl: &toml::Value, key: &str, path: &str) -> Result<Option<String>, ConfigError> {
    match tbl.get(key) {
        None => Ok(None),
        Some(v) => v.as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ConfigError::Invalid(format!("{}.{} must be a string", path, key))),
    }
}

/// Read a tag value: either a plain string or a table reading it from the
/// environment.
fn tag_value(key: &str, v: &toml::Value) -> Result<String, ConfigError> {
    if let Some(s) = v.as_str() {
        return Ok(s.to_string());
    }
    let tbl = v.as_table().ok_or_else(|| {
        ConfigError::Invalid(format!("tags.{} must be a string or a table", key))
    })?;
    let from_env = tbl.get("environment")
        .map_or(false, |ev| ev.as_bool().unwrap_or(false));
    if !from_env {
        return Err(ConfigError::Invalid(format!(
            "tags.{} table must have environment / value keys",
            key
        )));
    }
    let env_key = tbl.get("value")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ConfigError::Invalid(format!("tags.{}.value must be a string", key)))?;
    env::var(env_key).map_err(|_| ConfigError::MissingEnv(env_key.to_string()))
}

/// Parse the gcflux configuration file.
///
/// Unknown keys are ignored. Missing keys keep their defaults.
pub fn parse_config_file(buffer: &str, verbosity: u64) -> Result<Args, ConfigError> {
    let mut args = Args::default();
    let value: toml::Value = toml::from_str(buffer)?;

    args.verbose = verbosity;

    if let Some(influx) = value.get("influxdb") {
        let res = &mut args.influxdb;
        if let Some(host) = get_str(influx, "host", "influxdb")? {
            res.host = host;
        }
        if let Some(p) = influx.get("port") {
            let port = p.as_integer()
                .ok_or_else(|| ConfigError::Invalid("influxdb.port must be an integer".into()))?;
            if port < 1 || port > i64::from(u16::max_value()) {
                return Err(ConfigError::Invalid(format!(
                    "influxdb.port {} out of range",
                    port
                )));
            }
            res.port = port as u16;
        }
        res.user = get_str(influx, "user", "influxdb")?;
        res.password = get_str(influx, "password", "influxdb")?;
    }

    if let Some(tbl) = value.get("tags") {
        let ttbl = tbl.as_table()
            .ok_or_else(|| ConfigError::Invalid("tags must be a table".into()))?;
        for (k, v) in ttbl.iter() {
            let val = Some(tag_value(k, v)?);
            match k.as_str() {
                "test" => args.tags.test = val,
                "build" => args.tags.build = val,
                "app" => args.tags.app = val,
                "server" => args.tags.server = val,
                _ => warn!("ignoring unknown tag {}", k),
            }
        }
    }

    Ok(args)
}

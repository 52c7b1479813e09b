extern crate chrono;
extern crate fern;
extern crate gcflux;
#[macro_use]
extern crate log;

use chrono::Utc;
use gcflux::config::{self, Args};
use gcflux::export::{ExportError, ExportPipeline, ExportReport};
use gcflux::format;
use gcflux::model::{self, GcModel};
use gcflux::significance;
use gcflux::sink::{Console, InfluxDB, Storage};
use std::fs::File;
use std::process;

fn export<S: Storage>(storage: S, args: &Args, model: &GcModel) -> Result<ExportReport, ExportError> {
    let mut pipeline = ExportPipeline::new(storage, &args.tags)?;
    pipeline.export(model)
}

fn run(args: &Args) -> Result<ExportReport, ExportError> {
    let fp = File::open(&args.input).map_err(|e| {
        ExportError::Data(format!("could not open {}: {}", args.input.display(), e))
    })?;
    let model = model::load(fp)?;
    info!("loaded {} events from {}", model.size(), args.input.display());

    let sig = significance::analyze(&model);
    info!(
        "pause mean {:.4}s std dev {:.4}s, {} events above {:.4}s, significant: {}",
        sig.mean,
        sig.std_dev,
        sig.outlier_count,
        sig.threshold(),
        sig.is_significant()
    );

    if args.summary_lines {
        let log_name = args.input
            .file_name()
            .map_or_else(|| args.input.display().to_string(), |n| n.to_string_lossy().into_owned());
        for line in format::summary_lines(&model, &log_name) {
            println!("{}", line);
        }
    }

    if args.dry_run {
        export(Console::new(), args, &model)
    } else {
        let influx = InfluxDB::new(args.influxdb.clone()).map_err(ExportError::Configuration)?;
        export(influx, args, &model)
    }
}

fn main() {
    let args = match config::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let level = match args.verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let logging = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}][{}] {}",
                record.module_path().unwrap_or("-"),
                record.line().unwrap_or(0),
                Utc::now().to_rfc3339(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();
    if let Err(e) = logging {
        eprintln!("could not set up logging: {}", e);
        process::exit(1);
    }

    info!("gcflux - {}", args.version);

    match run(&args) {
        Ok(report) => info!(
            "exported {} events and {} summary records",
            report.events, report.summaries
        ),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

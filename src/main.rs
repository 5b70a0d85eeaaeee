mod error;
mod parser;
mod report;
mod stats;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use argh::FromArgs;
use log::{error, info};

use error::StatsError;
use report::{ReportFormat, Reporter};
use stats::Stats;

#[derive(FromArgs, Debug)]
/// Compute descriptive statistics for the numbers in a text file
struct Args {
    /// path to file with whitespace-separated numbers
    #[argh(positional)]
    data_file: PathBuf,

    /// where to write the report
    #[argh(option, short = 'o', default = "PathBuf::from(report::DEFAULT_OUTPUT)")]
    output: PathBuf,

    /// report file format: text or json
    #[argh(option, short = 'f', default = "ReportFormat::Text")]
    format: ReportFormat,
}

fn run(args: &Args) -> Result<()> {
    let data = parser::read_data(&args.data_file).context("Failed to read input data")?;
    info!(
        "read {} numeric values from {}",
        data.values.len(),
        args.data_file.display()
    );
    report::print_diagnostics(&data);

    let stats = Stats::compute(&data.values).context("Failed to compute statistics")?;
    info!("statistics computed in {} s", stats.elapsed_seconds);

    Reporter::new(args.output.clone(), args.format)
        .publish(&args.data_file, &stats)
        .context("Failed to write report")?;

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();

    if let Err(err) = run(&args) {
        match err.downcast_ref::<StatsError>() {
            Some(cause) if cause.is_file_access() => error!("input unavailable: {:?}", err),
            _ => error!("{:?}", err),
        }
        eprintln!("{:#}", err);
        process::exit(1);
    }
}

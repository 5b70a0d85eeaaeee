use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;

use crate::error::StatsError;
use crate::parser::ParsedData;
use crate::stats::Stats;

pub const DEFAULT_OUTPUT: &str = "StatisticsResults.txt";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("unknown report format '{}', expected text or json", s)),
        }
    }
}

#[derive(Debug)]
pub struct Reporter {
    output: PathBuf,
    format: ReportFormat,
}

impl Reporter {
    pub fn new(output: PathBuf, format: ReportFormat) -> Reporter {
        Reporter { output, format }
    }

    /// Fixed `field: value` block, one field per line, no trailing newline.
    pub fn render_text(stats: &Stats) -> String {
        format!(
            "Descriptive Statistics:\n\
             Count: {}\n\
             Mean: {:?}\n\
             Median: {:?}\n\
             Mode: {:?}\n\
             Standard Deviation: {:?}\n\
             Variance: {:?}\n\
             Tiempo transcurrido: {:?} segundos",
            stats.count,
            stats.mean,
            stats.median,
            stats.mode,
            stats.std_dev,
            stats.variance,
            stats.elapsed_seconds
        )
    }

    pub fn render(&self, stats: &Stats) -> Result<String, StatsError> {
        match self.format {
            ReportFormat::Text => Ok(Reporter::render_text(stats)),
            ReportFormat::Json => serde_json::to_string_pretty(stats).map_err(|e| {
                StatsError::OutputWrite {
                    path: self.output.clone(),
                    source: e.into(),
                }
            }),
        }
    }

    /// Echoes the text report to stdout, then writes the report file.
    pub fn publish(&self, source: &Path, stats: &Stats) -> Result<(), StatsError> {
        println!();
        println!("Descriptive statistics for {}:", source.display());
        println!();
        println!("{}", Reporter::render_text(stats));

        self.write(stats)
    }

    /// Replaces the output file atomically; a failed write leaves any previous report intact.
    /// An existing report keeps its permissions.
    pub fn write(&self, stats: &Stats) -> Result<(), StatsError> {
        let content = self.render(stats)?;
        let to_error = |source: io::Error| StatsError::OutputWrite {
            path: self.output.clone(),
            source,
        };

        let dir = match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        #[cfg_attr(not(unix), allow(unused_mut))]
        let mut builder = tempfile::Builder::new();
        // new reports get the usual umask-filtered mode instead of 0600
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut file = builder.tempfile_in(dir).map_err(to_error)?;
        file.write_all(content.as_bytes()).map_err(to_error)?;
        if let Ok(existing) = fs::metadata(&self.output) {
            file.as_file()
                .set_permissions(existing.permissions())
                .map_err(to_error)?;
        }
        file.persist(&self.output).map_err(|e| to_error(e.error))?;

        info!("report written to {}", self.output.display());
        Ok(())
    }
}

/// Prints the tokens that were dropped or adjusted while parsing.
pub fn print_diagnostics(data: &ParsedData) {
    if !data.invalid.is_empty() {
        println!(
            "These values are not numeric and will not be processed:\n {:?}",
            data.invalid
        );
    }
    if !data.salvaged.is_empty() {
        println!(
            "These non-numeric values were adjusted for processing:\n {:?}",
            data.salvaged
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Stats {
        Stats {
            count: 5,
            mean: 3.0,
            median: 3.0,
            mode: 1.0,
            variance: 2.5,
            std_dev: 1.5811388300841898,
            elapsed_seconds: 0.25,
        }
    }

    #[test]
    fn text_report_follows_fixed_schema() {
        let expected = "Descriptive Statistics:\n\
                        Count: 5\n\
                        Mean: 3.0\n\
                        Median: 3.0\n\
                        Mode: 1.0\n\
                        Standard Deviation: 1.5811388300841898\n\
                        Variance: 2.5\n\
                        Tiempo transcurrido: 0.25 segundos";
        assert_eq!(Reporter::render_text(&sample()), expected);
    }

    #[test]
    fn written_report_reads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(DEFAULT_OUTPUT);
        let reporter = Reporter::new(output.clone(), ReportFormat::Text);
        reporter.write(&sample()).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, Reporter::render_text(&sample()));
        let mean = written
            .lines()
            .find_map(|line| line.strip_prefix("Mean: "))
            .unwrap();
        assert_eq!(mean.parse::<f64>().unwrap(), sample().mean);
    }

    #[test]
    fn existing_report_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(DEFAULT_OUTPUT);
        fs::write(&output, "stale contents that are longer than nothing").unwrap();
        Reporter::new(output.clone(), ReportFormat::Text)
            .write(&sample())
            .unwrap();
        assert!(fs::read_to_string(&output)
            .unwrap()
            .starts_with("Descriptive Statistics:\n"));
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(DEFAULT_OUTPUT);
        fs::write(&output, "old report").unwrap();
        fs::set_permissions(&output, fs::Permissions::from_mode(0o640)).unwrap();

        Reporter::new(output.clone(), ReportFormat::Text)
            .write(&sample())
            .unwrap();

        let mode = fs::metadata(&output).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn new_report_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(DEFAULT_OUTPUT);
        Reporter::new(output.clone(), ReportFormat::Text)
            .write(&sample())
            .unwrap();

        // same mode a plain File::create would get under the current umask
        let reference = dir.path().join("reference.txt");
        fs::File::create(&reference).unwrap();
        let expected = fs::metadata(&reference).unwrap().permissions().mode();
        let mode = fs::metadata(&output).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, expected & 0o777);
    }

    #[test]
    fn json_report_contains_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("stats.json");
        Reporter::new(output.clone(), ReportFormat::Json)
            .write(&sample())
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["count"], 5);
        assert_eq!(value["mean"], 3.0);
        assert_eq!(value["mode"], 1.0);
        assert_eq!(value["variance"], 2.5);
        assert_eq!(value["elapsed_seconds"], 0.25);
    }

    #[test]
    fn unwritable_destination_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing-dir").join(DEFAULT_OUTPUT);
        let err = Reporter::new(output.clone(), ReportFormat::Text)
            .write(&sample())
            .unwrap_err();
        match err {
            StatsError::OutputWrite { path, .. } => assert_eq!(path, output),
            other => panic!("expected OutputWrite, got {:?}", other),
        }
        assert!(!output.exists());
    }

    #[test]
    fn report_format_from_str() {
        assert_eq!("text".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("yaml".parse::<ReportFormat>().is_err());
    }
}

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use textstat::api::Report;
use textstat::{BatchDriver, BatchObserver, DriverConfig, ErrorKind};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// text file(s) to analyze
    #[arg(required = true)]
    files: Vec<String>,

    /// show only this file's results (must be one of FILES)
    #[arg(short, long)]
    file: Option<String>,

    /// output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// worker threads (default: number of logical CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Enable debug output
    #[arg(long, short = 'D')]
    debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Table,
    Json,
}

/// Status line on stderr, like a progress label in a window footer.
struct ConsoleObserver {
    failures: usize,
}

impl BatchObserver for ConsoleObserver {
    fn progress_changed(&mut self, completed: usize, total: usize) {
        eprintln!("Processed {}/{}", completed, total);
    }

    fn file_succeeded(&mut self, _path: &str) {}

    fn file_failed(&mut self, path: &str, kind: ErrorKind) {
        self.failures += 1;
        eprintln!("Error analyzing {}: {}", path, kind);
    }

    fn batch_completed(&mut self) {
        eprintln!("Analysis complete");
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn print_table(report: &Report) -> Result<()> {
    let file_w = report.rows.iter().map(|r| r.file.len()).max().unwrap_or(0).max(4);
    let metric_w = report.rows.iter().map(|r| r.metric.len()).max().unwrap_or(0).max(6);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{:<file_w$}  {:<metric_w$}  Value", "File", "Metric")?;
    for row in &report.rows {
        writeln!(out, "{:<file_w$}  {:<metric_w$}  {}", row.file, row.metric, row.value)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if cli.debug {
        println!("[DEBUG] Config: {:?}", cli);
    }

    let mut files: Vec<String> = Vec::new();
    for f in cli.files {
        if !files.contains(&f) {
            files.push(f);
        }
    }

    if let Some(selected) = &cli.file {
        if !files.contains(selected) {
            bail!("{} is not among the input files", selected);
        }
    }

    let config = cli.jobs.map(|workers| DriverConfig { workers }).unwrap_or_default();
    let driver = BatchDriver::with_config(config).context("Failed to start batch driver")?;

    let handle = driver
        .run(files.iter().cloned(), ConsoleObserver { failures: 0 })
        .context("Failed to submit batch")?;
    let observer = handle.join().context("Batch did not finish cleanly")?;
    driver.shutdown();

    let cache = driver.cache();
    let report = match &cli.file {
        Some(selected) => Report::single(&cache, selected),
        None => Report::all(&cache),
    };

    match cli.format {
        Format::Table => print_table(&report)?,
        Format::Json => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
        }
    }

    if observer.failures > 0 {
        bail!("{} of {} file(s) could not be analyzed", observer.failures, files.len());
    }
    Ok(())
}

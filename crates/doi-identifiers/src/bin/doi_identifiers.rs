//! doi-identifiers - parse and validate DOIs from the command line
//!
//! Reads DOIs from arguments, or one per line from stdin, and prints one
//! result per input as it goes. Exits non-zero if any input was rejected.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use doi_identifiers::DoiReport;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `prefix<TAB>suffix`, errors on stderr
    Text,
    /// One JSON object per input
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "doi-identifiers", version, about = "Parse and validate DOIs")]
struct Cli {
    /// DOIs to parse (bare, doi: URI or resolver URL); stdin when omitted
    inputs: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print `prefix/suffix` instead of tab-separated parts (text format)
    #[arg(long)]
    canonical: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
struct OutputOptions {
    format: OutputFormat,
    canonical: bool,
}

/// Running totals for one batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Summary {
    total: usize,
    rejected: usize,
}

impl Summary {
    fn record(&mut self, report: &DoiReport) {
        self.total += 1;
        if !report.valid {
            self.rejected += 1;
        }
    }

    fn all_valid(&self) -> bool {
        self.rejected == 0
    }

    fn exit_code(&self) -> ExitCode {
        if !self.all_valid() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "doi_identifiers=debug"
    } else {
        "doi_identifiers=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn write_report(
    out: &mut impl Write,
    err: &mut impl Write,
    report: &DoiReport,
    options: OutputOptions,
) -> io::Result<()> {
    if options.format == OutputFormat::Json {
        let json = report.to_json().map_err(io::Error::other)?;
        return writeln!(out, "{}", json);
    }

    match (&report.prefix, &report.suffix) {
        (Some(prefix), Some(suffix)) if options.canonical => {
            writeln!(out, "{}/{}", prefix, suffix)
        }
        (Some(prefix), Some(suffix)) => writeln!(out, "{}\t{}", prefix, suffix),
        _ => writeln!(
            err,
            "error: {:?}: {}",
            report.input,
            report.error.as_deref().unwrap_or("rejected")
        ),
    }
}

fn emit(
    out: &mut impl Write,
    err: &mut impl Write,
    summary: &mut Summary,
    report: DoiReport,
    options: OutputOptions,
) -> io::Result<()> {
    summary.record(&report);
    if !report.valid {
        tracing::debug!(input = %report.input, kind = ?report.kind, "rejected input");
    }
    write_report(out, err, &report, options)
}

fn process_inputs(
    inputs: &[String],
    out: &mut impl Write,
    err: &mut impl Write,
    options: OutputOptions,
) -> io::Result<Summary> {
    let mut summary = Summary::default();
    for input in inputs {
        emit(out, err, &mut summary, DoiReport::from_input(input), options)?;
    }
    Ok(summary)
}

/// Parse one DOI per line, writing each result before reading the next line.
/// Blank lines are skipped; lines that are not UTF-8 are reported as rejected.
fn process_lines(
    mut reader: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
    options: OutputOptions,
) -> io::Result<Summary> {
    let mut summary = Summary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let report = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => {
                DoiReport::from_input(line.trim_end_matches(|c: char| c == '\n' || c == '\r'))
            }
            Err(_) => DoiReport::unreadable(
                String::from_utf8_lossy(&buf)
                    .trim_end_matches(|c: char| c == '\n' || c == '\r')
                    .to_string(),
            ),
        };
        emit(out, err, &mut summary, report, options)?;
    }

    Ok(summary)
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut cli = Cli::parse();
    init_logging(cli.verbose);

    let options = OutputOptions {
        format: cli.format,
        canonical: cli.canonical,
    };
    let inputs = std::mem::take(&mut cli.inputs);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stderr = io::stderr();
    let mut err = stderr.lock();

    let summary = if inputs.is_empty() {
        tracing::debug!(format = ?options.format, "parsing stdin");
        process_lines(io::stdin().lock(), &mut out, &mut err, options)?
    } else {
        tracing::debug!(count = inputs.len(), format = ?options.format, "parsing arguments");
        process_inputs(&inputs, &mut out, &mut err, options)?
    };
    out.flush()?;

    if !summary.all_valid() {
        tracing::debug!(
            rejected = summary.rejected,
            total = summary.total,
            "finished with rejected inputs"
        );
    }
    Ok(summary.exit_code())
}

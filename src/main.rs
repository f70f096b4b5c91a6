//! parsort: sort the data lines of a text file in parallel
//!
//! Reads a newline-delimited file, drops blank and comment lines, sorts the
//! rest on a fork-join pool and prints one value per line.

use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgMatches, Command};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use forkjoin_sort::{
    config::{MergeStrategy, SortConfig, SortConfigBuilder},
    error::{SortError, SortResult},
    sort_file, EXIT_SUCCESS, INSUFFICIENT_ARGUMENTS,
};

fn main() {
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            process::exit(INSUFFICIENT_ARGUMENTS);
        }
    };

    let config = parse_config_from_matches(&matches);
    init_tracing(config.as_ref().map_or(false, |config| config.debug));

    let result = config.and_then(|config| run(&matches, &config, io::stdout().lock()));
    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            report_error(&e, &matches);
            process::exit(e.exit_code());
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run<W: Write>(matches: &ArgMatches, config: &SortConfig, out: W) -> SortResult<i32> {
    let Some(source) = matches.get_one::<String>("file") else {
        print_usage();
        return Err(SortError::missing_argument("FILE"));
    };
    debug!(?config, "starting parsort");

    let sorted = sort_file(config, Path::new(source))?;
    debug!("the sorted values are: {:?}", sorted);

    write_values(out, &sorted)?;
    Ok(EXIT_SUCCESS)
}

/// Write one value per line; failures here are never input errors
fn write_values<W: Write>(out: W, values: &[String]) -> SortResult<()> {
    let mut out = BufWriter::new(out);
    for value in values {
        writeln!(out, "{value}").map_err(SortError::output)?;
    }
    out.flush().map_err(SortError::output)
}

fn report_error(e: &SortError, matches: &ArgMatches) {
    let source = matches
        .get_one::<String>("file")
        .map(String::as_str)
        .unwrap_or("-");
    match e {
        SortError::FileNotFound { .. } => {
            error!("could not find file '{source}' in the local filesystem")
        }
        SortError::MissingArgument { .. } => {}
        SortError::Io(_) | SortError::PermissionDenied { .. } | SortError::IsDirectory { .. } => {
            error!("unexpected error while reading file '{source}': {e}")
        }
        SortError::Output(_) => error!("could not write sorted values: {e}"),
        _ => error!("{e}"),
    }
}

fn print_usage() {
    error!("usage: parsort [OPTIONS] <FILE>");
    error!("where <FILE> is a file in the local filesystem containing values to be sorted");
}

fn build_cli() -> Command {
    Command::new("parsort")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage("parsort [OPTIONS] <FILE>")
        .about("Sort the lines of a text file with a parallel fork-join sort")
        .long_about("Sort the lines of a text file with a parallel fork-join sort.\n\nEach line is trimmed; empty lines and lines beginning with '#' or '//' are ignored. Sorted values are written to standard output, one per line.")

        .arg(Arg::new("file")
            .help("Text file containing the values to sort")
            .value_name("FILE"))

        .arg(Arg::new("threshold")
            .long("threshold")
            .help("Largest work unit sorted without splitting")
            .value_name("N")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("parallel")
            .long("parallel")
            .help("Change the number of worker threads to N")
            .value_name("N")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("merge")
            .long("merge")
            .help("How sorted halves are combined")
            .value_name("WORD")
            .value_parser(["linear", "resort"]))
        .arg(Arg::new("debug")
            .long("debug")
            .help("Log every split and leaf sort to stderr")
            .action(clap::ArgAction::SetTrue))
}

/// Parse configuration from command line matches
fn parse_config_from_matches(matches: &ArgMatches) -> SortResult<SortConfig> {
    let mut builder = SortConfigBuilder::new();

    if let Some(&threshold) = matches.get_one::<usize>("threshold") {
        builder = builder.threshold(threshold);
    }
    if let Some(&threads) = matches.get_one::<usize>("parallel") {
        builder = builder.parallel_threads(threads);
    }
    if let Some(word) = matches.get_one::<String>("merge") {
        builder = builder.merge_strategy(word.parse::<MergeStrategy>()?);
    }
    if matches.get_flag("debug") {
        builder = builder.debug();
    }

    builder.build()
}

//! `lispy` command-line host.
//!
//! Reads JSON syntax trees produced by an external parser (from a file, or stdin with `-`),
//! evaluates them in order against one interpreter and prints each result.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lispy::interpreter::json::serialize_value;
use lispy::{reader, Error, Interpreter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Canonical textual rendering
    Text,
    /// One tagged JSON value per line
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "lispy", version, about = "Evaluate parsed S-/Q-expression trees")]
struct Args {
    /// File of JSON syntax trees, `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// How results are printed
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log filter, in `tracing_subscriber::EnvFilter` syntax. `RUST_LOG` wins when set.
    #[arg(long, env = "LISPY_LOG", default_value = "warn")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, env = "LISPY_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Result<Option<WorkerGuard>, Error> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&args.log_level)?,
    };

    let (writer, guard) = match args.log_file {
        Some(ref path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("lispy.log"));
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(io::stderr), None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(args.log_file.is_none())
                .with_timer(ChronoLocal::rfc_3339()),
        )
        .with(filter)
        .init();
    Ok(guard)
}

fn run(args: &Args) -> Result<(), Error> {
    let nodes = if args.input == Path::new("-") {
        reader::read_nodes(io::stdin().lock())?
    } else {
        reader::read_nodes(BufReader::new(File::open(&args.input)?))?
    };
    info!(trees = nodes.len(), input = %args.input.display(), "read syntax trees");

    let mut interpreter = Interpreter::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for node in &nodes {
        let value = interpreter.eval_node(node);
        match args.format {
            Format::Text => writeln!(out, "{}", value)?,
            Format::Json => writeln!(out, "{}", serialize_value(&value)?)?,
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let _guard = match init_logging(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("lispy: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("lispy: {}", e);
            ExitCode::FAILURE
        }
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gene_core::SequenceAnnotation;
use gene_parse::{FormatRegistry, OutputFormat, format_collections, parse_report_path};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gene")]
#[command(about = "Parse sequence annotation reports into tabular records")]
struct Cli {
    /// Log every token and structural decision to stderr.
    #[arg(short, long, global = true)]
    debug: bool,
    /// Report progress to stderr.
    #[arg(long, global = true)]
    status: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a report file and print its mutation records.
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Report file to parse.
    #[arg(short, long)]
    filepath: PathBuf,
    /// Markup flavor of the report.
    #[arg(short = 't', long, default_value = "html")]
    file_type: String,
    /// Application that produced the report.
    #[arg(short, long, default_value = "breseq")]
    app_name: String,
    /// Application version (major.minor, major.minor.patch, or major.minor.*).
    #[arg(short = 'v', long, default_value = "0.27.*")]
    app_version: String,
    /// Output type.
    #[arg(long = "ot", default_value = "csv")]
    output_type: OutputFormat,
    /// YAML file describing the supported report formats.
    #[arg(long)]
    formats: Option<PathBuf>,
    /// Generation label stamped on every record.
    #[arg(long)]
    generation: Option<String>,
    /// Fill each record's unique id from its content fingerprint.
    #[arg(long)]
    assign_ids: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.status);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool, status: bool) {
    let default_level = if debug {
        "trace"
    } else if status {
        "info"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let registry = match &args.formats {
        Some(path) => FormatRegistry::load(path).map_err(|err| {
            format!("Failed to load report formats '{}': {err}", path.display())
        })?,
        None => FormatRegistry::builtin(),
    };
    let format = registry
        .select(&args.file_type, &args.app_name, &args.app_version)
        .map_err(|err| err.to_string())?;
    debug!(
        application = %format.application,
        version = %format.version,
        "selected report format"
    );

    let mut collections = parse_report_path(&args.filepath, format)
        .map_err(|err| format!("Could not parse '{}': {err}", args.filepath.display()))?;
    stamp_records(&mut collections, args.generation.as_deref(), args.assign_ids);

    let rendered = format_collections(&collections, args.output_type)?;
    println!("{}", rendered.trim_end_matches('\n'));
    info!(
        collections = collections.len(),
        path = %args.filepath.display(),
        "parse complete"
    );
    Ok(())
}

fn stamp_records(
    collections: &mut [Vec<SequenceAnnotation>],
    generation: Option<&str>,
    assign_ids: bool,
) {
    for record in collections.iter_mut().flatten() {
        if let Some(generation) = generation {
            record.generation = generation.to_string();
        }
        if assign_ids {
            record.assign_unique_id();
        }
    }
}

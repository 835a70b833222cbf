use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use strainbank::command::{CommandSpec, capture_command, run_command};
use strainbank::config::{ConfigLoader, ResolvedConfig};
use strainbank::convert::strains_from_json;
use strainbank::error::StrainError;
use strainbank::miner::TableMiner;
use strainbank::output::JsonOutput;
use strainbank::util::{batch_sequence, hash_path};

#[derive(Parser)]
#[command(name = "strainbank")]
#[command(about = "Bacterial strain metadata toolkit")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Mine the statistics tables of a genome-catalog HTML page")]
    Mine(MineArgs),
    #[command(about = "Normalize strain records from a JSON object or array")]
    Strains(InputArgs),
    #[command(about = "Print the SHA-256 digest of a file")]
    Hash(HashArgs),
    #[command(about = "Split a JSON array into batches of distinct values")]
    Batch(BatchArgs),
    #[command(about = "Run a shell command and report whether it succeeded (--capture prints its output)")]
    Run(RunArgs),
}

#[derive(Args)]
struct MineArgs {
    input: PathBuf,

    #[arg(long)]
    report: bool,
}

#[derive(Args)]
struct InputArgs {
    input: PathBuf,
}

#[derive(Args)]
struct HashArgs {
    input: PathBuf,

    #[arg(long)]
    block_size: Option<usize>,
}

#[derive(Args)]
struct BatchArgs {
    input: PathBuf,

    #[arg(long)]
    size: Option<usize>,
}

#[derive(Args)]
struct RunArgs {
    #[arg(long)]
    ignore_errors: bool,

    #[arg(long)]
    capture: bool,

    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

#[derive(Serialize)]
struct StrainSummary {
    strain: Map<String, Value>,
    check: bool,
}

#[derive(Serialize)]
struct HashSummary {
    path: String,
    sha256: String,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{report:?}");
            if let Some(error) = report.downcast_ref::<StrainError>() {
                return ExitCode::from(map_exit_code(error));
            }
            ExitCode::from(1)
        }
    }
}

fn map_exit_code(error: &StrainError) -> u8 {
    match error {
        StrainError::MissingKey { .. }
        | StrainError::UnknownField(_)
        | StrainError::InvalidFieldValue { .. }
        | StrainError::JsonParse(_)
        | StrainError::ConfigRead(_)
        | StrainError::ConfigParse(_)
        | StrainError::InvalidBatchSize
        | StrainError::InvalidBlockSize
        | StrainError::UnsupportedSchema(_)
        | StrainError::EmptyCommand => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Mine(args) => mine(args)?,
        Commands::Strains(args) => strains(args, &config)?,
        Commands::Hash(args) => hash(args, &config)?,
        Commands::Batch(args) => batch(args, &config)?,
        Commands::Run(args) => {
            let spec = if args.command.len() == 1 {
                CommandSpec::shell(args.command[0].as_str())
            } else {
                CommandSpec::Argv(args.command)
            };
            let success = if args.capture {
                let output = capture_command(&spec)?;
                JsonOutput::print(&output).into_diagnostic()?;
                output.success()
            } else {
                run_command(spec, args.ignore_errors)
            };
            if !success {
                return Ok(ExitCode::from(1));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(path: &Path) -> miette::Result<String> {
    Ok(fs::read_to_string(path).map_err(StrainError::from)?)
}

fn mine(args: MineArgs) -> miette::Result<()> {
    let html = read_input(&args.input)?;
    let miner = TableMiner::new()?;
    let report = miner.mine_with_report(&html);
    if args.report {
        JsonOutput::print(&report).into_diagnostic()
    } else {
        JsonOutput::print(&report.tables).into_diagnostic()
    }
}

fn strains(args: InputArgs, config: &ResolvedConfig) -> miette::Result<()> {
    let content = read_input(&args.input)?;
    let summaries = strains_from_json(&content, config.unknown_fields)?
        .into_iter()
        .map(|strain| StrainSummary {
            check: strain.check(),
            strain: strain.to_dict(),
        })
        .collect::<Vec<_>>();
    JsonOutput::print(&summaries).into_diagnostic()
}

fn hash(args: HashArgs, config: &ResolvedConfig) -> miette::Result<()> {
    let block_size = args.block_size.unwrap_or(config.hash_block_size);
    let sha256 = hash_path(&args.input, block_size)?;
    JsonOutput::print(&HashSummary {
        path: args.input.display().to_string(),
        sha256,
    })
    .into_diagnostic()
}

fn batch(args: BatchArgs, config: &ResolvedConfig) -> miette::Result<()> {
    let content = read_input(&args.input)?;
    let values: Vec<Value> = serde_json::from_str(&content)
        .map_err(|err| StrainError::JsonParse(err.to_string()))?;
    let items = values.into_iter().map(|value| match value {
        Value::String(text) => text,
        other => other.to_string(),
    });
    let batches = batch_sequence(items, args.size.unwrap_or(config.batch_size))?
        .map(|batch| {
            let mut batch = batch.into_iter().collect::<Vec<_>>();
            batch.sort();
            batch
        })
        .collect::<Vec<_>>();
    JsonOutput::print(&batches).into_diagnostic()
}

//! Command line entry point for the annotator.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use thiserror::Error;

use hoi_label::config::{AppConfig, ConfigError};
use hoi_label::console::{self, ConsoleError};
use hoi_label::format::{CategoryMap, FormatError, WarningSeverity, export_odgt, hico};
use hoi_label::session::{ImageSequence, Session, SessionError, label_dir_for};

#[derive(Parser, Debug)]
#[command(
    name = "hoi-label",
    version,
    about = "Annotate human-object interactions with boxes and labelled links"
)]
struct Cli {
    /// Configuration file (default: the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate the images of a folder interactively
    Annotate(AnnotateArgs),
    /// Concatenate a label folder into one ODGT file
    Export(ExportArgs),
    /// Convert an ODGT file to HICO JSON
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct AnnotateArgs {
    /// Folder with .jpg/.jpeg/.png images
    images: PathBuf,
    /// Root directory for label folders
    #[arg(long)]
    labels_root: Option<PathBuf>,
    /// Start each image with the previous image's annotations
    #[arg(long, action = ArgAction::SetTrue)]
    keep: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Folder with per-image label files
    label_dir: PathBuf,
    /// Output ODGT path
    output: PathBuf,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input ODGT file
    #[arg(long)]
    input: PathBuf,
    /// Output JSON file
    #[arg(long)]
    output: PathBuf,
    /// JSON file mapping object and interaction names to category ids
    #[arg(long)]
    categories: PathBuf,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Console(#[from] ConsoleError),
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::load_from_default_path().unwrap_or_default()),
    }
}

fn annotate(args: AnnotateArgs, config: &AppConfig) -> Result<(), CliError> {
    let sequence = ImageSequence::from_folder(&args.images)?;
    let root = args
        .labels_root
        .unwrap_or_else(|| config.preferences.label_root.clone());
    let label_dir = label_dir_for(&root, &sequence);

    let labels = config.label_sets();
    if labels.objects().is_empty() {
        log::warn!("No object tags configured; object boxes cannot be tagged");
    }
    if labels.interactions().is_empty() {
        log::warn!("No interactions configured; boxes cannot be linked");
    }

    let mut session = Session::new(sequence, label_dir, labels);
    session.set_carry_forward(args.keep || config.preferences.carry_forward);
    session.open()?;

    console::run(
        &mut session,
        &config.keybindings,
        io::stdin().lock(),
        io::stdout().lock(),
    )?;
    Ok(())
}

fn export(args: ExportArgs) -> Result<(), CliError> {
    let result = export_odgt(&args.label_dir, &args.output)?;
    for warning in &result.warnings {
        match warning.severity {
            WarningSeverity::Info => log::info!("{}", warning),
            WarningSeverity::Warning => log::warn!("{}", warning),
            WarningSeverity::Error => log::error!("{}", warning),
        }
    }
    println!(
        "Exported {} images ({} boxes, {} interactions) to {}",
        result.images_exported,
        result.annotations_exported,
        result.interactions_exported,
        args.output.display()
    );
    if result.has_errors() {
        eprintln!("Some label files could not be read; see the log");
    }
    Ok(())
}

fn convert(args: ConvertArgs) -> Result<(), CliError> {
    let categories = CategoryMap::load(&args.categories)?;
    let count = hico::convert_file(&args.input, &args.output, &categories)?;
    println!("Converted {} records to {}", count, args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Annotate(args) => annotate(args, &config),
        Commands::Export(args) => export(args),
        Commands::Convert(args) => convert(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

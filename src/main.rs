//! `xreal-options`: inspect and edit the XREAL desktop's persisted options

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use xreal_options::options::OptionValue;
use xreal_options::registry::read_raw_records;
use xreal_options::{DesktopOptions, LoadOutcome, PersistenceConfig, PersistenceManager};

#[derive(Parser, Debug)]
#[command(name = "xreal-options", version, about = "Inspect and edit XREAL desktop options")]
struct Cli {
    /// Persistence config (TOML); defaults to <config dir>/xreal/persistence.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the raw records of an options file as JSON, without a schema
    Inspect { file: PathBuf },
    /// Load the desktop options and print every value as JSON
    Dump {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Reset every option to its default and save
    Reset {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Set one option from text and save
    Set {
        key: String,
        value: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct InspectedRecord<'a> {
    key: &'a str,
    kind_tag: &'a str,
    payload_length: usize,
    value: Option<OptionValue>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PersistenceConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match dirs::config_dir() {
            Some(dir) => dir.join("xreal").join("persistence.toml"),
            None => return Ok(PersistenceConfig::default()),
        },
    };
    PersistenceConfig::load(&path)
        .with_context(|| format!("Failed to load persistence config {:?}", path))
}

/// Open the desktop options over `file`, or the configured location
fn open(config: &PersistenceConfig, file: Option<PathBuf>) -> Result<(DesktopOptions, PersistenceManager)> {
    let options = DesktopOptions::with_option_debounce(config.auto_save.option_debounce_delay())
        .context("Failed to declare desktop options")?;
    let path = file.unwrap_or_else(|| config.storage.file_path());
    let manager = PersistenceManager::new(
        path,
        options.registry().clone(),
        config.auto_save.debounce_delay(),
    );

    if let LoadOutcome::Reset(e) = manager.load_outcome() {
        eprintln!("warning: {:?} was unreadable ({}), using defaults", manager.path(), e);
    }
    Ok((options, manager))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
    println!("{}", text);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Inspect { file } => {
            let bytes = std::fs::read(&file).with_context(|| format!("Failed to read {:?}", file))?;
            let records = read_raw_records(&bytes)
                .with_context(|| format!("{:?} is not a valid options file", file))?;
            let inspected: Vec<_> = records
                .iter()
                .map(|record| InspectedRecord {
                    key: &record.key,
                    kind_tag: &record.kind_tag,
                    payload_length: record.payload.len(),
                    value: record.value(),
                })
                .collect();
            print_json(&inspected)
        }
        Command::Dump { file } => {
            let (options, _manager) = open(&config, file)?;
            print_json(&options.registry().snapshot())
        }
        Command::Reset { file } => {
            let (_options, manager) = open(&config, file)?;
            manager.reset_all();
            manager.flush().context("Failed to save options")?;
            info!("Reset options in {:?}", manager.path());
            Ok(())
        }
        Command::Set { key, value, file } => {
            let (options, manager) = open(&config, file)?;
            let changed = options
                .registry()
                .set_from_text(&key, &value)
                .with_context(|| format!("Cannot set {}", key))?;
            manager.flush().context("Failed to save options")?;

            if let Some(option) = options.registry().get(&key) {
                let shown = serde_json::to_string(&option.snapshot())?;
                println!("{} = {}{}", key, shown, if changed { "" } else { " (unchanged)" });
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

//! Interactive resume storage shell.
//!
//! Loads `resumes.toml` (or `--config`), opens the selected backend and runs
//! menu commands read from stdin.

mod menu;

use anyhow::Context;
use clap::Parser;
use menu::{execute, Command, HELP};
use resume_core::config::DEFAULT_CONFIG_FILE;
use resume_core::{init_logging, load_config, AppConfig, StorageKind};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resumes", version, about = "Store and browse resumes")]
struct Cli {
    /// Config file (defaults to ./resumes.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend: array|sorted-array|map|object-file|xml-file|json-file|sql
    #[arg(short, long)]
    storage: Option<StorageKind>,

    /// Directory for file-backed storages
    #[arg(long)]
    dir: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = config.logging.dir.as_deref() {
        let log_dir = std::env::current_dir()?.join(log_dir);
        init_logging(&config.logging.level, log_dir).context("failed to initialize logging")?;
    }

    let mut storage = config
        .open_storage()
        .with_context(|| format!("failed to open `{}` storage", config.storage))?;
    log::info!(
        "event=cli_start module=cli status=ok storage={} version={}",
        config.storage,
        resume_core::core_version()
    );

    println!("resumes {} ({} storage)", resume_core::core_version(), config.storage);
    println!("{HELP}");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match Command::parse(&line) {
            Ok(Command::Exit) => break,
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if let Err(err) = execute(storage.as_mut(), command, &mut stdout) {
            println!("error: {err}");
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => load_config(DEFAULT_CONFIG_FILE)?,
        None => AppConfig::default(),
    };

    if let Some(kind) = cli.storage {
        config.storage = kind;
    }
    if let Some(dir) = &cli.dir {
        config.storage_dir = dir.clone();
    }
    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    Ok(config)
}

//! `notela` command-line tool.
//!
//! # Usage
//!
//! ```bash
//! notela highlight note.md
//! notela export-name note.md
//! notela migrate-vault --vault-dir ./vault --db-path ./notela.sqlite3
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{export_name, highlight_source, migrate_vault, read_source};
use log::info;
use std::path::PathBuf;

/// Notela note and vault utilities
#[derive(Parser, Debug)]
#[command(name = "notela", version, about, long_about = None)]
struct Cli {
    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "NOTELA_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print overlay markup for a markdown file (`-` reads stdin)
    Highlight {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Suggest an export filename for a markdown file (`-` reads stdin)
    ExportName {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Import vault markdown files into the notes database
    MigrateVault {
        #[arg(long, env = "NOTELA_VAULT_DIR", value_name = "DIR", default_value = "vault")]
        vault_dir: PathBuf,

        #[arg(long, env = "NOTELA_DB_PATH", value_name = "PATH")]
        db_path: PathBuf,
    },

    /// Print the core version
    Version,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Highlight { .. } => "highlight",
            Self::ExportName { .. } => "export-name",
            Self::MigrateVault { .. } => "migrate-vault",
            Self::Version => "version",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    notela_core::init_stderr_logging(&cli.log_level)?;
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    match cli.command {
        Command::Highlight { input } => {
            let source = read_source(&input)?;
            println!("{}", highlight_source(&source));
        }
        Command::ExportName { input } => {
            let source = read_source(&input)?;
            println!("{}", export_name(&source));
        }
        Command::MigrateVault { vault_dir, db_path } => {
            let report = migrate_vault(&vault_dir, &db_path)?;
            for (filename, id) in &report.migrated {
                println!("migrated {filename} -> {id}");
            }
            for filename in &report.skipped {
                println!("skipped {filename} (already imported)");
            }
            println!(
                "{} migrated, {} skipped",
                report.migrated.len(),
                report.skipped.len()
            );
        }
        Command::Version => {
            println!("notela {}", notela_core::core_version());
        }
    }
    Ok(())
}

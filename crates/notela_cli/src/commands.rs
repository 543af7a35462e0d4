//! Subcommand implementations, kept free of argument parsing.

use anyhow::{Context, Result};
use notela_core::editor::export::export_filename;
use notela_core::{
    highlight, open_db, FsVaultStore, MigrationReport, NoteService, SqliteNoteRepository,
    VaultService,
};
use std::io::Read;
use std::path::Path;

/// Reads a file, or stdin when `input` is `-`.
pub fn read_source(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("failed to read `{}`", input.display()))
}

pub fn highlight_source(source: &str) -> String {
    highlight(source)
}

pub fn export_name(source: &str) -> String {
    export_filename(source)
}

/// Imports every vault file without a matching note into the database.
pub fn migrate_vault(vault_dir: &Path, db_path: &Path) -> Result<MigrationReport> {
    if !vault_dir.is_dir() {
        anyhow::bail!("vault directory `{}` does not exist", vault_dir.display());
    }
    let vault = FsVaultStore::open(vault_dir)
        .with_context(|| format!("failed to open vault `{}`", vault_dir.display()))?;
    let mut conn = open_db(db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
    let mut notes = NoteService::new(SqliteNoteRepository::try_new(&mut conn)?);

    let report = VaultService::new(vault)
        .migrate_into_notes(&mut notes)
        .context("vault migration failed")?;
    Ok(report)
}

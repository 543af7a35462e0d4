//! Server configuration from flags and environment.

use clap::Parser;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_DB_FILE_NAME: &str = "notela.sqlite3";

/// Notela REST server
#[derive(Parser, Debug, Clone)]
#[command(name = "notela-server", version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "NOTELA_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// SQLite database file (defaults to the system temp directory)
    #[arg(long, env = "NOTELA_DB_PATH", value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Directory holding vault markdown files
    #[arg(long, env = "NOTELA_VAULT_DIR", value_name = "DIR", default_value = "vault")]
    pub vault_dir: PathBuf,

    /// Shared secret for vault routes; vault is locked when unset
    #[arg(long, env = "NOTELA_VAULT_SECRET", hide_env_values = true)]
    pub vault_secret: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "NOTELA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Write rolling log files here instead of stderr
    #[arg(long, env = "NOTELA_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| notela_core::default_log_level())
    }

    /// Log directory made absolute against `cwd`.
    pub fn log_dir_in(&self, cwd: &Path) -> Option<PathBuf> {
        self.log_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                cwd.join(dir)
            }
        })
    }
}

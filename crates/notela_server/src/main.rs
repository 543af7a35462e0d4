use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use notela_core::{gate_from_secret, init_logging, init_stderr_logging, open_db, FsVaultStore};
use notela_server::{server, App, ServerConfig};

fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_server_logging(&config)?;

    let db_path = config.db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
    let vault = FsVaultStore::open(&config.vault_dir).with_context(|| {
        format!("failed to open vault directory `{}`", config.vault_dir.display())
    })?;
    let mut app = App::new(conn, vault, gate_from_secret(config.vault_secret.as_deref()));

    let listener = tiny_http::Server::http(&config.bind)
        .map_err(|err| anyhow::anyhow!("failed to bind `{}`: {err}", config.bind))?;
    info!(
        "event=server_start module=server status=ok bind={} db={}",
        config.bind,
        db_path.display()
    );
    println!("notela-server listening on http://{}", config.bind);

    server::serve(&listener, &mut app);
    Ok(())
}

fn init_server_logging(config: &ServerConfig) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    match config.log_dir_in(&cwd) {
        Some(dir) => {
            let dir = dir
                .to_str()
                .context("log directory must be valid UTF-8")?
                .to_string();
            init_logging(config.log_level(), &dir)?;
        }
        None => init_stderr_logging(config.log_level())?,
    }
    Ok(())
}

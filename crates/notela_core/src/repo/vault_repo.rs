//! File-system backed vault store.
//!
//! # Responsibility
//! - List, read, write and delete markdown files in one vault directory.
//! - Derive listing metadata (title, preview, size, modification time).
//!
//! # Invariants
//! - Every filename is validated as a single `.md` path component before it
//!   is joined onto the vault root, so no operation can leave the directory
//!   or touch non-markdown files.
//! - Listings only include regular `.md` files, newest first.

use crate::model::validation::{validate_vault_filename, ValidationError};
use crate::model::vault::{
    derive_vault_preview, derive_vault_title, VaultDocument, VaultFileSummary,
};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

pub type VaultResult<T> = Result<T, VaultError>;

/// Vault store error.
#[derive(Debug)]
pub enum VaultError {
    InvalidFilename(ValidationError),
    NotFound(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for VaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilename(err) => write!(f, "{err}"),
            Self::NotFound(filename) => write!(f, "vault file not found: {filename}"),
            Self::Io { path, source } => write!(f, "vault io error at `{}`: {source}", path.display()),
        }
    }
}

impl Error for VaultError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFilename(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ValidationError> for VaultError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidFilename(value)
    }
}

/// Storage contract for vault files.
pub trait VaultStore {
    /// Lists `.md` files ordered by `last_modified DESC, filename ASC`.
    fn list(&self) -> VaultResult<Vec<VaultFileSummary>>;
    fn read(&self, filename: &str) -> VaultResult<VaultDocument>;
    /// Creates or overwrites one file.
    fn write(&self, filename: &str, content: &str) -> VaultResult<()>;
    fn delete(&self, filename: &str) -> VaultResult<()>;
}

/// Vault rooted at one directory on disk.
#[derive(Debug, Clone)]
pub struct FsVaultStore {
    root: PathBuf,
}

impl FsVaultStore {
    /// Opens a vault directory, creating it when missing.
    pub fn open(root: impl Into<PathBuf>) -> VaultResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| VaultError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, filename: &str) -> VaultResult<PathBuf> {
        validate_vault_filename(filename)?;
        Ok(self.root.join(filename))
    }
}

impl VaultStore for FsVaultStore {
    fn list(&self) -> VaultResult<Vec<VaultFileSummary>> {
        let entries = fs::read_dir(&self.root).map_err(|source| io_error(&self.root, source))?;
        let mut files = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|source| io_error(&self.root, source))?;
            let Ok(filename) = entry.file_name().into_string() else {
                warn!("event=vault_list module=vault status=skip reason=non_utf8_name");
                continue;
            };
            if validate_vault_filename(&filename).is_err() {
                continue;
            }

            let path = entry.path();
            let metadata = entry.metadata().map_err(|source| io_error(&path, source))?;
            if !metadata.is_file() {
                continue;
            }

            let bytes = fs::read(&path).map_err(|source| io_error(&path, source))?;
            let content = String::from_utf8_lossy(&bytes);
            let last_modified = metadata
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map_or(0, |elapsed| elapsed.as_millis() as i64);

            files.push(VaultFileSummary {
                title: derive_vault_title(&filename, &content),
                preview: derive_vault_preview(&content),
                size: metadata.len(),
                last_modified,
                filename,
            });
        }

        files.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        Ok(files)
    }

    fn read(&self, filename: &str) -> VaultResult<VaultDocument> {
        let path = self.resolve(filename)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(VaultDocument {
                filename: filename.to_string(),
                content,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(VaultError::NotFound(filename.to_string()))
            }
            Err(source) => Err(io_error(&path, source)),
        }
    }

    fn write(&self, filename: &str, content: &str) -> VaultResult<()> {
        let path = self.resolve(filename)?;
        fs::write(&path, content).map_err(|source| io_error(&path, source))
    }

    fn delete(&self, filename: &str) -> VaultResult<()> {
        let path = self.resolve(filename)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(VaultError::NotFound(filename.to_string()))
            }
            Err(source) => Err(io_error(&path, source)),
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> VaultError {
    VaultError::Io {
        path: path.to_path_buf(),
        source,
    }
}

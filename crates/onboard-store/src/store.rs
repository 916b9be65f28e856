//! Database file storage with XDG path support.
//!
//! The database is stored as JSON at `~/.local/share/onb/store.json`.
//!
//! Both synchronous and asynchronous I/O methods are provided:
//! - `save()`, `load()` - Synchronous methods using `std::fs`
//! - `save_async()`, `load_async()` - Asynchronous methods using `tokio::fs`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

use crate::Database;

/// Default database filename.
const STORE_FILENAME: &str = "store.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "onb";

/// Errors that can occur while reading or writing the database file.
#[derive(Debug, Error)]
pub enum DatabaseStoreError {
    /// Failed to determine XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read store file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write store file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create store directory '{path}': {source}")]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error during file delete.
    #[error("failed to delete store file '{path}': {source}")]
    DeleteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatabaseStoreError {
    fn is_not_found(&self) -> bool {
        matches!(
            self,
            DatabaseStoreError::ReadError { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}

/// Result type for database store operations.
pub type Result<T> = std::result::Result<T, DatabaseStoreError>;

/// Persistent storage for the [`Database`].
///
/// File operations are not coordinated between processes. Saves are atomic
/// (temp file + rename), so a reader never observes a half-written file, but
/// two concurrent writers can lose each other's changes.
///
/// # Example
///
/// ```no_run
/// use onboard_store::{Database, DatabaseStore};
///
/// let store = DatabaseStore::new()?;
/// let db = store.load_or_default()?;
/// store.save(&db)?;
/// # Ok::<(), onboard_store::DatabaseStoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    path: PathBuf,
}

impl DatabaseStore {
    /// Creates a store at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let path = Self::default_path()?;
        Ok(Self { path })
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default XDG data path for the database file.
    ///
    /// On Unix: `~/.local/share/onb/store.json`
    /// On macOS: `~/Library/Application Support/onb/store.json`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(DatabaseStoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(STORE_FILENAME))
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the database file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn read_error(&self, source: io::Error) -> DatabaseStoreError {
        DatabaseStoreError::ReadError {
            path: self.path.clone(),
            source,
        }
    }

    /// Loads the database from disk.
    ///
    /// # Errors
    ///
    /// - Returns `DatabaseStoreError::ReadError` if the file cannot be read,
    ///   including when it does not exist.
    /// - Returns `DatabaseStoreError::Json` if the file contains invalid JSON.
    pub fn load(&self) -> Result<Database> {
        let contents = fs::read_to_string(&self.path).map_err(|e| self.read_error(e))?;
        let db: Database = serde_json::from_str(&contents)?;
        tracing::debug!(
            path = %self.path.display(),
            filters = db.filters.len(),
            keywords = db.keywords.len(),
            "loaded store"
        );
        Ok(db)
    }

    /// Loads the database, returning a fresh one if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// - Returns `DatabaseStoreError::ReadError` for I/O errors other than "file not found".
    /// - Returns `DatabaseStoreError::Json` if the file contains invalid JSON.
    pub fn load_or_default(&self) -> Result<Database> {
        match self.load() {
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %self.path.display(), "no store file, starting empty");
                Ok(Database::default())
            }
            other => other,
        }
    }

    /// Saves the database to disk atomically.
    ///
    /// Creates the parent directory if it doesn't exist and writes
    /// pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// - Returns `DatabaseStoreError::CreateDirError` if the directory cannot be created.
    /// - Returns `DatabaseStoreError::WriteError` if the file cannot be written.
    /// - Returns `DatabaseStoreError::Json` if serialization fails.
    pub fn save(&self, db: &Database) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| DatabaseStoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(db)?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, &json).map_err(|e| DatabaseStoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| DatabaseStoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), "saved store");
        Ok(())
    }

    /// Deletes the database file from disk.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseStoreError::DeleteError` if the file cannot be deleted.
    /// A missing file is not an error.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DatabaseStoreError::DeleteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    // =========================================================================
    // Async I/O Methods
    // =========================================================================

    /// Async equivalent of [`load()`](Self::load).
    ///
    /// # Errors
    ///
    /// Same as [`load()`](Self::load).
    pub async fn load_async(&self) -> Result<Database> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.read_error(e))?;
        let db: Database = serde_json::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), "loaded store");
        Ok(db)
    }

    /// Async equivalent of [`load_or_default()`](Self::load_or_default).
    ///
    /// # Errors
    ///
    /// Same as [`load_or_default()`](Self::load_or_default).
    pub async fn load_or_default_async(&self) -> Result<Database> {
        match self.load_async().await {
            Err(e) if e.is_not_found() => Ok(Database::default()),
            other => other,
        }
    }

    /// Async equivalent of [`save()`](Self::save).
    ///
    /// # Errors
    ///
    /// Same as [`save()`](Self::save).
    pub async fn save_async(&self, db: &Database) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DatabaseStoreError::CreateDirError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(db)?;

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| DatabaseStoreError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DatabaseStoreError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        tracing::debug!(path = %self.path.display(), "saved store");
        Ok(())
    }

    /// Async equivalent of [`delete()`](Self::delete).
    ///
    /// # Errors
    ///
    /// Same as [`delete()`](Self::delete).
    pub async fn delete_async(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DatabaseStoreError::DeleteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

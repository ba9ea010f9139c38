// Store module: reads and writes the meal file and owns the one catalog
// the CLI works on. Loading never fails; an unusable file is replaced by
// the default catalog and the reason is handed back to the caller.

use crate::catalog::{AddOutcome, Catalog, RemoveOutcome};
use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default meal file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "meals.json";

/// Errors raised while writing the meal file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize meals for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Why `load` fell back to the default catalog.
#[derive(Debug, Error)]
pub enum FallbackReason {
    #[error("meal file does not exist")]
    Missing,
    #[error("meal file could not be read: {0}")]
    Unreadable(#[source] io::Error),
    #[error("meal file is not a mapping of category to meal names: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Result of `load`: either the catalog on disk or the defaults with the
/// reason the file was not used.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Catalog),
    Fallback {
        catalog: Catalog,
        reason: FallbackReason,
    },
}

impl LoadOutcome {
    pub fn catalog(&self) -> &Catalog {
        match self {
            LoadOutcome::Loaded(catalog) => catalog,
            LoadOutcome::Fallback { catalog, .. } => catalog,
        }
    }

    pub fn into_catalog(self) -> Catalog {
        match self {
            LoadOutcome::Loaded(catalog) => catalog,
            LoadOutcome::Fallback { catalog, .. } => catalog,
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            LoadOutcome::Loaded(_) => None,
            LoadOutcome::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Read the catalog at `path`. The file must hold a JSON object whose
/// values are arrays of strings; anything else yields the defaults.
pub fn load(path: &Path) -> LoadOutcome {
    let fallback = |reason| LoadOutcome::Fallback {
        catalog: Catalog::defaults(),
        reason,
    };

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return fallback(FallbackReason::Missing)
        }
        Err(e) => return fallback(FallbackReason::Unreadable(e)),
    };

    match serde_json::from_str::<IndexMap<String, Vec<String>>>(&text) {
        Ok(document) => LoadOutcome::Loaded(Catalog::from_document(document)),
        Err(e) => fallback(FallbackReason::Malformed(e)),
    }
}

/// Overwrite `path` with the catalog as pretty-printed JSON.
pub fn save(catalog: &Catalog, path: &Path) -> Result<(), StoreError> {
    let mut contents =
        serde_json::to_string_pretty(catalog).map_err(|source| StoreError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    contents.push('\n');

    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)?;
    debug!(path = %path.display(), categories = catalog.len(), "saved meals");
    Ok(())
}

/// The catalog together with the file it is persisted to. Mutations that
/// change the catalog are saved right away.
#[derive(Debug)]
pub struct MealStore {
    path: PathBuf,
    catalog: Catalog,
}

impl MealStore {
    pub fn new(path: impl Into<PathBuf>, catalog: Catalog) -> Self {
        MealStore {
            path: path.into(),
            catalog,
        }
    }

    /// Load the catalog at `path`, logging when the defaults are used.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let outcome = load(&path);
        match outcome.fallback_reason() {
            None => info!(path = %path.display(), "loaded meals"),
            Some(FallbackReason::Missing) => {
                info!(path = %path.display(), "no meal file yet, using defaults")
            }
            Some(reason) => {
                warn!(path = %path.display(), %reason, "ignoring meal file, using defaults")
            }
        }
        MealStore::new(path, outcome.into_catalog())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn save(&self) -> Result<(), StoreError> {
        save(&self.catalog, &self.path)
    }

    /// Add a meal and save if it was not already present. On a save error
    /// the meal stays in memory.
    pub fn add(&mut self, category: &str, meal: &str) -> Result<AddOutcome, StoreError> {
        let outcome = self.catalog.add(category, meal);
        if outcome.is_added() {
            self.save()?;
        }
        Ok(outcome)
    }

    /// Remove the meal at 1-based `index` and save if one was removed.
    pub fn remove(&mut self, category: &str, index: i64) -> Result<RemoveOutcome, StoreError> {
        let outcome = self.catalog.remove(category, index);
        if outcome.is_removed() {
            self.save()?;
        }
        Ok(outcome)
    }
}

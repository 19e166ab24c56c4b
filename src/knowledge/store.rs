//! Durable persistence of the FAQ mapping
//!
//! The on-disk format is a pretty-printed UTF-8 JSON document of the shape
//! `{"faqs": {"<normalized question>": "<answer>", ...}}`. Loading never
//! fails the caller: a missing file bootstraps the built-in defaults and a
//! corrupt file falls back to them with a warning.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::knowledge::defaults::default_faqs;
use crate::{Error, Result};

/// On-disk FAQ document schema
#[derive(Debug, Serialize, Deserialize)]
struct FaqDocument {
    faqs: IndexMap<String, String>,
}

/// Loads and saves the FAQ mapping as a JSON document
#[derive(Debug, Clone)]
pub struct FaqStore {
    path: PathBuf,
}

impl FaqStore {
    /// Create a store backed by the given file path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the FAQ mapping, falling back to the built-in defaults
    ///
    /// A missing file is bootstrapped: the defaults are persisted immediately
    /// so the next load reads them back. A present-but-invalid file is left
    /// untouched and the defaults are used in memory only.
    #[must_use]
    pub fn load(&self) -> IndexMap<String, String> {
        if !self.path.exists() {
            let faqs = default_faqs();
            tracing::info!(
                path = %self.path.display(),
                count = faqs.len(),
                "no FAQ document found, bootstrapping defaults"
            );
            if let Err(e) = self.save(&faqs) {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to bootstrap FAQ document");
            }
            return faqs;
        }

        match self.read_document() {
            Ok(faqs) => {
                tracing::info!(
                    path = %self.path.display(),
                    count = faqs.len(),
                    "loaded FAQ document"
                );
                faqs
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "unreadable FAQ document, using built-in defaults"
                );
                default_faqs()
            }
        }
    }

    /// Serialize the full mapping, overwriting the document
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written; callers treat persistence as best-effort
    pub fn save(&self, faqs: &IndexMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Store(format!("failed to create data dir: {e}")))?;
        }

        let document = FaqDocument { faqs: faqs.clone() };
        let json = serde_json::to_string_pretty(&document)?;

        std::fs::write(&self.path, json)
            .map_err(|e| Error::Store(format!("failed to write FAQ document: {e}")))?;

        tracing::debug!(path = %self.path.display(), count = faqs.len(), "saved FAQ document");
        Ok(())
    }

    /// Read and parse the backing document
    fn read_document(&self) -> Result<IndexMap<String, String>> {
        let contents = std::fs::read_to_string(&self.path)?;
        let document: FaqDocument = serde_json::from_str(&contents)?;
        Ok(document.faqs)
    }
}

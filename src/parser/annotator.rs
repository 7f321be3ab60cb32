// src/parser/annotator.rs
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{MakesError, MakesResult};

/// Marker introducing a documentation comment in a Makefile
pub const HELP_MARKER: &str = "##";

/// Raw documentation comments of a Makefile, keyed by target name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentIndex {
    entries: HashMap<String, String>,
}

impl CommentIndex {
    /// Load the index from a Makefile on disk
    pub fn load(path: &Path) -> MakesResult<Self> {
        info!("Reading documentation comments from {}", path.display());

        let file = File::open(path).map_err(|e| MakesError::FileError {
            path: path.to_path_buf(),
            message: format!("Failed to open: {}", e),
        })?;

        Self::from_reader(BufReader::new(file))
    }

    /// Build the index from Makefile text.
    ///
    /// Only `name:rest` lines containing `##` with exactly one colon are
    /// indexed; a later line for the same name replaces the earlier one.
    pub fn from_reader<R: BufRead>(reader: R) -> MakesResult<Self> {
        let mut entries = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            if !line.contains(HELP_MARKER) {
                continue;
            }

            let parts: Vec<&str> = line.split(':').collect();
            if let [name, rest] = parts.as_slice() {
                entries.insert(name.to_string(), rest.to_string());
            }
        }

        debug!("Indexed {} documented targets", entries.len());
        Ok(Self { entries })
    }

    /// Raw text after the colon of the documenting line for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

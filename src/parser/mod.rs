// src/parser/mod.rs - Extraction of make targets from `make -n -p` output
pub mod annotator;
pub mod assembler;
pub mod classifier;
pub mod scanner;

use std::io::BufRead;
use tracing::debug;

pub use annotator::{CommentIndex, HELP_MARKER};
pub use assembler::{assemble, help_text};
pub use classifier::{classify, classify_all, is_target, ClassifiedTarget};
pub use scanner::{scan, Dump, RawBlock};

use crate::core::Target;
use crate::error::MakesResult;

/// Targets extracted from one database dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    pub version: String,
    pub targets: Vec<Target>,
}

/// Parse a database dump and annotate its targets with Makefile comments.
///
/// Fails as a whole; no targets are returned if any step errors.
pub fn parse_database<R: BufRead>(dump: R, comments: &CommentIndex) -> MakesResult<Database> {
    let Dump { version, blocks } = scan(dump)?;
    let classified = classify_all(&blocks)?;
    let targets = assemble(classified, comments);

    debug!("Extracted {} targets", targets.len());
    Ok(Database { version, targets })
}

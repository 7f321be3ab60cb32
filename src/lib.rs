pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod parser;
pub mod utils;

// Re-export main types for easier access
pub use crate::cli::App;
pub use crate::config::Config;
pub use crate::core::{BuildTool, Make, Target};
pub use crate::error::{MakesError, MakesResult};
pub use crate::parser::{parse_database, CommentIndex, Database};

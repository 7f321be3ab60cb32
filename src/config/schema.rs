use serde::{Serialize, Deserialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub make: MakeConfig,
    pub menu: MenuConfig,
}

/// How make is invoked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakeConfig {
    pub program: String,
    /// Definition file scanned for `##` comments, relative to the working directory
    pub makefile: PathBuf,
    /// Arguments that make print its database without running anything
    pub dump_args: Vec<String>,
}

/// Selection menu settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfig {
    pub label: String,
    /// Upper bound of visible items
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            make: MakeConfig {
                program: "make".to_string(),
                makefile: PathBuf::from("Makefile"),
                dump_args: vec!["-n".to_string(), "-p".to_string()],
            },
            menu: MenuConfig {
                label: "Select a make target".to_string(),
                max_size: 10,
            },
        }
    }
}

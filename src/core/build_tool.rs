// src/core/build_tool.rs
use std::process::ExitStatus;
use async_trait::async_trait;
use tracing::info;

use crate::config::MakeConfig;
use crate::error::{MakesError, MakesResult};
use crate::utils::shell;

/// The build program whose database is dumped and whose targets are run
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BuildTool: Send + Sync {
    /// Program name shown to the operator
    fn program(&self) -> &str;

    /// Capture the printed rule database
    async fn dump_database(&self) -> MakesResult<Vec<u8>>;

    /// Run a single target in the foreground
    async fn run_target(&self, target: &str) -> MakesResult<ExitStatus>;
}

/// GNU make driven through subprocesses
#[derive(Debug, Clone)]
pub struct Make {
    program: String,
    dump_args: Vec<String>,
}

impl Make {
    pub fn new(program: impl Into<String>, dump_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            dump_args,
        }
    }

    pub fn from_config(config: &MakeConfig) -> Self {
        Self::new(config.program.clone(), config.dump_args.clone())
    }
}

#[async_trait]
impl BuildTool for Make {
    fn program(&self) -> &str {
        &self.program
    }

    async fn dump_database(&self) -> MakesResult<Vec<u8>> {
        let output = shell::execute_captured(&self.program, &self.dump_args).await?;

        if !output.status.success() {
            return Err(MakesError::ExternalToolError {
                tool: self.program.clone(),
                message: format!("{}: {}", output.status, output.stderr.trim()),
            });
        }

        Ok(output.combined)
    }

    async fn run_target(&self, target: &str) -> MakesResult<ExitStatus> {
        info!("Running target {}", target);
        let status = shell::execute_streaming(&self.program, &[target.to_string()]).await?;
        Ok(status)
    }
}

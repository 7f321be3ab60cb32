use std::time::{Duration, Instant};
use tracing::{info, debug, warn};

use crate::config::Config;
use crate::core::{BuildTool, Make, Target};
use crate::error::{MakesResult, MakesError};
use crate::parser::{self, CommentIndex, Database};

use super::picker::TargetPicker;

/// Targets of the current Makefile, with how long it took to get them
#[derive(Debug, Clone)]
pub struct LoadedTargets {
    pub database: Database,
    pub duration: Duration,
}

/// The main application struct
pub struct App<T: BuildTool> {
    config: Config,
    tool: T,
}

impl App<Make> {
    /// Create an application driving the configured make program
    pub fn new(config: Config) -> Self {
        let tool = Make::from_config(&config.make);
        Self::with_tool(config, tool)
    }
}

impl<T: BuildTool> App<T> {
    pub fn with_tool(config: Config, tool: T) -> Self {
        Self { config, tool }
    }

    /// Dump the make database and extract its documented targets
    pub async fn load_targets(&self) -> MakesResult<LoadedTargets> {
        let started = Instant::now();

        let dump = self.tool.dump_database().await?;
        debug!("Captured {} bytes of database dump", dump.len());

        let comments = CommentIndex::load(&self.config.make.makefile)?;
        if comments.is_empty() {
            warn!(
                "No {} comments in {}, targets will have no help text",
                parser::HELP_MARKER,
                self.config.make.makefile.display()
            );
        }
        let database = parser::parse_database(dump.as_slice(), &comments)?;

        info!("Found {} targets", database.targets.len());
        Ok(LoadedTargets {
            database,
            duration: started.elapsed(),
        })
    }

    /// Let the operator pick a target and run it, returning make's exit code
    pub async fn pick_and_run(&self) -> MakesResult<i32> {
        let loaded = self.load_targets().await?;
        let targets = &loaded.database.targets;

        println!("\n{} (duration={:?})\n", loaded.database.version, loaded.duration);

        let picker = TargetPicker::new(&self.config.menu.label, targets, self.config.menu.max_size);
        let index = picker.interact()?;

        self.run(&targets[index]).await
    }

    /// Run one target, returning make's exit code
    pub async fn run(&self, target: &Target) -> MakesResult<i32> {
        println!("Running {:?} ...", format!("{} {}", self.tool.program(), target.name));

        let status = self.tool.run_target(&target.name).await?;
        Ok(status.code().unwrap_or(1))
    }

    /// Print the targets without running anything
    pub async fn list(&self, json: bool) -> MakesResult<()> {
        let loaded = self.load_targets().await?;
        let targets = &loaded.database.targets;

        if json {
            let output = serde_json::to_string_pretty(targets)
                .map_err(|e| MakesError::SerializationError(format!("Failed to serialize targets: {}", e)))?;
            println!("{}", output);
            return Ok(());
        }

        let width = targets.iter().map(|t| t.name.len()).max().unwrap_or(0);
        for target in targets {
            if target.help.is_empty() {
                println!("{}", target.name);
            } else {
                println!("{:<width$}  {}", target.name, target.help, width = width);
            }
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;
    use crate::core::MockBuildTool;

    const DUMP: &str = "# GNU Make 4.3\n\
                        # Files\n\
                        \n\
                        # Not a target:\n\
                        .c.o:\n\
                        \n\
                        build: main.o\n\
                        #  Last modified 2024-01-02 03:04:05\n\
                        \n\
                        .PHONY: build clean\n\
                        \n\
                        clean:\n\
                        #  Phony target (prerequisite of .PHONY)\n\
                        \n";

    fn config_with_makefile(contents: &str) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let makefile = dir.path().join("Makefile");
        std::fs::write(&makefile, contents).unwrap();

        let mut config = Config::default();
        config.make.makefile = makefile;
        (dir, config)
    }

    fn dumping_tool(dump: &'static str) -> MockBuildTool {
        let mut tool = MockBuildTool::new();
        tool.expect_dump_database()
            .times(1)
            .returning(move || Ok(dump.as_bytes().to_vec()));
        tool
    }

    #[tokio::test]
    async fn test_load_targets_annotates_dump() {
        let (_dir, config) = config_with_makefile("build: main.o ## Build the binary\nclean: ## Remove ## artifacts\n");
        let app = App::with_tool(config, dumping_tool(DUMP));

        let loaded = app.load_targets().await.unwrap();
        let targets = &loaded.database.targets;

        assert_eq!(loaded.database.version, "GNU Make 4.3");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name, "build");
        assert_eq!(targets[0].help, "Build the binary");
        assert!(targets[0].updated.is_some());
        assert_eq!(targets[1].name, "clean");
        assert_eq!(targets[1].help, "artifacts");
        assert!(targets[1].is_phony);
    }

    #[tokio::test]
    async fn test_load_targets_without_comments_keeps_targets() {
        let (_dir, config) = config_with_makefile("build: main.o\nclean:\n");
        let app = App::with_tool(config, dumping_tool(DUMP));

        let loaded = app.load_targets().await.unwrap();
        let targets = &loaded.database.targets;

        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|target| target.help.is_empty()));
    }

    #[tokio::test]
    async fn test_load_targets_fails_without_makefile() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.make.makefile = dir.path().join("Makefile");
        let app = App::with_tool(config, dumping_tool(DUMP));

        assert!(matches!(app.load_targets().await, Err(MakesError::FileError { .. })));
    }

    #[tokio::test]
    async fn test_load_targets_propagates_dump_failure() {
        let (_dir, config) = config_with_makefile("");
        let mut tool = MockBuildTool::new();
        tool.expect_dump_database().returning(|| {
            Err(MakesError::ExternalToolError {
                tool: "make".to_string(),
                message: "exit status: 2".to_string(),
            })
        });
        let app = App::with_tool(config, tool);

        assert!(matches!(
            app.load_targets().await,
            Err(MakesError::ExternalToolError { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_returns_exit_code() {
        let (_dir, config) = config_with_makefile("");
        let mut tool = MockBuildTool::new();
        tool.expect_program().return_const("make".to_string());
        tool.expect_run_target()
            .withf(|target| target.to_string() == "build")
            .times(1)
            .returning(|_| Ok(ExitStatus::from_raw(2 << 8)));
        let app = App::with_tool(config, tool);

        let target = Target {
            name: "build".to_string(),
            help: String::new(),
            is_phony: false,
            updated: None,
        };
        assert_eq!(app.run(&target).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_pick_without_targets_is_an_error() {
        let (_dir, config) = config_with_makefile("");
        let app = App::with_tool(config, dumping_tool("# GNU Make 4.3\n"));

        assert!(matches!(app.pick_and_run().await, Err(MakesError::NoTargets)));
    }
}

mod build_tool;
mod target;

pub use build_tool::{BuildTool, Make};
#[cfg(test)]
pub use build_tool::MockBuildTool;
pub use target::Target;

pub mod app;
mod commands;
mod picker;

pub use app::{App, LoadedTargets};
pub use commands::{execute_command, Args, Commands};
pub use picker::{PickerState, TargetPicker};

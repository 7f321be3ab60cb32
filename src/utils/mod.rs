pub mod shell;

pub use shell::{execute_captured, execute_streaming, CapturedOutput};

// src/core/target.rs
use chrono::{DateTime, Local};
use serde::Serialize;

/// Display layout of the last update time
const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// A make target offered for selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub name: String,
    pub help: String,
    pub is_phony: bool,
    pub updated: Option<DateTime<Local>>,
}

impl Target {
    /// Case-insensitive substring match ignoring spaces on both sides
    pub fn matches(&self, query: &str) -> bool {
        normalize(&self.name).contains(&normalize(query))
    }

    /// "Phony target", or when the target file was last updated
    pub fn status(&self) -> String {
        if self.is_phony {
            return "Phony target".to_string();
        }

        match &self.updated {
            Some(updated) => format!("Last updated: {}", updated.format(UPDATED_FORMAT)),
            None => "Last updated: never".to_string(),
        }
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase().replace(' ', "")
}

//! Output formatting for resolved snapshots.

use envarg_core::Snapshot;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parses a format name. The caller's choice parameter guarantees the
    /// name is one of the known formats.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(OutputFormat::Json),
            "yaml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }
}

/// Formats a snapshot in the requested output format.
pub fn format_snapshot(snapshot: &Snapshot, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(snapshot)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(snapshot).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

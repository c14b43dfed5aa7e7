//! External tool detection.

use std::path::PathBuf;
use std::process::Command;

/// Information about an external converter.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a converter is available and get its information.
///
/// Knows the version flag quirks of the tools we invoke (`ffmpeg` takes
/// `-version`, everything else `--version`).
///
/// # Example
///
/// ```no_run
/// use fconvert_av::check_tool;
///
/// let info = check_tool("ffmpeg");
/// if !info.available {
///     eprintln!("ffmpeg is not installed");
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    let version_arg = if name == "ffmpeg" { "-version" } else { "--version" };
    check_tool_with_arg(name, version_arg)
}

/// Check if a tool is available using a custom version argument.
pub fn check_tool_with_arg(name: &str, version_arg: &str) -> ToolInfo {
    let result = Command::new(name).arg(version_arg).output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            let path = which::which(name).ok();

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

//! Converter command selection and failure classification.
//!
//! Maps a target format to the external program invocation that produces
//! it, and classifies converter stderr into a probable failure cause. The
//! marker strings live only here; they track the wording of the tools we
//! invoke and nothing else needs updating when that wording changes.

use std::path::Path;

use fconvert_common::TargetFormat;

use crate::command::ToolCommand;

/// The external program used to produce `format`.
pub fn program_for(format: &TargetFormat) -> &'static str {
    match format {
        TargetFormat::Jxl => "cjxl",
        _ => "ffmpeg",
    }
}

/// Build the converter invocation for one source/destination pair.
///
/// - `jxl` uses the dedicated `cjxl` still-image encoder, which takes the
///   source and destination positionally.
/// - `mp4` uses ffmpeg with hardware-acceleration auto-detect and an
///   explicit HEVC encode.
/// - Everything else uses ffmpeg with hardware-acceleration auto-detect and
///   lets it pick the codec from the destination extension.
///
/// Unrecognized formats are not rejected here; ffmpeg reports its own error
/// when it cannot produce the requested container.
pub fn command_for(source: &Path, destination: &Path, format: &TargetFormat) -> ToolCommand {
    let mut cmd = ToolCommand::new(program_for(format));

    match format {
        TargetFormat::Jxl => {
            cmd.arg(source.to_string_lossy().as_ref());
            cmd.arg(destination.to_string_lossy().as_ref());
        }
        TargetFormat::Mp4 => {
            cmd.args(["-hide_banner", "-hwaccel", "auto", "-i"]);
            cmd.arg(source.to_string_lossy().as_ref());
            cmd.args(["-c:v", "libx265"]);
            cmd.arg(destination.to_string_lossy().as_ref());
        }
        TargetFormat::Other(_) => {
            cmd.args(["-hide_banner", "-hwaccel", "auto", "-i"]);
            cmd.arg(source.to_string_lossy().as_ref());
            cmd.arg(destination.to_string_lossy().as_ref());
        }
    }

    cmd
}

/// Probable cause of a converter failure, derived from its stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// The destination already exists and the tool refused to overwrite it.
    DestinationExists,
    /// The source file could not be opened.
    SourceMissing,
    /// Anything else; the raw stderr is the best signal available.
    Unknown,
}

/// Classify converter stderr into a probable failure cause.
///
/// Matching is purely textual and best-effort; the tools expose no
/// structured failure information beyond their exit status.
pub fn classify_stderr(stderr: &str) -> FailureCause {
    if stderr.contains("already exists") {
        FailureCause::DestinationExists
    } else if stderr.contains("No such file") || stderr.contains("no such file") {
        FailureCause::SourceMissing
    } else {
        FailureCause::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jxl_uses_dedicated_encoder() {
        let cmd = command_for(
            Path::new("photo.png"),
            Path::new("photo.jxl"),
            &TargetFormat::Jxl,
        );
        assert_eq!(cmd.program_name(), "cjxl");
        assert_eq!(cmd.get_args(), ["photo.png", "photo.jxl"]);
    }

    #[test]
    fn test_mp4_requests_efficient_codec() {
        let cmd = command_for(
            Path::new("clip.mov"),
            Path::new("clip.mp4"),
            &TargetFormat::Mp4,
        );
        assert_eq!(cmd.program_name(), "ffmpeg");
        let args = cmd.get_args();
        assert!(args.windows(2).any(|w| w == ["-hwaccel", "auto"]));
        assert!(args.windows(2).any(|w| w == ["-c:v", "libx265"]));
        assert_eq!(args.last().map(String::as_str), Some("clip.mp4"));
    }

    #[test]
    fn test_other_formats_fall_through_to_ffmpeg() {
        let cmd = command_for(
            Path::new("a.jpg"),
            Path::new("a.png"),
            &TargetFormat::from("png"),
        );
        assert_eq!(cmd.program_name(), "ffmpeg");
        let args = cmd.get_args();
        assert!(args.windows(2).any(|w| w == ["-hwaccel", "auto"]));
        assert!(!args.iter().any(|a| a == "-c:v"));
    }

    #[test]
    fn test_classify_destination_exists() {
        let stderr = "File 'a.png' already exists. Exiting.";
        assert_eq!(classify_stderr(stderr), FailureCause::DestinationExists);
    }

    #[test]
    fn test_classify_source_missing() {
        let stderr = "a.jpg: No such file or directory";
        assert_eq!(classify_stderr(stderr), FailureCause::SourceMissing);
    }

    #[test]
    fn test_classify_unknown() {
        let stderr = "Unable to find a suitable output format for 'a.zzz'";
        assert_eq!(classify_stderr(stderr), FailureCause::Unknown);
    }
}

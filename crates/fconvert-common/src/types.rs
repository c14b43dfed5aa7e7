//! Core types shared across the fconvert crates.

use std::fmt;
use std::str::FromStr;

/// Target conversion format requested on the command line.
///
/// Formats that need a dedicated encoder or special transcoder arguments get
/// their own variant; everything else is carried verbatim in
/// [`TargetFormat::Other`] and handed to the general transcoder, which may
/// reject it at execution time. Adding a format means adding a variant and
/// its match arms, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// JPEG XL still image, produced by the dedicated `cjxl` encoder.
    Jxl,
    /// MP4 video, transcoded with an explicit efficient video codec.
    Mp4,
    /// Any other format, passed through to the general transcoder.
    Other(String),
}

impl TargetFormat {
    /// The file extension used for destinations of this format.
    ///
    /// # Examples
    ///
    /// ```
    /// use fconvert_common::TargetFormat;
    ///
    /// assert_eq!(TargetFormat::Jxl.extension(), "jxl");
    /// assert_eq!(TargetFormat::from("webm").extension(), "webm");
    /// ```
    pub fn extension(&self) -> &str {
        match self {
            TargetFormat::Jxl => "jxl",
            TargetFormat::Mp4 => "mp4",
            TargetFormat::Other(ext) => ext,
        }
    }
}

impl From<&str> for TargetFormat {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("jxl") {
            TargetFormat::Jxl
        } else if s.eq_ignore_ascii_case("mp4") {
            TargetFormat::Mp4
        } else {
            TargetFormat::Other(s.to_string())
        }
    }
}

impl FromStr for TargetFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TargetFormat::from(s))
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

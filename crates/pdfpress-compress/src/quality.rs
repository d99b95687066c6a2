//! Quality profiles and their Ghostscript settings flags.

use std::fmt;

use crate::error::{CompressError, CompressResult};

/// Named compression preset selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityProfile {
    /// Smallest output, 72 dpi images.
    Low,
    /// Balanced output, 150 dpi images.
    Medium,
    /// Print quality, 300 dpi images.
    High,
}

impl QualityProfile {
    /// Parse a wire label. Labels are matched exactly and are lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::InvalidInput`] for any other label.
    pub fn parse(label: &str) -> CompressResult<Self> {
        match label {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(CompressError::invalid("quality", "unknown_quality", other)),
        }
    }

    /// Wire label for the profile.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Value passed to Ghostscript as `-dPDFSETTINGS`.
    #[must_use]
    pub const fn settings_flag(self) -> &'static str {
        match self {
            Self::Low => "/screen",
            Self::Medium => "/ebook",
            Self::High => "/printer",
        }
    }
}

impl fmt::Display for QualityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

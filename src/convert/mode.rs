//! Conversion mode selection

use std::fmt;
use std::str::FromStr;

use super::ConvertError;

/// Archive container formats handled by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    SevenZip,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveFormat::Zip => write!(f, "ZIP"),
            ArchiveFormat::SevenZip => write!(f, "7z"),
        }
    }
}

/// Direction of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// ZIP archive in, 7z archive out (`27z`)
    ToSevenZip,
    /// 7z archive in, ZIP archive out (`2zip`)
    ToZip,
}

impl ConversionMode {
    /// Keyword the user types to select this mode
    pub fn keyword(self) -> &'static str {
        match self {
            ConversionMode::ToSevenZip => "27z",
            ConversionMode::ToZip => "2zip",
        }
    }

    /// Format of the archive the user supplies
    pub fn source_format(self) -> ArchiveFormat {
        match self {
            ConversionMode::ToSevenZip => ArchiveFormat::Zip,
            ConversionMode::ToZip => ArchiveFormat::SevenZip,
        }
    }

    /// Format of the archive this mode produces
    pub fn target_format(self) -> ArchiveFormat {
        match self {
            ConversionMode::ToSevenZip => ArchiveFormat::SevenZip,
            ConversionMode::ToZip => ArchiveFormat::Zip,
        }
    }

    /// Extension of the archive this mode produces
    pub fn output_extension(self) -> &'static str {
        match self {
            ConversionMode::ToSevenZip => "7z",
            ConversionMode::ToZip => "zip",
        }
    }

    pub fn description(self) -> String {
        format!("{} → {}", self.source_format(), self.target_format())
    }
}

impl FromStr for ConversionMode {
    type Err = ConvertError;

    /// Parse a mode keyword, ignoring case only
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "27z" => Ok(ConversionMode::ToSevenZip),
            "2zip" => Ok(ConversionMode::ToZip),
            _ => Err(ConvertError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

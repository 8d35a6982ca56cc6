//! zip7z: Archive Conversion Library
//!
//! Converts archives between ZIP and 7z by extracting them with one external
//! archiver and recompressing the extracted tree with another.

pub mod cli;
pub mod convert;
pub mod report;
pub mod utils;

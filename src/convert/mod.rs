//! Conversion module - validation, archiver seam and the conversion pipeline

pub mod archiver;
pub mod error;
pub mod mode;
pub mod pipeline;
pub mod plan;

pub use archiver::*;
pub use error::ConvertError;
pub use mode::*;
pub use pipeline::*;
pub use plan::*;

pub mod command;
pub mod types;

use crate::error::AnalysisError;
use anyhow::Result;

pub use types::{EngineDiag, MediaType, ToolDiag};

/// Pluggable text recovery. Each call is a single attempt; retry policy
/// belongs to the caller.
pub trait TextRecovery {
    fn doctor(&self) -> Result<EngineDiag>;
    fn pdf_text(&self, bytes: &[u8]) -> Result<String>;
    fn image_text(&self, bytes: &[u8], subtype: &str) -> Result<String>;
}

/// Dispatches on the declared media type.
pub fn recover_text<E: TextRecovery + ?Sized>(
    engine: &E,
    bytes: &[u8],
    media_type: &str,
) -> Result<String, AnalysisError> {
    let kind = MediaType::parse(media_type)?;
    let out = match &kind {
        MediaType::Pdf => engine.pdf_text(bytes),
        MediaType::Image(sub) => engine.image_text(bytes, sub),
    };
    out.map_err(AnalysisError::extraction)
}

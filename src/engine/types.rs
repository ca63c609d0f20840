use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Pdf,
    /// `image/<subtype>`, subtype kept lowercase.
    Image(String),
}

impl MediaType {
    pub fn parse(raw: &str) -> Result<Self, AnalysisError> {
        let norm = raw.trim().to_ascii_lowercase();
        // Parameters such as `; charset=binary` do not change the type.
        let essence = norm.split(';').next().unwrap_or("").trim();

        if essence == "application/pdf" {
            return Ok(MediaType::Pdf);
        }
        if let Some(sub) = essence.strip_prefix("image/") {
            if !sub.is_empty() {
                return Ok(MediaType::Image(sub.to_string()));
            }
        }
        Err(AnalysisError::UnsupportedMediaType(raw.to_string()))
    }

    /// Best guess from a file extension; unknown extensions yield
    /// `application/octet-stream`, which `parse` rejects.
    pub fn guess_from_extension(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => "application/pdf",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "tif" | "tiff" => "image/tiff",
            "bmp" => "image/bmp",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Pdf => write!(f, "application/pdf"),
            MediaType::Image(sub) => write!(f, "image/{sub}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDiag {
    pub command: String,
    pub found: bool,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDiag {
    pub ok: bool,
    pub pdf: ToolDiag,
    pub image: ToolDiag,
}

use thiserror::Error;

/// Fatal outcomes of a single document analysis.
///
/// Pattern-matching stages never produce these; an unmatched pattern is
/// simply an absent metric or relation.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("text extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("no text could be extracted from the document")]
    EmptyTranscript,
}

impl AnalysisError {
    /// Wraps an engine failure, keeping the whole context chain in the message.
    pub fn extraction(err: anyhow::Error) -> Self {
        AnalysisError::ExtractionFailure(format!("{err:#}"))
    }
}

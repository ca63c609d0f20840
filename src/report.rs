use crate::{metrics::HealthMetrics, recommend::Recommendations, relations::Relations};
use serde::{Deserialize, Serialize};

/// Terminal artifact of one analysis. The pipeline keeps nothing after
/// handing it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Leading slice of the transcript, for reference.
    pub raw_text: String,
    pub health_metrics: HealthMetrics,
    pub relations: Relations,
    pub recommendations: Recommendations,
    /// RFC 3339, UTC.
    pub extracted_at: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub media_type: String,
    pub bytes: u64,
    pub sha256: String,
}

impl AnalysisResult {
    /// `0.87`-style rendering.
    pub fn confidence_display(&self) -> String {
        format!("{:.2}", self.confidence)
    }
}

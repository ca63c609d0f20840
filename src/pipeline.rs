use crate::{
    config::Config,
    confidence,
    engine::{self, TextRecovery},
    error::AnalysisError,
    metrics, recommend, relations,
    report::{AnalysisResult, DocumentInfo},
    transcript,
    util::{now_rfc3339, sha256_hex},
};
use std::time::Instant;
use tracing::{debug, info};

/// Sequences text recovery through scoring for one document at a time.
/// Holds no per-document state, so one instance can serve concurrent calls.
pub struct Pipeline<E: TextRecovery> {
    cfg: Config,
    engine: E,
}

impl<E: TextRecovery> Pipeline<E> {
    pub fn new(cfg: &Config, engine: E) -> Self {
        Self {
            cfg: cfg.clone(),
            engine,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Recovers and normalises the transcript only.
    pub fn recover(&self, bytes: &[u8], media_type: &str) -> Result<String, AnalysisError> {
        let raw = engine::recover_text(&self.engine, bytes, media_type)?;
        let text = transcript::normalize(&self.cfg, &raw);
        if transcript::is_blank(&text) {
            return Err(AnalysisError::EmptyTranscript);
        }
        Ok(text)
    }

    pub fn analyze(&self, bytes: &[u8], media_type: &str) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();
        info!("analyze media_type={} bytes={}", media_type, bytes.len());

        let text = self.recover(bytes, media_type)?;
        debug!("transcript chars={}", text.chars().count());

        let mut result = analyze_transcript(&self.cfg, &text)?;
        result.document = Some(DocumentInfo {
            media_type: media_type.to_string(),
            bytes: bytes.len() as u64,
            sha256: sha256_hex(bytes),
        });

        info!(
            "analysis done metrics={} conditions={} confidence={} elapsed_ms={}",
            result.health_metrics.count(),
            result.relations.conditions.len(),
            result.confidence_display(),
            started.elapsed().as_millis()
        );
        Ok(result)
    }
}

/// Stages after text recovery: metrics, relations, recommendations,
/// confidence. Fails only when the transcript is blank.
pub fn analyze_transcript(cfg: &Config, text: &str) -> Result<AnalysisResult, AnalysisError> {
    if transcript::is_blank(text) {
        return Err(AnalysisError::EmptyTranscript);
    }

    let health_metrics = metrics::extract(text);
    info!("metrics extracted: {:?}", health_metrics.kinds());

    let relations = relations::extract(text, &health_metrics);
    let recommendations = recommend::generate(&health_metrics, &relations);
    let confidence = confidence::score(&health_metrics, &relations);

    Ok(AnalysisResult {
        raw_text: transcript::excerpt(text, cfg.transcript.excerpt_chars),
        health_metrics,
        relations,
        recommendations,
        extracted_at: now_rfc3339(),
        confidence,
        document: None,
    })
}

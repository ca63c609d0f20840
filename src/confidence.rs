use crate::metrics::{round_to, HealthMetrics};
use crate::relations::Relations;

/// Weight each present metric contributes.
pub const METRIC_WEIGHT: f64 = 0.9;

/// Mean of metric weights and condition confidences, rounded to two places.
/// Zero when nothing was extracted.
pub fn score(metrics: &HealthMetrics, relations: &Relations) -> f64 {
    let metric_count = metrics.count();
    let condition_count = relations.conditions.len();
    let count = metric_count + condition_count;
    if count == 0 {
        return 0.0;
    }

    let total = metric_count as f64 * METRIC_WEIGHT
        + relations
            .conditions
            .iter()
            .map(|c| c.confidence)
            .sum::<f64>();

    round_to((total / count as f64).clamp(0.0, 1.0), 2)
}

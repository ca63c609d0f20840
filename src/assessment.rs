use crate::metrics::{BmiStatus, BpStatus, GlucoseStatus, HealthMetrics};
use serde::{Deserialize, Serialize};

/// Plain-language reading of already stored metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub summary: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn assess(metrics: &HealthMetrics) -> HealthAssessment {
    let mut out = HealthAssessment::default();

    if let Some(bmi) = &metrics.bmi {
        out.summary.push(format!(
            "Your BMI is {:.1}, which is considered {}",
            bmi.value, bmi.status
        ));
        if bmi.status != BmiStatus::Normal {
            out.warnings
                .push(format!("BMI is {}", bmi.status.label().to_lowercase()));
            if matches!(bmi.status, BmiStatus::Overweight | BmiStatus::Obese) {
                out.recommendations.push(
                    "Consider a balanced diet and regular exercise to achieve a healthy weight"
                        .to_string(),
                );
            }
        }
    }

    if let Some(bp) = &metrics.blood_pressure {
        out.summary.push(format!(
            "Blood pressure: {}/{} mmHg ({})",
            bp.systolic, bp.diastolic, bp.status
        ));
        if bp.status != BpStatus::Normal {
            out.warnings.push(format!("Blood pressure is {}", bp.status));
            out.recommendations
                .push("Monitor blood pressure regularly and consult a cardiologist".to_string());
            out.recommendations
                .push("Reduce salt intake and manage stress levels".to_string());
        }
    }

    if let Some(sugar) = &metrics.sugar_level {
        out.summary.push(format!(
            "Blood sugar: {} {} ({})",
            sugar.value, sugar.unit, sugar.status
        ));
        if sugar.status != GlucoseStatus::Normal {
            out.warnings
                .push(format!("Blood sugar is {}", sugar.status));
            out.recommendations.push(
                "Consult an endocrinologist for proper diabetes management".to_string(),
            );
            out.recommendations.push(
                "Monitor carbohydrate intake and maintain regular meal times".to_string(),
            );
        }
    }

    out
}

use crate::metrics::{HealthMetrics, MetricKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

pub const TEXT_CONDITION_CONFIDENCE: f64 = 0.7;
pub const MEDICATION_CONFIDENCE: f64 = 0.8;
pub const SYMPTOM_CONFIDENCE: f64 = 0.75;

const NOT_SPECIFIED: &str = "not specified";

const KNOWN_CONDITIONS: &[&str] = &[
    "diabetes",
    "hypertension",
    "high blood pressure",
    "obesity",
    "cholesterol",
    "heart disease",
    "asthma",
    "arthritis",
];

const SYMPTOM_KEYWORDS: &[&str] = &[
    "headache",
    "dizziness",
    "fatigue",
    "pain",
    "nausea",
    "shortness of breath",
    "chest pain",
    "weakness",
    "fever",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionSource {
    Text,
}

fn default_condition_confidence() -> f64 {
    TEXT_CONDITION_CONFIDENCE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default = "default_condition_confidence")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_metric: Option<MetricKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ConditionSource>,
}

impl Condition {
    fn from_metric(name: &str, metric: MetricKind, severity: Severity, confidence: f64) -> Self {
        Self {
            name: name.to_string(),
            severity: Some(severity),
            confidence,
            related_metric: Some(metric),
            source: None,
        }
    }

    fn from_text(phrase: String) -> Self {
        Self {
            name: phrase,
            severity: None,
            confidence: TEXT_CONDITION_CONFIDENCE,
            related_metric: None,
            source: Some(ConditionSource::Text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Everything derived from one transcript beyond the raw metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relations {
    pub conditions: Vec<Condition>,
    pub medications: Vec<Medication>,
    pub symptoms: Vec<Symptom>,
    pub doctor_notes: Vec<String>,
    pub trends: BTreeMap<String, Trend>,
}

static CONDITION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:diagnosed with|suffering from|has(?:[ \t]+been)?(?:[ \t]+(?:diagnosed with|suffering from))?)[ \t]+([a-z \t]+)",
        r"\bcondition[:\s]+([a-z \t]+)",
    ])
});

static LABELED_MEDICATION: LazyLock<Regex> = LazyLock::new(|| {
    compile_one(r"\b(?:medication|drug|prescription)[:\s]+([a-z]+)\s+(\d+\s*mg)(?:[ \t]+([^\n]*))?")
});

static TAKING_MEDICATION: LazyLock<Regex> =
    LazyLock::new(|| compile_one(r"\btaking\s+([a-z]+)(?:\s+(\d+\s*mg))?"));

static NOTE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?:doctor['’]s?\s+note|recommendation|advice)[:\s]+([^.!?]+)",
        r"(?:suggested|advised|recommended)[:\s]+([^.!?]+)",
    ])
});

static TREND_PATTERNS: LazyLock<Vec<(Regex, Trend)>> = LazyLock::new(|| {
    vec![
        (compile_one(r"(\w+)\s+(?:increased|risen|went up|higher)"), Trend::Increasing),
        (compile_one(r"(\w+)\s+(?:decreased|fallen|went down|lower)"), Trend::Decreasing),
        (compile_one(r"(\w+)\s+(?:stable|unchanged|same)"), Trend::Stable),
    ]
});

fn compile_one(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("invalid relation pattern")
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| compile_one(p)).collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn extract(text: &str, metrics: &HealthMetrics) -> Relations {
    let relations = Relations {
        conditions: conditions(text, metrics),
        medications: medications(text),
        symptoms: symptoms(text),
        doctor_notes: doctor_notes(text),
        trends: trends(text),
    };
    debug!(
        conditions = relations.conditions.len(),
        medications = relations.medications.len(),
        symptoms = relations.symptoms.len(),
        notes = relations.doctor_notes.len(),
        trends = relations.trends.len(),
        "relations extracted"
    );
    relations
}

/// Threshold conditions first (sugar, blood pressure, BMI), then phrases
/// recognised in free text.
pub fn conditions(text: &str, metrics: &HealthMetrics) -> Vec<Condition> {
    let mut out = threshold_conditions(metrics);
    out.extend(text_conditions(text).into_iter().map(Condition::from_text));
    out
}

pub fn threshold_conditions(metrics: &HealthMetrics) -> Vec<Condition> {
    let mut out = Vec::new();

    if let Some(sugar) = &metrics.sugar_level {
        if sugar.value >= 126.0 {
            out.push(Condition::from_metric("Diabetes", MetricKind::SugarLevel, Severity::High, 0.9));
        } else if sugar.value >= 100.0 {
            out.push(Condition::from_metric(
                "Pre-diabetes",
                MetricKind::SugarLevel,
                Severity::Medium,
                0.85,
            ));
        }
    }

    if let Some(bp) = &metrics.blood_pressure {
        if bp.systolic >= 140 || bp.diastolic >= 90 {
            out.push(Condition::from_metric(
                "Hypertension",
                MetricKind::BloodPressure,
                Severity::High,
                0.9,
            ));
        }
    }

    if let Some(bmi) = &metrics.bmi {
        if bmi.value >= 30.0 {
            out.push(Condition::from_metric("Obesity", MetricKind::Bmi, Severity::High, 0.95));
        } else if bmi.value >= 25.0 {
            out.push(Condition::from_metric("Overweight", MetricKind::Bmi, Severity::Medium, 0.95));
        }
    }

    out
}

/// Lowercased phrases after "diagnosed with" and friends that mention a
/// known condition, deduplicated by exact text in first-seen order.
pub fn text_conditions(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for pattern in CONDITION_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let phrase = collapse_whitespace(&caps[1].to_lowercase());
            if phrase.is_empty() || out.contains(&phrase) {
                continue;
            }
            if KNOWN_CONDITIONS.iter().any(|known| phrase.contains(known)) {
                out.push(phrase);
            }
        }
    }
    out
}

pub fn medications(text: &str) -> Vec<Medication> {
    let mut out = Vec::new();

    for caps in LABELED_MEDICATION.captures_iter(text) {
        // frequency is whatever follows the dose on the same line
        let frequency = caps.get(3).map_or("", |m| m.as_str().trim());
        out.push(Medication {
            name: caps[1].to_string(),
            dosage: caps[2].to_string(),
            frequency: if frequency.is_empty() {
                NOT_SPECIFIED.to_string()
            } else {
                frequency.to_string()
            },
            confidence: MEDICATION_CONFIDENCE,
        });
    }

    for caps in TAKING_MEDICATION.captures_iter(text) {
        out.push(Medication {
            name: caps[1].to_string(),
            dosage: caps
                .get(2)
                .map_or_else(|| NOT_SPECIFIED.to_string(), |m| m.as_str().to_string()),
            frequency: NOT_SPECIFIED.to_string(),
            confidence: MEDICATION_CONFIDENCE,
        });
    }

    out
}

pub fn symptoms(text: &str) -> Vec<Symptom> {
    let lower = text.to_lowercase();
    SYMPTOM_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| Symptom {
            name: kw.to_string(),
            confidence: SYMPTOM_CONFIDENCE,
        })
        .collect()
}

pub fn doctor_notes(text: &str) -> Vec<String> {
    NOTE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .map(|caps| caps[1].trim().to_string())
        .filter(|note| !note.is_empty())
        .collect()
}

/// Word preceding comparative language. Passes run increase, decrease,
/// stable; a token seen again later overwrites its earlier direction.
pub fn trends(text: &str) -> BTreeMap<String, Trend> {
    let mut out = BTreeMap::new();
    for (pattern, trend) in TREND_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            out.insert(caps[1].to_string(), *trend);
        }
    }
    out
}

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    Height,
    Weight,
    BloodPressure,
    SugarLevel,
    Cholesterol,
    HeartRate,
    Bmi,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Height => "height",
            MetricKind::Weight => "weight",
            MetricKind::BloodPressure => "bloodPressure",
            MetricKind::SugarLevel => "sugarLevel",
            MetricKind::Cholesterol => "cholesterol",
            MetricKind::HeartRate => "heartRate",
            MetricKind::Bmi => "bmi",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

impl Measurement {
    fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BpStatus {
    Normal,
    Elevated,
    #[serde(rename = "High BP Stage 1")]
    Stage1,
    #[serde(rename = "High BP Stage 2")]
    Stage2,
    #[serde(rename = "Hypertensive Crisis")]
    Crisis,
}

impl BpStatus {
    /// Checked top to bottom, first match wins.
    pub fn classify(systolic: u32, diastolic: u32) -> Self {
        if systolic < 120 && diastolic < 80 {
            BpStatus::Normal
        } else if systolic < 130 && diastolic < 80 {
            BpStatus::Elevated
        } else if systolic < 140 || diastolic < 90 {
            BpStatus::Stage1
        } else if systolic < 180 || diastolic < 120 {
            BpStatus::Stage2
        } else {
            BpStatus::Crisis
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BpStatus::Normal => "Normal",
            BpStatus::Elevated => "Elevated",
            BpStatus::Stage1 => "High BP Stage 1",
            BpStatus::Stage2 => "High BP Stage 2",
            BpStatus::Crisis => "Hypertensive Crisis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlucoseStatus {
    Normal,
    #[serde(rename = "Pre-diabetes")]
    PreDiabetes,
    Diabetes,
}

impl GlucoseStatus {
    pub fn classify(mg_dl: f64) -> Self {
        if mg_dl < 100.0 {
            GlucoseStatus::Normal
        } else if mg_dl < 126.0 {
            GlucoseStatus::PreDiabetes
        } else {
            GlucoseStatus::Diabetes
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GlucoseStatus::Normal => "Normal",
            GlucoseStatus::PreDiabetes => "Pre-diabetes",
            GlucoseStatus::Diabetes => "Diabetes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiStatus {
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiStatus::Underweight
        } else if bmi < 25.0 {
            BmiStatus::Normal
        } else if bmi < 30.0 {
            BmiStatus::Overweight
        } else {
            BmiStatus::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiStatus::Underweight => "Underweight",
            BmiStatus::Normal => "Normal",
            BmiStatus::Overweight => "Overweight",
            BmiStatus::Obese => "Obese",
        }
    }
}

macro_rules! display_label {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}
display_label!(BpStatus, GlucoseStatus, BmiStatus);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u32,
    pub diastolic: u32,
    pub status: BpStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseReading {
    pub value: f64,
    pub unit: String,
    pub status: GlucoseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bmi {
    pub value: f64,
    pub status: BmiStatus,
}

impl Bmi {
    /// `round(weight / height_m², 1)`; status follows the rounded value.
    pub fn compute(height_cm: f64, weight_kg: f64) -> Self {
        let height_m = height_cm / 100.0;
        let value = round_to(weight_kg / (height_m * height_m), 1);
        Self {
            value,
            status: BmiStatus::classify(value),
        }
    }
}

/// Metrics recovered from one transcript. Absent fields had no valid match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_level: Option<GlucoseReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<Bmi>,
}

impl HealthMetrics {
    pub fn kinds(&self) -> Vec<MetricKind> {
        let mut out = Vec::new();
        if self.height.is_some() {
            out.push(MetricKind::Height);
        }
        if self.weight.is_some() {
            out.push(MetricKind::Weight);
        }
        if self.blood_pressure.is_some() {
            out.push(MetricKind::BloodPressure);
        }
        if self.sugar_level.is_some() {
            out.push(MetricKind::SugarLevel);
        }
        if self.cholesterol.is_some() {
            out.push(MetricKind::Cholesterol);
        }
        if self.heart_rate.is_some() {
            out.push(MetricKind::HeartRate);
        }
        if self.bmi.is_some() {
            out.push(MetricKind::Bmi);
        }
        out
    }

    pub fn count(&self) -> usize {
        self.kinds().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

type Normalizer<T> = fn(&Captures<'_>) -> Option<T>;

/// Receives the remainder of the line after a candidate match; `false`
/// skips that candidate and the search continues further along the text.
type Guard = fn(&str) -> bool;

struct Rule<T> {
    regex: Regex,
    normalize: Normalizer<T>,
    guard: Option<Guard>,
}

impl<T> Rule<T> {
    fn new(pattern: &str, normalize: Normalizer<T>) -> Self {
        Self {
            regex: Regex::new(&format!("(?i){pattern}")).expect("invalid metric pattern"),
            normalize,
            guard: None,
        }
    }

    fn guarded(pattern: &str, normalize: Normalizer<T>, guard: Guard) -> Self {
        Self {
            guard: Some(guard),
            ..Self::new(pattern, normalize)
        }
    }

    fn first_match<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.regex.captures_iter(text).find(|caps| match self.guard {
            Some(guard) => {
                let end = caps.get(0).map_or(text.len(), |m| m.end());
                guard(rest_of_line(text, end))
            }
            None => true,
        })
    }
}

/// Ordered patterns for one metric plus its plausibility predicate.
/// The first pattern whose first match normalises to a plausible value
/// wins; later patterns are not consulted.
struct RuleSet<T> {
    kind: MetricKind,
    plausible: fn(&T) -> bool,
    rules: Vec<Rule<T>>,
}

impl<T: Copy + fmt::Debug> RuleSet<T> {
    fn first_valid(&self, text: &str) -> Option<T> {
        for (idx, rule) in self.rules.iter().enumerate() {
            let Some(caps) = rule.first_match(text) else {
                continue;
            };
            let Some(value) = (rule.normalize)(&caps) else {
                continue;
            };
            if (self.plausible)(&value) {
                debug!(metric = %self.kind, rule = idx, ?value, "metric matched");
                return Some(value);
            }
            debug!(metric = %self.kind, rule = idx, ?value, "discarding implausible value");
        }
        None
    }
}

fn rest_of_line(text: &str, from: usize) -> &str {
    let rest = &text[from..];
    rest.split(['\n', '\r']).next().unwrap_or("")
}

fn number(caps: &Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group)?.as_str().parse::<f64>().ok()
}

fn integer(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse::<u32>().ok()
}

fn unit_is(caps: &Captures<'_>, group: usize, units: &[&str]) -> bool {
    caps.get(group)
        .map(|m| units.iter().any(|u| m.as_str().eq_ignore_ascii_case(u)))
        .unwrap_or(false)
}

fn first_number(caps: &Captures<'_>) -> Option<f64> {
    number(caps, 1)
}

fn feet_inches(caps: &Captures<'_>) -> Option<f64> {
    let feet = number(caps, 1)?;
    let inches = number(caps, 2).unwrap_or(0.0);
    Some(feet * 30.48 + inches * 2.54)
}

fn weight_kg(caps: &Captures<'_>) -> Option<f64> {
    let value = number(caps, 1)?;
    if unit_is(caps, 2, &["lbs", "pounds"]) {
        Some(value * 0.453592)
    } else {
        Some(value)
    }
}

fn glucose_mg_dl(caps: &Captures<'_>) -> Option<f64> {
    let value = number(caps, 1)?;
    if unit_is(caps, 2, &["mmol/l"]) {
        Some(value * 18.0182)
    } else {
        Some(value)
    }
}

fn pressure_pair(caps: &Captures<'_>) -> Option<(u32, u32)> {
    Some((integer(caps, 1)?, integer(caps, 2)?))
}

fn no_cholesterol_after(rest: &str) -> bool {
    !rest.to_ascii_lowercase().contains("cholesterol")
}

fn no_digit_after(rest: &str) -> bool {
    !rest.bytes().any(|b| b.is_ascii_digit())
}

static HEIGHT: LazyLock<RuleSet<f64>> = LazyLock::new(|| RuleSet {
    kind: MetricKind::Height,
    plausible: |cm| (50.0..=250.0).contains(cm),
    rules: vec![
        Rule::new(r"height\s*[:\s]+\s*(\d+\.?\d*)\s*(?:cm|centimeter)", first_number),
        Rule::new(r#"height\s*[:\s]+\s*(\d+)\s*['′’]\s*(\d+)?\s*(?:"|″|”|'')?"#, feet_inches),
        Rule::guarded(r"(\d+\.?\d*)\s*(?:cm|centimeter)", first_number, no_cholesterol_after),
    ],
});

static WEIGHT: LazyLock<RuleSet<f64>> = LazyLock::new(|| RuleSet {
    kind: MetricKind::Weight,
    plausible: |kg| (20.0..=300.0).contains(kg),
    rules: vec![
        Rule::new(r"weight\s*[:\s]+\s*(\d+\.?\d*)\s*(kg|kilogram|lbs|pounds)", weight_kg),
        Rule::guarded(r"(\d+\.?\d*)\s*(kg|kilogram)", weight_kg, no_digit_after),
    ],
});

static BLOOD_PRESSURE: LazyLock<RuleSet<(u32, u32)>> = LazyLock::new(|| RuleSet {
    kind: MetricKind::BloodPressure,
    plausible: |&(sys, dia)| (60..=300).contains(&sys) && (30..=200).contains(&dia),
    rules: vec![
        Rule::new(r"blood\s*pressure[:\s]+(\d+)\s*/\s*(\d+)", pressure_pair),
        Rule::new(r"\bbp[:\s]+(\d+)\s*/\s*(\d+)", pressure_pair),
        Rule::new(r"(\d+)\s*/\s*(\d+)\s*mmhg", pressure_pair),
    ],
});

static SUGAR_LEVEL: LazyLock<RuleSet<f64>> = LazyLock::new(|| RuleSet {
    kind: MetricKind::SugarLevel,
    plausible: |mg| (50.0..=500.0).contains(mg),
    rules: vec![
        Rule::new(
            r"blood\s*sugar\s*\(?\s*fasting\s*\)?\s*[:\s]+\s*(\d+\.?\d*)\s*(mg/dl|mmol/l)?",
            glucose_mg_dl,
        ),
        Rule::new(
            r"(?:blood\s*sugar|sugar\s*level)\s*(?:\([^)]*\))?\s*[:\s]+\s*(\d+\.?\d*)\s*(mg/dl|mmol/l)?",
            glucose_mg_dl,
        ),
        Rule::new(
            r"fasting\s*(?:blood\s*)?glucose\s*[:\s]+\s*(\d+\.?\d*)\s*(mg/dl|mmol/l)?",
            glucose_mg_dl,
        ),
        Rule::new(r"glucose\s*[:\s]+\s*(\d+\.?\d*)\s*(mg/dl|mmol/l)?", glucose_mg_dl),
        Rule::new(r"(\d+\.?\d*)\s*mg/dl\s*(?:glucose|sugar)", glucose_mg_dl),
    ],
});

static CHOLESTEROL: LazyLock<RuleSet<f64>> = LazyLock::new(|| RuleSet {
    kind: MetricKind::Cholesterol,
    plausible: |mg| (100.0..=400.0).contains(mg),
    rules: vec![
        Rule::new(r"cholesterol\s*\(?\s*total\s*\)?\s*[:\s]+\s*(\d+\.?\d*)", first_number),
        Rule::new(r"total\s*cholesterol\s*[:\s]+\s*(\d+\.?\d*)", first_number),
        Rule::new(r"cholesterol\s*[:\s]+\s*(\d+\.?\d*)", first_number),
        Rule::new(r"(\d+\.?\d*)\s*mg/dl\s*cholesterol", first_number),
    ],
});

static HEART_RATE: LazyLock<RuleSet<f64>> = LazyLock::new(|| RuleSet {
    kind: MetricKind::HeartRate,
    plausible: |bpm| (30.0..=220.0).contains(bpm),
    rules: vec![
        Rule::new(r"heart\s*rate\s*[:\s]+\s*(\d+)", first_number),
        Rule::new(r"pulse\s*(?:rate)?\s*[:\s]+\s*(\d+)", first_number),
        Rule::new(r"(\d+)\s*beats?\s*per\s*minute", first_number),
        Rule::new(r"(\d+)\s*bpm", first_number),
    ],
});

/// Scans a transcript for the fixed metric vocabulary. Pure: the same text
/// always yields the same metrics.
pub fn extract(text: &str) -> HealthMetrics {
    let height = HEIGHT
        .first_valid(text)
        .map(|cm| Measurement::new(cm.round(), "cm"));
    let weight = WEIGHT
        .first_valid(text)
        .map(|kg| Measurement::new(kg.round(), "kg"));
    let blood_pressure = BLOOD_PRESSURE
        .first_valid(text)
        .map(|(systolic, diastolic)| BloodPressure {
            systolic,
            diastolic,
            status: BpStatus::classify(systolic, diastolic),
        });
    let sugar_level = SUGAR_LEVEL.first_valid(text).map(|mg| {
        let value = mg.round();
        GlucoseReading {
            value,
            unit: "mg/dL".into(),
            status: GlucoseStatus::classify(value),
        }
    });
    let cholesterol = CHOLESTEROL
        .first_valid(text)
        .map(|mg| Measurement::new(mg, "mg/dL"));
    let heart_rate = HEART_RATE
        .first_valid(text)
        .map(|bpm| Measurement::new(bpm, "bpm"));

    let bmi = match (&height, &weight) {
        (Some(h), Some(w)) => Some(Bmi::compute(h.value, w.value)),
        _ => None,
    };

    HealthMetrics {
        height,
        weight,
        blood_pressure,
        sugar_level,
        cholesterol,
        heart_rate,
        bmi,
    }
}

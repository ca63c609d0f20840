use medscan::config::Config;
use medscan::metrics::extract as extract_metrics;
use medscan::recommend::generate;
use medscan::relations::{self, Condition, Relations};
use medscan::analyze_transcript;

const HYDRATION: &str = "Stay hydrated - drink 8 glasses of water daily";

fn recommend(text: &str) -> medscan::recommend::Recommendations {
    let metrics = extract_metrics(text);
    let relations = relations::extract(text, &metrics);
    generate(&metrics, &relations)
}

#[test]
fn healthy_report_gets_all_clear_summary() {
    let rec = recommend("Height: 175cm Weight: 75kg Blood Pressure: 118/76mmHg Sugar Level: 95mg/dL");

    assert_eq!(
        rec.summary,
        [
            "Your BMI is 24.5 (Normal)",
            "✓ Blood pressure is healthy (118/76 mmHg)",
            "✓ Blood sugar level is normal (95 mg/dL)",
            "✓ Your weight is in the healthy range",
        ]
    );
    let goal = rec.walking_goal.unwrap();
    assert_eq!(goal.steps, 10000);
    assert_eq!(
        goal.description,
        "Regular walking helps maintain cardiovascular health and weight management"
    );
    assert!(rec.medical.is_empty());
    assert_eq!(rec.diet.last().map(String::as_str), Some(HYDRATION));
}

#[test]
fn diastolic_eighty_lands_in_monitoring_tier() {
    let text = "Height: 175cm Weight: 75kg Blood Pressure: 120/80mmHg Sugar Level: 95mg/dL";
    let result = analyze_transcript(&Config::default(), text).unwrap();
    let rec = &result.recommendations;

    assert!(!rec.summary.iter().any(|s| s.contains("Blood pressure is healthy")));
    assert!(rec
        .medical
        .contains(&"Monitor your blood pressure weekly (current reading 120/80 mmHg)".to_string()));
    assert_eq!(rec.walking_goal.as_ref().unwrap().steps, 10000);
    assert!(result.relations.conditions.is_empty());
    assert_eq!(result.confidence, 0.9);
}

#[test]
fn high_risk_report() {
    let text = "Height: 160 cm\nWeight: 82 kg\nBlood Pressure: 150/95 mmHg\nFasting Glucose: 130 mg/dL";
    let rec = recommend(text);

    assert_eq!(rec.walking_goal.as_ref().unwrap().steps, 15000);
    assert!(rec.medical.contains(
        &"Blood sugar of 130 mg/dL is in the diabetic range - start a diabetes management plan with your doctor"
            .to_string()
    ));
    assert!(rec.medical.contains(
        &"Blood pressure of 150/95 mmHg (High BP Stage 2) - review blood pressure medication with your doctor"
            .to_string()
    ));
    assert!(rec
        .diet
        .contains(&"Limit sodium to less than 1500mg per day - your blood pressure is 150/95 mmHg".to_string()));

    // Follow-ups come last, one per condition, in condition order.
    let tail = &rec.medical[rec.medical.len() - 3..];
    assert_eq!(
        tail,
        [
            "Consult an endocrinologist for diabetes management",
            "Consult a cardiologist for blood pressure management",
            "Discuss weight management options with your doctor",
        ]
    );

    // Critical readings skip the baseline advice.
    assert!(!rec
        .exercise
        .contains(&"150 minutes of moderate aerobic activity per week".to_string()));
    assert_eq!(rec.diet.last().map(String::as_str), Some(HYDRATION));
}

#[test]
fn crisis_halts_exercise_and_skips_baseline_diet() {
    let rec = recommend("Blood Pressure: 185/125 mmHg");

    assert_eq!(
        rec.exercise,
        ["⚠ Stop all strenuous exercise until your blood pressure is under control"]
    );
    assert!(rec.medical[0].starts_with("URGENT: Blood pressure of 185/125 mmHg"));
    assert_eq!(rec.diet, [HYDRATION]);
    assert!(rec.walking_goal.is_none());
}

#[test]
fn sparse_report_gets_baseline_advice() {
    let rec = recommend("Pulse: 72 bpm");

    assert_eq!(
        rec.exercise,
        [
            "150 minutes of moderate aerobic activity per week",
            "Strength training at least 2 days per week",
        ]
    );
    assert_eq!(rec.diet.len(), 3);
    assert_eq!(rec.diet[2], HYDRATION);
    assert!(rec.walking_goal.is_none());
    assert!(rec.summary.is_empty());
}

#[test]
fn baseline_fills_exercise_and_diet_independently() {
    // High cholesterol writes diet lines but no exercise.
    let rec = recommend("Cholesterol: 250 mg/dL");

    assert_eq!(rec.exercise.len(), 2);
    assert_eq!(
        rec.diet,
        [
            "Keep saturated fat below 7% of daily calories",
            "Eat omega-3 rich foods such as salmon, walnuts and flaxseed",
            HYDRATION,
        ]
    );
    assert_eq!(
        rec.medical,
        ["Request a full lipid panel and discuss cholesterol management with your doctor"]
    );
}

#[test]
fn borderline_cholesterol_is_a_summary_note() {
    let rec = recommend("Cholesterol: 220 mg/dL");
    assert_eq!(
        rec.summary,
        ["Cholesterol of 220 mg/dL is borderline high - limit fried and processed foods"]
    );
}

#[test]
fn fast_heart_rate() {
    let rec = recommend("Heart rate: 110 bpm");
    assert!(rec.medical[0].starts_with("Heart rate of 110 bpm is elevated"));
    assert_eq!(
        rec.exercise,
        ["Start slowly with light activity and increase intensity gradually"]
    );
}

#[test]
fn slow_heart_rate() {
    let rec = recommend("Heart rate: 52 bpm");
    assert_eq!(rec.summary.len(), 1);
    assert!(rec.summary[0].starts_with("Resting heart rate of 52 bpm is low"));
}

#[test]
fn pre_diabetes_tier() {
    let rec = recommend("Blood Sugar: 110 mg/dL");
    assert_eq!(rec.summary, ["⚠ Blood sugar of 110 mg/dL indicates pre-diabetes"]);
    assert!(rec
        .medical
        .contains(&"Recheck fasting blood sugar every 3-6 months".to_string()));
    assert!(rec.medical.contains(
        &"Schedule a follow-up with your doctor to prevent progression to diabetes".to_string()
    ));
}

#[test]
fn bmi_tiers_set_walking_goal() {
    let cases = [
        ("Height: 180 cm Weight: 55 kg", 8000),
        ("Height: 175 cm Weight: 75 kg", 10000),
        ("Height: 170 cm Weight: 78 kg", 12000),
        ("Height: 160 cm Weight: 82 kg", 15000),
    ];
    for (text, steps) in cases {
        let rec = recommend(text);
        assert_eq!(rec.walking_goal.unwrap().steps, steps, "{text}");
    }
}

#[test]
fn follow_ups_are_one_per_condition_name() {
    let diabetes = Condition {
        name: "Diabetes".to_string(),
        severity: None,
        confidence: 0.9,
        related_metric: None,
        source: None,
    };
    let asthma = Condition {
        name: "asthma".to_string(),
        ..diabetes.clone()
    };
    let relations = Relations {
        conditions: vec![diabetes.clone(), asthma, diabetes],
        ..Default::default()
    };

    let rec = generate(&Default::default(), &relations);
    assert_eq!(
        rec.medical,
        [
            "Consult an endocrinologist for diabetes management",
            "Follow up with your doctor about asthma",
        ]
    );
}

#[test]
fn walking_goal_serializes_as_null_when_absent() {
    let rec = recommend("Pulse: 72 bpm");
    let v = serde_json::to_value(&rec).unwrap();
    assert!(v["walkingGoal"].is_null());
    assert!(v["exercise"].is_array());
}

#[test]
fn medication_review_names_the_classified_stage() {
    for (text, label) in [
        ("BP: 145/85", "145/85 mmHg (High BP Stage 1)"),
        ("BP: 130/95", "130/95 mmHg (High BP Stage 1)"),
        ("BP: 150/95", "150/95 mmHg (High BP Stage 2)"),
    ] {
        let rec = recommend(text);
        assert_eq!(
            rec.medical[0],
            format!("Blood pressure of {label} - review blood pressure medication with your doctor"),
            "{text}"
        );
    }
}

#[test]
fn urgent_line_names_the_classified_stage() {
    let rec = recommend("BP: 185/100");
    assert_eq!(
        rec.medical[0],
        "URGENT: Blood pressure of 185/100 mmHg (High BP Stage 2) is dangerously high - seek emergency medical care immediately"
    );
}

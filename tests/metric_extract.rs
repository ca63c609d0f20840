use medscan::metrics::{extract, Bmi, BmiStatus, BpStatus, GlucoseStatus};

#[test]
fn bp_status_boundaries() {
    let cases = [
        (119, 79, BpStatus::Normal),
        (120, 79, BpStatus::Elevated),
        (129, 79, BpStatus::Elevated),
        (130, 79, BpStatus::Stage1),
        (139, 89, BpStatus::Stage1),
        (120, 80, BpStatus::Stage1),
        (140, 90, BpStatus::Stage2),
        (179, 119, BpStatus::Stage2),
        (180, 120, BpStatus::Crisis),
    ];
    for (sys, dia, want) in cases {
        assert_eq!(BpStatus::classify(sys, dia), want, "{sys}/{dia}");
    }
}

#[test]
fn glucose_status_boundaries() {
    assert_eq!(GlucoseStatus::classify(99.0), GlucoseStatus::Normal);
    assert_eq!(GlucoseStatus::classify(100.0), GlucoseStatus::PreDiabetes);
    assert_eq!(GlucoseStatus::classify(125.0), GlucoseStatus::PreDiabetes);
    assert_eq!(GlucoseStatus::classify(126.0), GlucoseStatus::Diabetes);
}

#[test]
fn bmi_status_boundaries() {
    assert_eq!(BmiStatus::classify(18.4), BmiStatus::Underweight);
    assert_eq!(BmiStatus::classify(18.5), BmiStatus::Normal);
    assert_eq!(BmiStatus::classify(24.9), BmiStatus::Normal);
    assert_eq!(BmiStatus::classify(25.0), BmiStatus::Overweight);
    assert_eq!(BmiStatus::classify(29.9), BmiStatus::Overweight);
    assert_eq!(BmiStatus::classify(30.0), BmiStatus::Obese);
}

#[test]
fn bmi_from_height_and_weight() {
    let bmi = Bmi::compute(175.0, 75.0);
    assert_eq!(bmi.value, 24.5);
    assert_eq!(bmi.status, BmiStatus::Normal);

    let bmi = Bmi::compute(160.0, 82.0);
    assert_eq!(bmi.value, 32.0);
    assert_eq!(bmi.status, BmiStatus::Obese);
}

#[test]
fn labeled_report_extracts_all_fields() {
    let text = "Height: 175cm Weight: 75kg Blood Pressure: 120/80mmHg Sugar Level: 95mg/dL";
    let m = extract(text);

    assert_eq!(m.height.as_ref().unwrap().value, 175.0);
    assert_eq!(m.height.as_ref().unwrap().unit, "cm");
    assert_eq!(m.weight.as_ref().unwrap().value, 75.0);

    let bp = m.blood_pressure.as_ref().unwrap();
    assert_eq!((bp.systolic, bp.diastolic), (120, 80));
    assert_eq!(bp.status, BpStatus::Stage1);

    let sugar = m.sugar_level.as_ref().unwrap();
    assert_eq!(sugar.value, 95.0);
    assert_eq!(sugar.unit, "mg/dL");
    assert_eq!(sugar.status, GlucoseStatus::Normal);

    let bmi = m.bmi.as_ref().unwrap();
    assert_eq!(bmi.value, 24.5);
    assert_eq!(bmi.status, BmiStatus::Normal);

    assert!(m.cholesterol.is_none());
    assert!(m.heart_rate.is_none());
    assert_eq!(m.count(), 5);
}

#[test]
fn implausible_height_is_discarded() {
    assert!(extract("Height: 400 cm").height.is_none());
    assert_eq!(extract("Height: 175 cm").height.unwrap().value, 175.0);
}

#[test]
fn feet_and_inches_convert_to_cm() {
    let m = extract("Height: 5'9\"");
    assert_eq!(m.height.unwrap().value, 175.0);

    let m = extract("Height: 6'");
    assert_eq!(m.height.unwrap().value, 183.0);
}

#[test]
fn bare_height_skips_cholesterol_lines() {
    let m = extract("180 cm on cholesterol panel\nStanding 172 cm");
    assert_eq!(m.height.unwrap().value, 172.0);

    assert!(extract("value 180 cm cholesterol").height.is_none());
}

#[test]
fn pounds_convert_to_kg() {
    let m = extract("Weight: 165 lbs");
    assert_eq!(m.weight.unwrap().value, 75.0);
}

#[test]
fn bare_weight_requires_no_trailing_digits() {
    assert_eq!(extract("Patient weighs 80 kg").weight.unwrap().value, 80.0);
    assert!(extract("Patient weighs 80 kg at visit 2").weight.is_none());
}

#[test]
fn mmol_glucose_converts_and_rounds() {
    let m = extract("Fasting Glucose: 7.2 mmol/L");
    let sugar = m.sugar_level.unwrap();
    assert_eq!(sugar.value, 130.0);
    assert_eq!(sugar.status, GlucoseStatus::Diabetes);
}

#[test]
fn glucose_status_follows_the_rounded_value() {
    let sugar = extract("Blood Sugar: 125.6 mg/dL").sugar_level.unwrap();
    assert_eq!(sugar.value, 126.0);
    assert_eq!(sugar.status, GlucoseStatus::Diabetes);

    let sugar = extract("Blood Sugar: 99.4 mg/dL").sugar_level.unwrap();
    assert_eq!(sugar.value, 99.0);
    assert_eq!(sugar.status, GlucoseStatus::Normal);
}

#[test]
fn labeled_glucose_wins_over_trailing_form() {
    let m = extract("Note: 95 mg/dL glucose last year.\nBlood Sugar: 110 mg/dL");
    let sugar = m.sugar_level.unwrap();
    assert_eq!(sugar.value, 110.0);
    assert_eq!(sugar.status, GlucoseStatus::PreDiabetes);
}

#[test]
fn sugar_level_qualifier_does_not_reach_other_lines() {
    let m = extract("Blood Sugar (Random): 140 mg/dL\nCholesterol: 180");
    assert_eq!(m.sugar_level.unwrap().value, 140.0);

    let m = extract("Sugar Level: 95mg/dL\nCholesterol: 180");
    assert_eq!(m.sugar_level.unwrap().value, 95.0);
    assert_eq!(m.cholesterol.unwrap().value, 180.0);
}

#[test]
fn blood_pressure_variants() {
    let bp = extract("BP: 150/95").blood_pressure.unwrap();
    assert_eq!((bp.systolic, bp.diastolic), (150, 95));
    assert_eq!(bp.status, BpStatus::Stage2);

    let bp = extract("Reading 118 / 76 mmHg").blood_pressure.unwrap();
    assert_eq!((bp.systolic, bp.diastolic), (118, 76));
    assert_eq!(bp.status, BpStatus::Normal);
}

#[test]
fn cholesterol_variants() {
    assert_eq!(
        extract("Total Cholesterol: 245 mg/dL").cholesterol.unwrap().value,
        245.0
    );
    assert_eq!(
        extract("Lipids 210 mg/dl cholesterol").cholesterol.unwrap().value,
        210.0
    );
    assert!(extract("Cholesterol: 90 mg/dL").cholesterol.is_none());
}

#[test]
fn heart_rate_variants() {
    assert_eq!(extract("Pulse: 72 bpm").heart_rate.unwrap().value, 72.0);
    assert_eq!(extract("Heart Rate: 64").heart_rate.unwrap().value, 64.0);
    assert_eq!(
        extract("resting at 58 beats per minute").heart_rate.unwrap().value,
        58.0
    );
    assert!(extract("Heart rate 250 bpm").heart_rate.is_none());
}

#[test]
fn bmi_needs_both_height_and_weight() {
    let m = extract("Height: 175 cm");
    assert!(m.height.is_some());
    assert!(m.bmi.is_none());
}

#[test]
fn extraction_is_idempotent() {
    let text = "Height: 170 cm\nWeight: 92 kg\nBP 145/92\nGlucose: 101\nPulse: 88 bpm";
    assert_eq!(extract(text), extract(text));
}

#[test]
fn absent_metrics_are_omitted_from_json() {
    let m = extract("Pulse: 72 bpm");
    let v = serde_json::to_value(&m).unwrap();
    let obj = v.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert!(obj.contains_key("heartRate"));
}

#[test]
fn statuses_serialize_as_labels() {
    let m = extract("Blood Pressure: 135/85 Sugar Level: 110 mg/dL");
    let v = serde_json::to_value(&m).unwrap();
    assert_eq!(v["bloodPressure"]["status"], "High BP Stage 1");
    assert_eq!(v["sugarLevel"]["status"], "Pre-diabetes");
}

#[test]
fn empty_text_has_no_metrics() {
    assert!(extract("no measurements here").is_empty());
}

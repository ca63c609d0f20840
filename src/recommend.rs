use crate::metrics::{BmiStatus, HealthMetrics};
use crate::relations::Relations;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkingGoal {
    pub steps: u32,
    pub description: String,
}

/// Advice lists are not deduplicated; a rule that fires twice appends twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub exercise: Vec<String>,
    pub diet: Vec<String>,
    pub walking_goal: Option<WalkingGoal>,
    pub medical: Vec<String>,
    pub summary: Vec<String>,
}

impl Recommendations {
    fn set_walking_goal(&mut self, steps: u32, description: &str) {
        self.walking_goal = Some(WalkingGoal {
            steps,
            description: description.to_string(),
        });
    }
}

/// Runs the rule cascade in its fixed order.
pub fn generate(metrics: &HealthMetrics, relations: &Relations) -> Recommendations {
    let mut rec = Recommendations::default();

    bmi_summary(metrics, &mut rec);
    blood_pressure_tier(metrics, &mut rec);
    glucose_tier(metrics, &mut rec);
    bmi_tier(metrics, &mut rec);
    heart_rate_notes(metrics, &mut rec);
    cholesterol_notes(metrics, &mut rec);
    baseline_fallback(metrics, &mut rec);
    rec.diet
        .push("Stay hydrated - drink 8 glasses of water daily".to_string());
    condition_follow_ups(relations, &mut rec);

    rec
}

fn bmi_summary(metrics: &HealthMetrics, rec: &mut Recommendations) {
    if let Some(bmi) = &metrics.bmi {
        rec.summary
            .push(format!("Your BMI is {:.1} ({})", bmi.value, bmi.status));
    }
}

fn blood_pressure_tier(metrics: &HealthMetrics, rec: &mut Recommendations) {
    let Some(bp) = &metrics.blood_pressure else {
        return;
    };
    let (s, d) = (bp.systolic, bp.diastolic);

    if s >= 180 || d >= 120 {
        rec.exercise.push(
            "⚠ Stop all strenuous exercise until your blood pressure is under control".to_string(),
        );
        rec.medical.push(format!(
            "URGENT: Blood pressure of {s}/{d} mmHg ({}) is dangerously high - seek emergency medical care immediately",
            bp.status
        ));
    } else if s >= 140 || d >= 90 {
        rec.exercise.push(format!(
            "Moderate cardio (brisk walking, cycling) 30 minutes a day, 5 days a week to help lower your {s}/{d} mmHg blood pressure"
        ));
        rec.diet.push(format!(
            "Limit sodium to less than 1500mg per day - your blood pressure is {s}/{d} mmHg"
        ));
        rec.diet.push(
            "Follow the DASH diet: fruits, vegetables, whole grains and low-fat dairy".to_string(),
        );
        rec.medical.push(format!(
            "Blood pressure of {s}/{d} mmHg ({}) - review blood pressure medication with your doctor",
            bp.status
        ));
    } else if s >= 130 || d >= 80 {
        rec.exercise.push(
            "30-45 minutes of moderate cardio 5 days a week to bring blood pressure down"
                .to_string(),
        );
        rec.diet
            .push("Reduce sodium intake to less than 2000mg per day".to_string());
        rec.medical.push(format!(
            "Monitor your blood pressure weekly (current reading {s}/{d} mmHg)"
        ));
    } else {
        rec.exercise.push(
            "Maintain your current activity level to keep blood pressure healthy".to_string(),
        );
        rec.summary
            .push(format!("✓ Blood pressure is healthy ({s}/{d} mmHg)"));
    }
}

fn glucose_tier(metrics: &HealthMetrics, rec: &mut Recommendations) {
    let Some(sugar) = &metrics.sugar_level else {
        return;
    };
    let v = sugar.value;

    if v >= 126.0 {
        rec.diet.push(
            "Strictly limit carbohydrates and choose low glycemic index foods".to_string(),
        );
        rec.diet
            .push("Eliminate sugary drinks, sweets and refined sugar".to_string());
        rec.diet
            .push("Eat smaller, frequent meals to keep blood sugar stable".to_string());
        rec.exercise
            .push("Take a 10-15 minute walk after each meal to lower blood sugar".to_string());
        rec.medical.push(format!(
            "Blood sugar of {v} mg/dL is in the diabetic range - start a diabetes management plan with your doctor"
        ));
        rec.medical
            .push("Get an HbA1c test and a referral to an endocrinologist".to_string());
    } else if v >= 100.0 {
        rec.summary
            .push(format!("⚠ Blood sugar of {v} mg/dL indicates pre-diabetes"));
        rec.diet
            .push("Switch to whole grains and high-fiber foods".to_string());
        rec.exercise.push(
            "Increase physical activity to at least 150 minutes per week to improve insulin sensitivity"
                .to_string(),
        );
        rec.medical
            .push("Recheck fasting blood sugar every 3-6 months".to_string());
    } else {
        rec.summary
            .push(format!("✓ Blood sugar level is normal ({v} mg/dL)"));
    }
}

/// Tiers are mutually exclusive, so exactly one writes the walking goal.
fn bmi_tier(metrics: &HealthMetrics, rec: &mut Recommendations) {
    let Some(bmi) = &metrics.bmi else {
        return;
    };

    match bmi.status {
        BmiStatus::Obese => {
            rec.exercise.push(
                "Start with gradual low-impact walking and build up over several weeks"
                    .to_string(),
            );
            rec.exercise
                .push("Try water aerobics or swimming to protect your joints".to_string());
            rec.diet
                .push("Aim for a calorie deficit of 500-750 calories per day".to_string());
            rec.set_walking_goal(15000, "Work up to 15,000 steps a day to support weight loss");
            rec.medical.push(
                "Ask your doctor about a supervised weight management program".to_string(),
            );
        }
        BmiStatus::Overweight => {
            rec.exercise
                .push("45 minutes of moderate exercise most days of the week".to_string());
            rec.diet
                .push("Practice portion control and avoid eating late at night".to_string());
            rec.set_walking_goal(12000, "Increase daily steps to help with weight management");
        }
        BmiStatus::Underweight => {
            rec.exercise
                .push("Strength training 2-3 times per week to build muscle mass".to_string());
            rec.diet.push(
                "Increase calorie intake with nutrient-dense foods (nuts, avocados, whole grains)"
                    .to_string(),
            );
            rec.set_walking_goal(8000, "Moderate daily walking while you build strength");
            rec.medical
                .push("Consult a nutritionist for a healthy weight gain plan".to_string());
        }
        BmiStatus::Normal => {
            rec.set_walking_goal(
                10000,
                "Regular walking helps maintain cardiovascular health and weight management",
            );
            rec.summary
                .push("✓ Your weight is in the healthy range".to_string());
        }
    }
}

fn heart_rate_notes(metrics: &HealthMetrics, rec: &mut Recommendations) {
    let Some(hr) = &metrics.heart_rate else {
        return;
    };
    let bpm = hr.value;

    if bpm > 100.0 {
        rec.medical.push(format!(
            "Heart rate of {bpm} bpm is elevated - get a cardiac evaluation before starting intense exercise"
        ));
        rec.exercise.push(
            "Start slowly with light activity and increase intensity gradually".to_string(),
        );
    } else if bpm < 60.0 {
        rec.summary.push(format!(
            "Resting heart rate of {bpm} bpm is low; common in active people, but mention it to your doctor if you feel dizzy or tired"
        ));
    }
}

fn cholesterol_notes(metrics: &HealthMetrics, rec: &mut Recommendations) {
    let Some(chol) = &metrics.cholesterol else {
        return;
    };
    let c = chol.value;

    if c > 240.0 {
        rec.diet
            .push("Keep saturated fat below 7% of daily calories".to_string());
        rec.diet
            .push("Eat omega-3 rich foods such as salmon, walnuts and flaxseed".to_string());
        rec.medical.push(
            "Request a full lipid panel and discuss cholesterol management with your doctor"
                .to_string(),
        );
    } else if c > 200.0 {
        rec.summary.push(format!(
            "Cholesterol of {c} mg/dL is borderline high - limit fried and processed foods"
        ));
    }
}

fn is_critical(metrics: &HealthMetrics) -> bool {
    let bp = metrics
        .blood_pressure
        .as_ref()
        .is_some_and(|bp| bp.systolic >= 140);
    let sugar = metrics
        .sugar_level
        .as_ref()
        .is_some_and(|s| s.value >= 126.0);
    let bmi = metrics.bmi.as_ref().is_some_and(|b| b.value >= 30.0);
    bp || sugar || bmi
}

fn baseline_fallback(metrics: &HealthMetrics, rec: &mut Recommendations) {
    if is_critical(metrics) {
        return;
    }
    if rec.exercise.is_empty() {
        rec.exercise
            .push("150 minutes of moderate aerobic activity per week".to_string());
        rec.exercise
            .push("Strength training at least 2 days per week".to_string());
    }
    if rec.diet.is_empty() {
        rec.diet.push(
            "Balanced diet: lean protein, whole grains and healthy fats at every meal".to_string(),
        );
        rec.diet
            .push("Eat 5-7 servings of fruits and vegetables daily".to_string());
    }
}

fn condition_follow_ups(relations: &Relations, rec: &mut Recommendations) {
    let mut seen: Vec<&str> = Vec::new();
    for condition in &relations.conditions {
        let name = condition.name.as_str();
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);

        let line = match name {
            "Diabetes" => "Consult an endocrinologist for diabetes management".to_string(),
            "Pre-diabetes" => {
                "Schedule a follow-up with your doctor to prevent progression to diabetes"
                    .to_string()
            }
            "Hypertension" => "Consult a cardiologist for blood pressure management".to_string(),
            "Obesity" => "Discuss weight management options with your doctor".to_string(),
            "Overweight" => "Ask your doctor about a healthy weight target".to_string(),
            other => format!("Follow up with your doctor about {other}"),
        };
        rec.medical.push(line);
    }
}

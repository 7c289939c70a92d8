use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::model::LinearModel;
use crate::normalize::{
    clamp_percentage, coerce_number, coerce_text, normalize_attendance, normalize_cgpa, round2,
};

const HIGH_MESSAGE: &str = "Congratulations! You got a great percentage—outstanding work!";
const AVERAGE_MESSAGE: &str = "Well done! You've got a decent percentage—keep pushing forward!";
const ENCOURAGE_MESSAGE: &str =
    "Don't be discouraged—you've got potential. Let's aim higher next time!";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    High,
    Average,
    Low,
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::High => "High",
            Category::Average => "Average",
            Category::Low => "Low",
            Category::VeryPoor => "Very Poor",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Category::High => HIGH_MESSAGE,
            Category::Average => AVERAGE_MESSAGE,
            Category::Low | Category::VeryPoor => ENCOURAGE_MESSAGE,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bands are checked top-down, each with an inclusive lower bound.
pub fn classify(percentage: f64) -> Category {
    if (85.0..=100.0).contains(&percentage) {
        Category::High
    } else if (60.0..85.0).contains(&percentage) {
        Category::Average
    } else if (45.0..60.0).contains(&percentage) {
        Category::Low
    } else {
        Category::VeryPoor
    }
}

/// Raw request body. Every field is optional and may hold any JSON value.
#[derive(Debug, Clone, Default)]
pub struct PredictionRequest {
    pub student_name: Option<Value>,
    pub register_no: Option<Value>,
    pub attendance: Option<Value>,
    pub cgpa_percentage: Option<Value>,
}

impl PredictionRequest {
    /// Builds a request from an arbitrary JSON value. Anything that is not an
    /// object is an empty request.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                student_name: map.get("studentName").cloned(),
                register_no: map.get("registerNo").cloned(),
                attendance: map.get("attendance").cloned(),
                cgpa_percentage: map.get("cgpaPercentage").cloned(),
            },
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct NormalizedInputs {
    pub attendance: f64,
    pub cgpa_percentage: f64,
}

/// Model output for one pair of inputs, before identity fields are attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub inputs: NormalizedInputs,
    /// Clamped to [0, 100], not rounded.
    pub percentage: f64,
    pub category: Category,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PredictionResult {
    #[serde(rename = "studentName")]
    pub student_name: String,
    #[serde(rename = "registerNo")]
    pub register_no: String,
    pub inputs: NormalizedInputs,
    pub predicted_percentage: f64,
    pub category: Category,
    pub message: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct CategoryCounts {
    pub high: usize,
    pub average: usize,
    pub low: usize,
    pub very_poor: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BatchSummary {
    pub category_counts: CategoryCounts,
    pub avg_predicted_percentage: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BatchResult {
    pub total_students: usize,
    pub predictions: Vec<PredictionResult>,
    pub summary: BatchSummary,
}

/// Holds the fitted model for the life of the process. Read-only, so one
/// instance is shared by every worker.
#[derive(Debug, Clone)]
pub struct Predictor {
    model: LinearModel,
}

impl Predictor {
    pub fn new(model: LinearModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn estimate(&self, attendance_raw: f64, cgpa_raw: f64) -> Estimate {
        let inputs = NormalizedInputs {
            attendance: normalize_attendance(attendance_raw),
            cgpa_percentage: normalize_cgpa(cgpa_raw),
        };
        let percentage =
            clamp_percentage(self.model.predict(inputs.attendance, inputs.cgpa_percentage));

        Estimate {
            inputs,
            percentage,
            category: classify(percentage),
        }
    }

    pub fn predict(&self, request: &PredictionRequest) -> PredictionResult {
        let estimate = self.estimate(
            coerce_number(request.attendance.as_ref()),
            coerce_number(request.cgpa_percentage.as_ref()),
        );

        PredictionResult {
            student_name: coerce_text(request.student_name.as_ref()),
            register_no: coerce_text(request.register_no.as_ref()),
            inputs: estimate.inputs,
            predicted_percentage: round2(estimate.percentage),
            category: estimate.category,
            message: estimate.category.message().to_string(),
        }
    }

    /// Predicts every request and tallies the categories.
    pub fn predict_batch(&self, requests: &[PredictionRequest]) -> BatchResult {
        let mut counts = CategoryCounts::default();
        let mut total_predicted = 0.0;
        let mut predictions = Vec::with_capacity(requests.len());

        for request in requests {
            let result = self.predict(request);
            match result.category {
                Category::High => counts.high += 1,
                Category::Average => counts.average += 1,
                Category::Low => counts.low += 1,
                Category::VeryPoor => counts.very_poor += 1,
            }
            total_predicted += result.predicted_percentage;
            predictions.push(result);
        }

        let total_students = predictions.len();
        let avg_predicted_percentage = if total_students > 0 {
            round2(total_predicted / total_students as f64)
        } else {
            0.0
        };

        BatchResult {
            total_students,
            predictions,
            summary: BatchSummary {
                category_counts: counts,
                avg_predicted_percentage,
            },
        }
    }
}

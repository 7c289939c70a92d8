use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::data::DatasetSource;
use crate::model::LinearModel;
use crate::predictor::{PredictionRequest, Predictor};

const HOMEPAGE: &str = include_str!("../frontend/index.html");

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ModelInfo {
    pub attendance_weight: f64,
    pub cgpa_weight: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub training_samples: usize,
    pub dataset_origin: String,
    pub intercept_only: bool,
}

impl ModelInfo {
    pub fn new(model: &LinearModel, source: &DatasetSource) -> Self {
        Self {
            attendance_weight: model.attendance_weight,
            cgpa_weight: model.cgpa_weight,
            intercept: model.intercept,
            r_squared: model.r_squared(source.dataset()),
            training_samples: source.dataset().len(),
            dataset_origin: source.origin().to_string(),
            intercept_only: model.is_intercept_only(),
        }
    }
}

// Bodies that are not JSON are treated as empty so the caller still gets a 200.
fn parse_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|err| {
        debug!(error = %err, "Request body is not valid JSON, treating as empty");
        Value::Null
    })
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn predict(body: web::Bytes, predictor: web::Data<Predictor>) -> HttpResponse {
    let request = PredictionRequest::from_value(&parse_body(&body));
    let result = predictor.predict(&request);

    debug!(
        attendance = result.inputs.attendance,
        cgpa_percentage = result.inputs.cgpa_percentage,
        predicted = result.predicted_percentage,
        category = %result.category,
        "Prediction served"
    );

    HttpResponse::Ok().json(result)
}

pub async fn batch_predict(body: web::Bytes, predictor: web::Data<Predictor>) -> HttpResponse {
    let requests: Vec<PredictionRequest> = match parse_body(&body) {
        Value::Array(items) => items.iter().map(PredictionRequest::from_value).collect(),
        _ => Vec::new(),
    };
    let batch = predictor.predict_batch(&requests);

    debug!(total = batch.total_students, "Batch prediction served");

    HttpResponse::Ok().json(batch)
}

pub async fn get_model_info(info: web::Data<ModelInfo>) -> HttpResponse {
    HttpResponse::Ok().json(info.as_ref())
}

pub async fn serve_homepage() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(HOMEPAGE)
}

/// Registers every route. Expects `web::Data<Predictor>` and
/// `web::Data<ModelInfo>` to be present on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(serve_homepage))
        .route("/api/health", web::get().to(health_check))
        .route("/api/predict", web::post().to(predict))
        .route("/api/predict/batch", web::post().to(batch_predict))
        .route("/api/model", web::get().to(get_model_info));
}

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use student_percentage_predictor::api::{self, ModelInfo};
use student_percentage_predictor::data::{DatasetSource, StudentDataset};
use student_percentage_predictor::model::LinearModel;
use student_percentage_predictor::predictor::Predictor;

fn app_data() -> (web::Data<Predictor>, web::Data<ModelInfo>) {
    let model = LinearModel::new(0.45, 0.55, 0.0);
    let source = DatasetSource::Synthetic {
        seed: 42,
        dataset: StudentDataset::default(),
    };
    (
        web::Data::new(Predictor::new(model)),
        web::Data::new(ModelInfo::new(&model, &source)),
    )
}

#[actix_web::test]
async fn test_health_check() {
    let (predictor, info) = app_data();
    let app = test::init_service(
        App::new()
            .app_data(predictor)
            .app_data(info)
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"status": "ok"}));
}

#[actix_web::test]
async fn test_predict_endpoint() {
    let (predictor, info) = app_data();
    let app = test::init_service(
        App::new()
            .app_data(predictor)
            .app_data(info)
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/predict")
        .set_json(json!({
            "studentName": "Jane",
            "registerNo": "REG0007",
            "attendance": 90,
            "cgpaPercentage": 8
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["studentName"], json!("Jane"));
    assert_eq!(body["registerNo"], json!("REG0007"));
    assert_eq!(body["inputs"]["attendance"], json!(90.0));
    assert_eq!(body["inputs"]["cgpa_percentage"], json!(80.0));
    assert_eq!(body["predicted_percentage"], json!(84.5));
    assert_eq!(body["category"], json!("Average"));
    assert_eq!(
        body["message"],
        json!("Well done! You've got a decent percentage—keep pushing forward!")
    );
}

#[actix_web::test]
async fn test_predict_invalid_body_still_ok() {
    let (predictor, info) = app_data();
    let app = test::init_service(
        App::new()
            .app_data(predictor)
            .app_data(info)
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/predict")
        .set_payload("definitely not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["inputs"]["attendance"], json!(0.0));
    assert_eq!(body["predicted_percentage"], json!(0.0));
    assert_eq!(body["category"], json!("Very Poor"));
}

#[actix_web::test]
async fn test_batch_predict_endpoint() {
    let (predictor, info) = app_data();
    let app = test::init_service(
        App::new()
            .app_data(predictor)
            .app_data(info)
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/predict/batch")
        .set_json(json!([
            {"studentName": "A", "attendance": 100, "cgpaPercentage": 10},
            {"studentName": "B", "attendance": "abc", "cgpaPercentage": 9.5}
        ]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_students"], json!(2));
    assert_eq!(body["predictions"][0]["category"], json!("High"));
    assert_eq!(body["predictions"][1]["inputs"]["attendance"], json!(0.0));
    assert_eq!(body["summary"]["category_counts"]["high"], json!(1));
}

#[actix_web::test]
async fn test_model_info_and_homepage() {
    let (predictor, info) = app_data();
    let app = test::init_service(
        App::new()
            .app_data(predictor)
            .app_data(info)
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/model").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["attendance_weight"], json!(0.45));
    assert_eq!(body["dataset_origin"], json!("synthetic"));

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

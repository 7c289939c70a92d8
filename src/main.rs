use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::info;

use student_percentage_predictor::api::{self, ModelInfo};
use student_percentage_predictor::bootstrap;
use student_percentage_predictor::config::Config;
use student_percentage_predictor::predictor::Predictor;

async fn start_api(config: &Config, predictor: Predictor, model_info: ModelInfo) -> std::io::Result<()> {
    let predictor_data = web::Data::new(predictor);
    let info_data = web::Data::new(model_info);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(predictor_data.clone())
            .app_data(info_data.clone())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    tracing_subscriber::fmt().with_max_level(config.log_level).init();

    info!(data_path = %config.data_path.display(), "Loading student data");
    let (predictor, model_info) = bootstrap(&config.data_path, config.persist_synthetic)?;

    info!(host = %config.host, port = config.port, "Starting Student Percentage Predictor API");
    start_api(&config, predictor, model_info).await?;

    Ok(())
}

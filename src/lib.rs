//! Next-term percentage prediction for students.
//!
//! A linear regression over attendance and CGPA is fitted once at startup
//! and then shared read-only by every request handler.

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod normalize;
pub mod predictor;

use anyhow::Context;
use std::path::Path;
use tracing::info;

use crate::api::ModelInfo;
use crate::data::DatasetSource;
use crate::predictor::Predictor;

/// Loads (or generates) the training data and fits the model. Must finish
/// before the server accepts requests.
pub fn bootstrap(data_path: &Path, persist_synthetic: bool) -> anyhow::Result<(Predictor, ModelInfo)> {
    data::ensure_parent_dir(data_path)
        .with_context(|| format!("creating data directory for {}", data_path.display()))?;

    let source = data::load_or_synthesize(data_path)?;
    if persist_synthetic {
        if let DatasetSource::Synthetic { dataset, .. } = &source {
            dataset.write_csv(data_path)?;
            info!(path = %data_path.display(), "Saved synthetic dataset");
        }
    }

    let model = model::train(source.dataset());
    let info = ModelInfo::new(&model, &source);
    info!(
        origin = %info.dataset_origin,
        samples = info.training_samples,
        r_squared = info.r_squared,
        "Model ready"
    );

    Ok((Predictor::new(model), info))
}

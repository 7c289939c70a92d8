use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// Command-line options for the prediction server.
#[derive(Debug, Clone, Parser)]
#[command(name = "student_percentage_predictor", version, about)]
pub struct Config {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// CSV training data. A seeded synthetic cohort is used when the file is absent.
    #[arg(long, default_value = "data/students.csv")]
    pub data_path: PathBuf,

    /// Write the synthetic cohort to `data_path` when it had to be generated
    #[arg(long)]
    pub persist_synthetic: bool,

    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

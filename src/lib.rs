//! Cardiovascular risk dashboard.
//!
//! A small local web app with five views (Home, Prediction,
//! Visualizations, Data Overview, About) over a historical patient dataset
//! and a pre-trained binary risk model. The Prediction view validates ten
//! health fields, assembles them in the model's column order and reports
//! whether the model flags a risk.

pub mod api;
pub mod assets;
pub mod config;
pub mod model;
pub mod prediction;
pub mod views;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over the default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

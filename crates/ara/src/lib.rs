//! 📊 ara: the Agile Regression Analyzer coverage engine.
//!
//! Crosses a project's functionalities over four axes (country, severity, team,
//! coverage level) and counts them into a flat cube the frontend can slice.

pub mod app_config;
pub mod axes;
pub mod common;
pub mod coverage;
pub mod cube;
pub mod report;
pub mod repositories;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::app_config::AppConfig;
use crate::coverage::CoverageService;
use crate::cube::CoverageCube;
use crate::repositories::StoreBackend;

/// 🧮 Build the configured store and compute the configured project's cube.
pub async fn compute(app_config: &AppConfig) -> Result<CoverageCube> {
    let store = Arc::new(
        StoreBackend::from_config(&app_config.store)
            .await
            .context("Failed to open the store")?,
    );
    let service = CoverageService::new(store.clone(), store.clone(), store);
    service.compute_coverage(app_config.project_id).await
}

/// 🚀 Compute, render, write. The whole show.
pub async fn run(app_config: AppConfig) -> Result<()> {
    let cube = compute(&app_config).await?;
    let rendered = report::render(&cube, &app_config.output)?;
    report::write_report(&rendered, &app_config.output)
        .await
        .context("Failed to write the coverage report")
}

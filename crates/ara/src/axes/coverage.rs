use anyhow::Result;
use async_trait::async_trait;

use crate::axes::AxisGenerator;
use crate::common::{CoverageLevel, Functionality};
use crate::cube::AxisPoint;

/// 🎯 The coverage-level axis. Every functionality has exactly one level, so
/// `value_points` never comes back empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageAxisGenerator;

#[async_trait]
impl AxisGenerator for CoverageAxisGenerator {
    fn code(&self) -> &'static str {
        "coverage"
    }

    fn name(&self) -> &'static str {
        "Coverage level"
    }

    async fn points(&self, _project_id: i64) -> Result<Vec<AxisPoint>> {
        Ok(CoverageLevel::ALL
            .iter()
            .map(|level| {
                AxisPoint::new(level.name(), level.label(), Some(level.tooltip().to_string()))
            })
            .collect())
    }

    fn value_points(&self, functionality: &Functionality) -> Option<Vec<String>> {
        Some(vec![functionality.coverage_level().name().to_string()])
    }
}

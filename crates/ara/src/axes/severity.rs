use anyhow::Result;
use async_trait::async_trait;

use crate::axes::AxisGenerator;
use crate::common::{Functionality, FunctionalitySeverity};
use crate::cube::AxisPoint;

/// 🔥 The severity axis: HIGH, MEDIUM, LOW. Same for every project, no I/O needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityAxisGenerator;

#[async_trait]
impl AxisGenerator for SeverityAxisGenerator {
    fn code(&self) -> &'static str {
        "severity"
    }

    fn name(&self) -> &'static str {
        "Severities"
    }

    async fn points(&self, _project_id: i64) -> Result<Vec<AxisPoint>> {
        Ok(FunctionalitySeverity::ALL
            .iter()
            .map(|severity| AxisPoint::new(severity.name(), severity.label(), None))
            .collect())
    }

    fn value_points(&self, functionality: &Functionality) -> Option<Vec<String>> {
        functionality
            .severity
            .map(|severity| vec![severity.name().to_string()])
    }
}

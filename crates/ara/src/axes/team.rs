use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::axes::AxisGenerator;
use crate::common::{Functionality, Team};
use crate::cube::AxisPoint;
use crate::repositories::TeamRepository;

/// 👥 The team axis: teams that can own functionalities, alphabetical by name.
///
/// Teams not assignable to functionalities (the "we only fix problems" crowd)
/// get no point. A functionality still pointing at one of them is counted under
/// ALL only, which is why this axis [skips unlisted points](AxisGenerator::skips_unlisted_points).
#[derive(Debug, Clone)]
pub struct TeamAxisGenerator {
    teams: Arc<dyn TeamRepository>,
}

impl TeamAxisGenerator {
    pub fn new(teams: Arc<dyn TeamRepository>) -> Self {
        Self { teams }
    }

    async fn teams_of(&self, project_id: i64) -> Result<Vec<Team>> {
        self.teams
            .find_all_by_project_id_order_by_name(project_id)
            .await
            .context(format!(
                "💀 Could not load the teams of project {project_id} for the team axis"
            ))
    }
}

#[async_trait]
impl AxisGenerator for TeamAxisGenerator {
    fn code(&self) -> &'static str {
        "team"
    }

    fn name(&self) -> &'static str {
        "Teams"
    }

    async fn points(&self, project_id: i64) -> Result<Vec<AxisPoint>> {
        Ok(self
            .teams_of(project_id)
            .await?
            .into_iter()
            .filter(|team| team.assignable_to_functionalities)
            .map(|team| AxisPoint::new(team.id.to_string(), team.name, None))
            .collect())
    }

    fn value_points(&self, functionality: &Functionality) -> Option<Vec<String>> {
        functionality.team_id.map(|team_id| vec![team_id.to_string()])
    }

    fn skips_unlisted_points(&self) -> bool {
        true
    }

    /// 🫥 The teams that exist but may not own functionalities.
    async fn hidden_points(&self, project_id: i64) -> Result<Vec<String>> {
        Ok(self
            .teams_of(project_id)
            .await?
            .into_iter()
            .filter(|team| !team.assignable_to_functionalities)
            .map(|team| team.id.to_string())
            .collect())
    }
}

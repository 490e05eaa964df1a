//! # Previously, on ARA...
//!
//! 🎬 The functionalities were scattered. Some in a database, some in a
//! spreadsheet, one on a sticky note attached to a monitor in building C.
//! Someone had to hold them all in one place, even briefly.
//!
//! That someone was this module.
//!
//! `in_mem` provides [`InMemoryStore`]: a [`Dataset`] kept in RAM, answering
//! every repository query with a filter and a sort. Great for tests. Great
//! for the demo. Also what the file store delegates to once it has read its file.
//!
//! ✅ No network calls. No disk I/O. Just vibes and heap memory.

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{Country, Functionality, FunctionalityType, Team};
use crate::repositories::{CountryRepository, Dataset, FunctionalityRepository, TeamRepository};

/// 📦 A store that lives entirely in RAM, gone the moment you blink.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    dataset: Dataset,
}

impl InMemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl FunctionalityRepository for InMemoryStore {
    async fn find_all_by_project_id_and_type(
        &self,
        project_id: i64,
        kind: FunctionalityType,
    ) -> Result<Vec<Functionality>> {
        let mut functionalities: Vec<Functionality> = self
            .dataset
            .functionalities
            .iter()
            .filter(|f| f.project_id == project_id && f.kind == kind)
            .cloned()
            .collect();
        functionalities.sort_by_key(|f| f.id);
        Ok(functionalities)
    }
}

#[async_trait]
impl CountryRepository for InMemoryStore {
    async fn find_all_by_project_id_order_by_code(&self, project_id: i64) -> Result<Vec<Country>> {
        let mut countries: Vec<Country> = self
            .dataset
            .countries
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect();
        countries.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(countries)
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn find_all_by_project_id_order_by_name(&self, project_id: i64) -> Result<Vec<Team>> {
        let mut teams: Vec<Team> = self
            .dataset
            .teams
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        // -- 🔄 ties broken by id, so two teams named "QA" don't swap places between runs
        teams.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(teams)
    }
}

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::axes::AxisGenerator;
use crate::common::Functionality;
use crate::cube::AxisPoint;
use crate::repositories::CountryRepository;

/// 🌍 The country axis: one point per project country, alphabetical by code.
///
/// The only multi-valued axis. A functionality shipped to "be,cn" lands on
/// both Belgium and China, and is counted once in each (plus once in ALL).
#[derive(Debug, Clone)]
pub struct CountryAxisGenerator {
    countries: Arc<dyn CountryRepository>,
}

impl CountryAxisGenerator {
    pub fn new(countries: Arc<dyn CountryRepository>) -> Self {
        Self { countries }
    }
}

#[async_trait]
impl AxisGenerator for CountryAxisGenerator {
    fn code(&self) -> &'static str {
        "country"
    }

    fn name(&self) -> &'static str {
        "Countries"
    }

    /// 📍 `{ id: "be", name: "BE", tooltip: "Belgium" }` and friends.
    async fn points(&self, project_id: i64) -> Result<Vec<AxisPoint>> {
        let countries = self
            .countries
            .find_all_by_project_id_order_by_code(project_id)
            .await
            .context(format!(
                "💀 Could not load the countries of project {project_id} for the country axis"
            ))?;

        Ok(countries
            .into_iter()
            .map(|country| {
                let display_code = country.code.to_uppercase();
                AxisPoint::new(country.code, display_code, Some(country.name))
            })
            .collect())
    }

    fn value_points(&self, functionality: &Functionality) -> Option<Vec<String>> {
        functionality.country_codes_list()
    }
}

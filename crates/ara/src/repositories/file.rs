use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::common::{Country, Functionality, FunctionalityType, Team};
use crate::repositories::{
    CountryRepository, Dataset, FunctionalityRepository, InMemoryStore, TeamRepository,
};

// -- 📂 FileStoreConfig: "It's just a file", said no sysadmin ever before the disk filled up.
// -- Lives here, close to the FileStore that actually uses it.
#[derive(Debug, Deserialize, Clone)]
pub struct FileStoreConfig {
    pub file_name: String,
}

/// 📂 FileStore: reads a JSON [`Dataset`] once, then answers every query from RAM.
///
/// Think of it like an intern who photocopies the whole filing cabinet on day one
/// and never goes back to the basement. Edits made to the file after construction
/// are not seen. Build a new store if the file changed.
#[derive(Debug)]
pub struct FileStore {
    config: FileStoreConfig,
    store: InMemoryStore,
}

impl FileStore {
    /// 🚀 Read and parse the dataset file.
    ///
    /// If the file doesn't exist: 💀 anyhow will tell you, with the path, with feeling.
    /// If the JSON is mangled: same, plus serde's line and column.
    pub async fn new(config: FileStoreConfig) -> Result<Self> {
        let raw = tokio::fs::read_to_string(&config.file_name)
            .await
            .context(format!(
                "💀 The dataset file '{}' would not open. We knocked. We pleaded. \
                 Check that it exists and that we are allowed to read it.",
                config.file_name
            ))?;

        let dataset: Dataset = serde_json::from_str(&raw).context(format!(
            "💀 The dataset file '{}' is not a valid dataset. \
             Expected {{ \"countries\": [...], \"teams\": [...], \"functionalities\": [...] }}.",
            config.file_name
        ))?;

        warn_about_contradictions(&dataset);

        info!(
            "📂 Loaded dataset '{}': {} countries, {} teams, {} functionalities",
            config.file_name,
            dataset.countries.len(),
            dataset.teams.len(),
            dataset.functionalities.len()
        );

        Ok(Self {
            config,
            store: InMemoryStore::new(dataset),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.config.file_name
    }
}

/// ⚠️ A functionality cannot be both started and not automatable.
///
/// Writers are supposed to refuse that combination. Files written by hand do not
/// always get the memo, so we log it and carry on: coverage derivation still
/// yields a single level (started wins).
fn warn_about_contradictions(dataset: &Dataset) {
    for functionality in &dataset.functionalities {
        if functionality.is_started() && functionality.is_not_automatable() {
            warn!(
                "⚠️ Functionality {} ('{}') is both started and not automatable; counting it as started",
                functionality.id, functionality.name
            );
        }
    }
}

#[async_trait]
impl FunctionalityRepository for FileStore {
    async fn find_all_by_project_id_and_type(
        &self,
        project_id: i64,
        kind: FunctionalityType,
    ) -> Result<Vec<Functionality>> {
        self.store
            .find_all_by_project_id_and_type(project_id, kind)
            .await
    }
}

#[async_trait]
impl CountryRepository for FileStore {
    async fn find_all_by_project_id_order_by_code(&self, project_id: i64) -> Result<Vec<Country>> {
        self.store.find_all_by_project_id_order_by_code(project_id).await
    }
}

#[async_trait]
impl TeamRepository for FileStore {
    async fn find_all_by_project_id_order_by_name(&self, project_id: i64) -> Result<Vec<Team>> {
        self.store.find_all_by_project_id_order_by_name(project_id).await
    }
}

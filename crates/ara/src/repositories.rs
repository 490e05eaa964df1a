//! 🔌 Repositories: where the coverage math gets its groceries.
//!
//! 🚰 The coverage service never touches a database, a file, or a socket.
//! It asks politely, through the traits below, and somebody else does the fetching.
//! That somebody is a [`StoreBackend`]: RAM, a JSON file on disk, or the demo project.
//!
//! 🧠 Knowledge graph:
//! - Pattern: trait → concrete impls (InMemoryStore, FileStore) → StoreBackend enum
//! - One trait per collaborator: functionalities, countries, teams
//! - Every query is scoped to a project id. Projects never see each other's stuff.
//!
//! 🦆 The duck is here because every file must have one. This is law. Do not question the duck.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::{Country, Functionality, FunctionalityType, Team};

pub mod demo;
pub(crate) mod file;
pub(crate) mod in_mem;

pub use file::{FileStore, FileStoreConfig};
pub use in_mem::InMemoryStore;

// ===== Traits =====

/// 🌳 Hands out the functionalities of a project.
///
/// # Contract
/// - Only nodes of the requested `kind` come back (folders stay home when asked to).
/// - Results are sorted by id so two calls on the same data iterate identically.
#[async_trait]
pub trait FunctionalityRepository: std::fmt::Debug + Send + Sync {
    async fn find_all_by_project_id_and_type(
        &self,
        project_id: i64,
        kind: FunctionalityType,
    ) -> Result<Vec<Functionality>>;
}

/// 🌍 Hands out the countries of a project, alphabetical by code.
#[async_trait]
pub trait CountryRepository: std::fmt::Debug + Send + Sync {
    async fn find_all_by_project_id_order_by_code(&self, project_id: i64) -> Result<Vec<Country>>;
}

/// 👥 Hands out the teams of a project, alphabetical by name.
#[async_trait]
pub trait TeamRepository: std::fmt::Debug + Send + Sync {
    async fn find_all_by_project_id_order_by_name(&self, project_id: i64) -> Result<Vec<Team>>;
}

// ===== Dataset =====

/// 📦 Everything a store knows, in one serde-friendly bundle.
///
/// This is also the on-disk format read by [`FileStore`]:
///
/// ```json
/// { "countries": [...], "teams": [...], "functionalities": [...] }
/// ```
///
/// Missing sections default to empty. A dataset with no functionalities is a
/// perfectly valid, if somewhat lonely, project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub countries: Vec<Country>,
    pub teams: Vec<Team>,
    pub functionalities: Vec<Functionality>,
}

// ===== Config + Backend Enum =====

/// 🔧 Which store should feed the coverage computation?
///
/// In TOML:
/// ```toml
/// [store.File]
/// file_name = "dataset.json"
/// ```
/// or `store = "Demo"` / `store = "InMemory"`.
#[derive(Debug, Deserialize, Clone, Default)]
pub enum StoreConfig {
    File(FileStoreConfig),
    /// 🎪 The built-in demo project: a tiny e-shop with opinions about pigeons.
    Demo,
    /// 🫙 An empty in-memory store. Every cube comes back full of zeros.
    #[default]
    InMemory,
}

/// 🎭 The many faces of a store: a polymorphic casting call for data origins.
///
/// Each variant wraps a concrete store. The enum implements every repository
/// trait by dispatching, so the coverage service never needs to know (or care)
/// whether its functionalities came from RAM or from a file somebody emailed around.
#[derive(Debug)]
pub enum StoreBackend {
    InMemory(InMemoryStore),
    File(FileStore),
}

impl StoreBackend {
    /// 🚀 Build the backend a config asks for. The file store reads its file right here.
    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(match config {
            StoreConfig::File(file_config) => {
                StoreBackend::File(FileStore::new(file_config.clone()).await?)
            }
            StoreConfig::Demo => StoreBackend::InMemory(InMemoryStore::new(demo::demo_dataset())),
            StoreConfig::InMemory => StoreBackend::InMemory(InMemoryStore::default()),
        })
    }
}

#[async_trait]
impl FunctionalityRepository for StoreBackend {
    async fn find_all_by_project_id_and_type(
        &self,
        project_id: i64,
        kind: FunctionalityType,
    ) -> Result<Vec<Functionality>> {
        match self {
            StoreBackend::InMemory(store) => {
                store.find_all_by_project_id_and_type(project_id, kind).await
            }
            StoreBackend::File(store) => {
                store.find_all_by_project_id_and_type(project_id, kind).await
            }
        }
    }
}

#[async_trait]
impl CountryRepository for StoreBackend {
    async fn find_all_by_project_id_order_by_code(&self, project_id: i64) -> Result<Vec<Country>> {
        match self {
            StoreBackend::InMemory(store) => {
                store.find_all_by_project_id_order_by_code(project_id).await
            }
            StoreBackend::File(store) => store.find_all_by_project_id_order_by_code(project_id).await,
        }
    }
}

#[async_trait]
impl TeamRepository for StoreBackend {
    async fn find_all_by_project_id_order_by_name(&self, project_id: i64) -> Result<Vec<Team>> {
        match self {
            StoreBackend::InMemory(store) => {
                store.find_all_by_project_id_order_by_name(project_id).await
            }
            StoreBackend::File(store) => store.find_all_by_project_id_order_by_name(project_id).await,
        }
    }
}

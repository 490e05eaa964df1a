//! 🔧 App Configuration: the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." (every developer at 3am) 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::report::{OutputConfig, OutputFormat};
use crate::repositories::StoreConfig;

/// 📦 Everything one coverage run needs to know about itself.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 🏷️ Which project to cross-tabulate.
    pub project_id: i64,
    /// 🚰 Where the functionalities, countries and teams come from.
    #[serde(default)]
    pub store: StoreConfig,
    /// 📤 How the cube leaves the building.
    #[serde(default)]
    pub output: OutputConfig,
}

/// 🎛️ Values from the command line. Anything set here beats the file and the env.
///
/// Unset fields are skipped entirely, so they never blank out a configured value.
#[derive(Debug, Serialize, Clone, Default)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "OutputOverrides::is_empty")]
    pub output: OutputOverrides,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl OutputOverrides {
    fn is_empty(&self) -> bool {
        self.format.is_none() && self.file_name.is_none()
    }
}

/// 🚀 Load the config: from a file, from env vars, or from the sheer power of hoping.
///
/// 🔧 Merges environment variables (`ARA_*`) with an optional TOML file.
///   - `config_file_name` is `None`  → env vars only.
///   - `config_file_name` is `Some`  → env vars + TOML file, merged. TOML wins on conflicts.
///   - `overrides` go on top of both.
///
/// Nested keys use a double underscore in env vars: `ARA_OUTPUT__FORMAT=table`.
///
/// 💀 Returns an error if config is unparseable, with a message that says where we looked.
pub fn load_config(
    config_file_name: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("ARA_").split("__"));

    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let config = config.merge(Serialized::defaults(overrides));

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (ARA_*). \
             Is `project_id` set? Is the TOML actually TOML?",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (ARA_*). \
                 No file was provided, so at least ARA_PROJECT_ID must be set."
            .to_string(),
    };

    config.extract().context(context_msg)
}

//! 🚀 ara-cli: the front door of the coverage engine.
//!
//! 🎬 *[narrator voice]* "The product owner asked one question: are we covered in France?"
//! 📦 This binary crate loads config, sets up logging, lets the library build the
//! cube, and prints whatever comes out. Like a manager. 🦆

use std::path::PathBuf;

use anyhow::{Context, Result};
use ara::app_config::{ConfigOverrides, OutputOverrides};
use ara::report::OutputFormat;
use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// 📊 Cross-tabulate a project's functionalities by country, severity, team and coverage level.
#[derive(Debug, Parser)]
#[command(name = "ara-cli", version, about)]
struct Args {
    /// 📂 TOML config file. Skipped quietly when it does not exist.
    #[arg(short, long, default_value = "ara.toml", env = "ARA_CONFIG")]
    config: PathBuf,

    /// 🏷️ Project to compute, overriding `project_id` from the file and the env.
    #[arg(short, long)]
    project: Option<i64>,

    /// 🎨 Output format, overriding `[output] format`.
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// 📤 Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Table,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Table => OutputFormat::Table,
        }
    }
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            project_id: self.project,
            output: OutputOverrides {
                format: self.format.map(OutputFormat::from),
                file_name: self.output.clone(),
            },
        }
    }
}

/// 🚀 main(): where it all begins.
///
/// 🔧 Steps:
/// 1. Init tracing (so we can see what goes wrong, and when)
/// 2. Parse args
/// 3. Load config, with the command line on top
/// 4. Compute and write the cube
/// 5. Handle errors (cry, then exit 1)
#[tokio::main]
async fn main() -> Result<()> {
    // 📡 Set up tracing. Logs go to stderr so a JSON report on stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // 🔒 A missing config file is fine, env vars and flags may carry everything.
    // An unreadable path is not.
    let config_file = args.config.as_path();
    let config_file_path_which_is_validated_to_exist = match config_file.try_exists().context(
        format!(
            "💀 Couldn't check whether the configuration file exists. If it's a relative path, \
             it's relative to the cwd, so an absolute path removes the guesswork. \
             Was checking here: '{}'",
            config_file.display()
        ),
    )? {
        true => Some(config_file),
        false => None,
    };

    let app_config =
        ara::app_config::load_config(config_file_path_which_is_validated_to_exist, &args.overrides())
            .context(
                "💀 In ara-cli, main, we couldn't load the configuration. \
                 Check the TOML, the ARA_* env vars, and that a project id is set somewhere \
                 (file, ARA_PROJECT_ID, or --project)",
            )?;

    // 🚀 SEND IT.
    if let Err(err) = ara::run(app_config).await {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
        }
        std::process::exit(1);
    }

    // ✅ Numbers were produced. Whether they are good numbers is a conversation for standup.
    Ok(())
}

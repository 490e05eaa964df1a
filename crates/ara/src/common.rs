//! 📦 Common data structures: the building blocks of ara
//!
//! ---
//!
//! 🎬 COLD OPEN. INT. QA TEAM STANDUP, 9:02 AM
//!
//! "How covered are we in Belgium?" asks the product owner. Silence.
//! Someone opens a spreadsheet. Someone else opens a different spreadsheet.
//! The two spreadsheets disagree. A third engineer quietly updates their CV.
//!
//! ✅ This module is the single source of truth they wished they had. A
//! `Functionality` knows its countries, its team, its severity, and the scenarios
//! that test it. From those, it derives its `CoverageLevel` on read. Nobody
//! stores the level. Nobody syncs the level. Nobody argues about the level.
//!
//! 🦆
//!
//! The structs here are read-only from the coverage computation's point of view.
//! They arrive from a repository, get classified, get counted, and go home.

use serde::{Deserialize, Serialize};

/// 🌳 Is this node a folder, or an actual functional requirement?
///
/// Folders are organisational furniture. Only `Functionality` nodes get counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionalityType {
    Folder,
    Functionality,
}

/// 🔥 How bad is it if this functionality breaks?
///
/// Declaration order is highest to lowest. Axis ordering relies on it,
/// so please do not alphabetize this enum in a fit of tidiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionalitySeverity {
    High,
    Medium,
    Low,
}

impl FunctionalitySeverity {
    /// 📋 Every severity, from "wake the CTO" down to "meh".
    pub const ALL: [FunctionalitySeverity; 3] = [
        FunctionalitySeverity::High,
        FunctionalitySeverity::Medium,
        FunctionalitySeverity::Low,
    ];

    /// 🏷️ The enum name as stored and as used for axis point ids.
    pub fn name(self) -> &'static str {
        match self {
            FunctionalitySeverity::High => "HIGH",
            FunctionalitySeverity::Medium => "MEDIUM",
            FunctionalitySeverity::Low => "LOW",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FunctionalitySeverity::High => "High",
            FunctionalitySeverity::Medium => "Medium",
            FunctionalitySeverity::Low => "Low",
        }
    }
}

/// 🎯 How well is a functionality tested? The answer, in six flavours.
///
/// Declaration order is the display order of the coverage axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageLevel {
    Covered,
    PartiallyCovered,
    IgnoredCoverage,
    Started,
    NotAutomatable,
    NotCovered,
}

impl CoverageLevel {
    pub const ALL: [CoverageLevel; 6] = [
        CoverageLevel::Covered,
        CoverageLevel::PartiallyCovered,
        CoverageLevel::IgnoredCoverage,
        CoverageLevel::Started,
        CoverageLevel::NotAutomatable,
        CoverageLevel::NotCovered,
    ];

    /// 🏷️ The SCREAMING_SNAKE id, identical to the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            CoverageLevel::Covered => "COVERED",
            CoverageLevel::PartiallyCovered => "PARTIALLY_COVERED",
            CoverageLevel::IgnoredCoverage => "IGNORED_COVERAGE",
            CoverageLevel::Started => "STARTED",
            CoverageLevel::NotAutomatable => "NOT_AUTOMATABLE",
            CoverageLevel::NotCovered => "NOT_COVERED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CoverageLevel::Covered => "Covered",
            CoverageLevel::PartiallyCovered => "Partially covered",
            CoverageLevel::IgnoredCoverage => "Ignored coverage",
            CoverageLevel::Started => "Started",
            CoverageLevel::NotAutomatable => "Not automatable",
            CoverageLevel::NotCovered => "Not covered",
        }
    }

    /// 💬 What the frontend shows when you hover. Short, honest, slightly judgmental.
    pub fn tooltip(self) -> &'static str {
        match self {
            CoverageLevel::Covered => "Covered (no ignored scenario)",
            CoverageLevel::PartiallyCovered => "Partially covered (a few ignored scenarios)",
            CoverageLevel::IgnoredCoverage => "Ignored coverage (all scenarios are ignored)",
            CoverageLevel::Started => "Not covered, but the automation work has started",
            CoverageLevel::NotAutomatable => "Not covered, and cannot be automated",
            CoverageLevel::NotCovered => "Not covered at all",
        }
    }
}

/// 🧪 A test scenario linked to a functionality.
///
/// Only `ignored` matters to the coverage math. The rest is there so humans
/// can recognise the thing when it shows up in a dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
    pub id: i64,
    pub name: String,
    pub ignored: bool,
}

/// 🌳 One node of a project's functional requirements tree.
///
/// `country_codes` is the comma-joined list the database stores (eg. `"fr,us"`).
/// `None` and `Some("")` both mean "no country at all", which is not the same
/// thing as "every country". Ask the product owner. They will confirm. Eventually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Functionality {
    pub id: i64,
    pub project_id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: FunctionalityType,
    pub name: String,
    #[serde(default)]
    pub country_codes: Option<String>,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub severity: Option<FunctionalitySeverity>,
    #[serde(default)]
    pub started: Option<bool>,
    #[serde(default)]
    pub not_automatable: Option<bool>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Functionality {
    /// 🔗 The separator used to join country codes together in `country_codes`.
    pub const COUNTRY_CODES_SEPARATOR: &'static str = ",";

    /// 🏗️ A bare leaf functionality: no countries, no team, no severity, no scenarios.
    /// Tests love it. Real projects have never seen one.
    pub fn new(id: i64, project_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            project_id,
            parent_id: None,
            kind: FunctionalityType::Functionality,
            name: name.into(),
            country_codes: None,
            team_id: None,
            severity: None,
            started: None,
            not_automatable: None,
            scenarios: Vec::new(),
        }
    }

    /// 🌍 The country codes, split on [`Self::COUNTRY_CODES_SEPARATOR`], case as stored.
    ///
    /// Returns `None` when unset or empty, so callers can tell "no country" apart
    /// from "a list that happens to be short". Trailing separators are dropped
    /// (`"fr,"` is just `fr`); empty segments in the middle are kept.
    pub fn country_codes_list(&self) -> Option<Vec<String>> {
        let raw = self
            .country_codes
            .as_deref()?
            .trim_end_matches(Self::COUNTRY_CODES_SEPARATOR);
        if raw.is_empty() {
            return None;
        }
        Some(
            raw.split(Self::COUNTRY_CODES_SEPARATOR)
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_started(&self) -> bool {
        self.started.unwrap_or(false)
    }

    pub fn is_not_automatable(&self) -> bool {
        self.not_automatable.unwrap_or(false)
    }

    /// 📊 How many linked scenarios actually run.
    pub fn covered_scenarios(&self) -> usize {
        self.scenarios.iter().filter(|s| !s.ignored).count()
    }

    /// 💤 How many linked scenarios are sitting this one out.
    pub fn ignored_scenarios(&self) -> usize {
        self.scenarios.iter().filter(|s| s.ignored).count()
    }

    /// 🎯 Derive the coverage level from the scenario links and the two flags.
    ///
    /// Scenario-derived levels always win over `started` / `not_automatable`:
    /// once a scenario is linked, intentions stop mattering and facts take over.
    pub fn coverage_level(&self) -> CoverageLevel {
        if !self.scenarios.is_empty() {
            if self.ignored_scenarios() == 0 {
                CoverageLevel::Covered
            } else if self.covered_scenarios() > 0 {
                CoverageLevel::PartiallyCovered
            } else {
                CoverageLevel::IgnoredCoverage
            }
        } else if self.is_started() {
            CoverageLevel::Started
        } else if self.is_not_automatable() {
            CoverageLevel::NotAutomatable
        } else {
            CoverageLevel::NotCovered
        }
    }
}

/// 🌍 A country a project ships to. `code` is lowercase by convention, `name` is for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub project_id: i64,
    pub code: String,
    pub name: String,
}

/// 👥 A team. Some teams own functionalities, some only fix problems, some do both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    #[serde(default)]
    pub assigned_to_problems: bool,
    #[serde(default)]
    pub assignable_to_functionalities: bool,
}

//! 📏 Axes: the four ways to slice a project's functionalities.
//!
//! 🎬 Every coverage question is secretly a coordinate. "How many HIGH functionalities
//! owned by Buy are not covered in France?" is `(fr, HIGH, Buy, NOT_COVERED)`.
//! This module knows what the coordinates can be, and which ones a given
//! functionality lands on.
//!
//! 🧠 Knowledge graph:
//! - Pattern: trait → concrete impls (Country, Severity, Team, Coverage) → AxisGeneratorKind enum
//! - `points` may hit a repository (countries, teams); `value_points` never does I/O
//! - The ALL point is NOT produced here. The coverage service prepends it.
//! - Axis order is fixed by [`AxisGeneratorKind::standard`] and baked into the flat array layout.
//!
//! 🦆

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::common::Functionality;
use crate::cube::AxisPoint;
use crate::repositories::{CountryRepository, TeamRepository};

pub mod country;
pub mod coverage;
pub mod severity;
pub mod team;

pub use country::CountryAxisGenerator;
pub use coverage::CoverageAxisGenerator;
pub use severity::SeverityAxisGenerator;
pub use team::TeamAxisGenerator;

/// 📏 Knows one dimension of the coverage cube.
///
/// # Contract 📜
/// - `code` is a stable machine id, usable as a URL filter key.
/// - `points` is deterministically ordered and never contains [`AxisPoint::ALL_ID`].
/// - `value_points` is a pure function of the functionality: `None` (or empty) means
///   "matches nothing on this axis", which is not the same as "matches everything".
/// - Every id returned by `value_points` should exist in `points`. When it doesn't,
///   the coverage service treats it as a bug and aborts, unless
///   `skips_unlisted_points` says that axis deliberately hides some values.
#[async_trait]
pub trait AxisGenerator: std::fmt::Debug + Send + Sync {
    fn code(&self) -> &'static str;

    /// 🏷️ Human-readable, plural.
    fn name(&self) -> &'static str;

    async fn points(&self, project_id: i64) -> Result<Vec<AxisPoint>>;

    fn value_points(&self, functionality: &Functionality) -> Option<Vec<String>>;

    /// 🙈 Whether ids missing from `points` are expected and should fall back to ALL only.
    fn skips_unlisted_points(&self) -> bool {
        false
    }

    /// 🫥 Ids this axis leaves off `points` on purpose. Only meaningful when
    /// `skips_unlisted_points` is true; any other unlisted id is a data problem.
    async fn hidden_points(&self, _project_id: i64) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// 🎭 The closed family of axes. Four variants, no plugins, no surprises.
#[derive(Debug)]
pub enum AxisGeneratorKind {
    Country(CountryAxisGenerator),
    Severity(SeverityAxisGenerator),
    Team(TeamAxisGenerator),
    Coverage(CoverageAxisGenerator),
}

impl AxisGeneratorKind {
    /// 📋 The axes of every coverage computation, in their one true order:
    /// country, severity, team, coverage. Reordering this reorders the flat array.
    pub fn standard(
        countries: Arc<dyn CountryRepository>,
        teams: Arc<dyn TeamRepository>,
    ) -> Vec<AxisGeneratorKind> {
        vec![
            AxisGeneratorKind::Country(CountryAxisGenerator::new(countries)),
            AxisGeneratorKind::Severity(SeverityAxisGenerator),
            AxisGeneratorKind::Team(TeamAxisGenerator::new(teams)),
            AxisGeneratorKind::Coverage(CoverageAxisGenerator),
        ]
    }
}

#[async_trait]
impl AxisGenerator for AxisGeneratorKind {
    fn code(&self) -> &'static str {
        match self {
            AxisGeneratorKind::Country(g) => g.code(),
            AxisGeneratorKind::Severity(g) => g.code(),
            AxisGeneratorKind::Team(g) => g.code(),
            AxisGeneratorKind::Coverage(g) => g.code(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AxisGeneratorKind::Country(g) => g.name(),
            AxisGeneratorKind::Severity(g) => g.name(),
            AxisGeneratorKind::Team(g) => g.name(),
            AxisGeneratorKind::Coverage(g) => g.name(),
        }
    }

    async fn points(&self, project_id: i64) -> Result<Vec<AxisPoint>> {
        match self {
            AxisGeneratorKind::Country(g) => g.points(project_id).await,
            AxisGeneratorKind::Severity(g) => g.points(project_id).await,
            AxisGeneratorKind::Team(g) => g.points(project_id).await,
            AxisGeneratorKind::Coverage(g) => g.points(project_id).await,
        }
    }

    fn value_points(&self, functionality: &Functionality) -> Option<Vec<String>> {
        match self {
            AxisGeneratorKind::Country(g) => g.value_points(functionality),
            AxisGeneratorKind::Severity(g) => g.value_points(functionality),
            AxisGeneratorKind::Team(g) => g.value_points(functionality),
            AxisGeneratorKind::Coverage(g) => g.value_points(functionality),
        }
    }

    fn skips_unlisted_points(&self) -> bool {
        match self {
            AxisGeneratorKind::Country(g) => g.skips_unlisted_points(),
            AxisGeneratorKind::Severity(g) => g.skips_unlisted_points(),
            AxisGeneratorKind::Team(g) => g.skips_unlisted_points(),
            AxisGeneratorKind::Coverage(g) => g.skips_unlisted_points(),
        }
    }

    async fn hidden_points(&self, project_id: i64) -> Result<Vec<String>> {
        match self {
            AxisGeneratorKind::Country(g) => g.hidden_points(project_id).await,
            AxisGeneratorKind::Severity(g) => g.hidden_points(project_id).await,
            AxisGeneratorKind::Team(g) => g.hidden_points(project_id).await,
            AxisGeneratorKind::Coverage(g) => g.hidden_points(project_id).await,
        }
    }
}

//! 🧮 The coverage service: counts functionalities into every cell of the cube.
//!
//! 🎬 *[a functionality walks into the cube. it is HIGH severity, owned by Buy, shipped
//! to fr and us, and COVERED. the cube asks: "so, where do you want to be counted?"
//! the functionality says: "yes."]*
//!
//! Each functionality is counted once in every cell it belongs to. On each axis it
//! belongs to ALL, plus every point it matches. The cells are the Cartesian product
//! of those per-axis sets. For the walk-in above: {ALL, fr, us} × {ALL, HIGH} ×
//! {ALL, Buy} × {ALL, COVERED} = 24 increments. Not 23. Not 25. 24.
//!
//! ⚠️ Read-only. Nothing here writes anywhere. Call it twice on unchanged data,
//! get the same cube twice.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, trace, warn};

use crate::axes::{AxisGenerator, AxisGeneratorKind};
use crate::common::{Functionality, FunctionalityType};
use crate::cube::{Axis, AxisPoint, CoverageCube};
use crate::repositories::{CountryRepository, FunctionalityRepository, TeamRepository};

/// 🧮 Computes coverage cubes for projects.
#[derive(Debug)]
pub struct CoverageService {
    functionalities: Arc<dyn FunctionalityRepository>,
    generators: Vec<AxisGeneratorKind>,
}

impl CoverageService {
    /// 🏗️ Wire the service to its three data collaborators. The axes are the
    /// standard four, in the standard order.
    pub fn new(
        functionalities: Arc<dyn FunctionalityRepository>,
        countries: Arc<dyn CountryRepository>,
        teams: Arc<dyn TeamRepository>,
    ) -> Self {
        Self {
            functionalities,
            generators: AxisGeneratorKind::standard(countries, teams),
        }
    }

    /// 🚀 Build the whole cube for one project.
    ///
    /// Errors when a repository fails, or when a generator hands out a point id its
    /// own axis does not list (a bug, not a data problem: the computation aborts
    /// rather than quietly dropping counts).
    pub async fn compute_coverage(&self, project_id: i64) -> Result<CoverageCube> {
        let mut axes = Vec::with_capacity(self.generators.len());
        let mut unlisted = Vec::with_capacity(self.generators.len());
        for generator in &self.generators {
            axes.push(Axis {
                code: generator.code().to_string(),
                name: generator.name().to_string(),
                points: all_points(generator, project_id).await?,
            });
            unlisted.push(unlisted_points(generator, project_id).await?);
        }

        let functionalities = self
            .functionalities
            .find_all_by_project_id_and_type(project_id, FunctionalityType::Functionality)
            .await
            .context(format!(
                "💀 Could not load the functionalities of project {project_id}"
            ))?;

        debug!(
            "📏 Project {}: axes {:?}, {} functionalities",
            project_id,
            axes.iter()
                .map(|axis| format!("{}={}", axis.code, axis.len()))
                .collect::<Vec<_>>(),
            functionalities.len()
        );

        let values = compute_values(&functionalities, &axes, &self.generators, &unlisted)
            .context(format!("💀 Coverage computation aborted for project {project_id}"))?;

        let cube = CoverageCube { axes, values };
        info!(
            "✅ Computed coverage of project {}: {} functionalities over {} cells",
            project_id,
            cube.total(),
            cube.values.len()
        );
        Ok(cube)
    }
}

/// 📍 `[ALL] ++ generator.points(project_id)`.
pub async fn all_points<G: AxisGenerator + ?Sized>(
    generator: &G,
    project_id: i64,
) -> Result<Vec<AxisPoint>> {
    let mut points = vec![AxisPoint::all()];
    points.extend(generator.points(project_id).await?);
    Ok(points)
}

/// 🙈 What to do with a value id that has no point on its axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlistedPoints {
    /// 💀 The generator contradicted itself. Abort the computation.
    Fail,
    /// Count the functionality under ALL only. Ids in `hidden` were left off the
    /// axis on purpose; any other id is a data problem and gets a warning.
    CountUnderAll { hidden: Vec<String> },
}

/// 📜 How `generator`'s axis treats ids it does not list, for one project.
pub async fn unlisted_points<G: AxisGenerator + ?Sized>(
    generator: &G,
    project_id: i64,
) -> Result<UnlistedPoints> {
    if !generator.skips_unlisted_points() {
        return Ok(UnlistedPoints::Fail);
    }
    Ok(UnlistedPoints::CountUnderAll {
        hidden: generator.hidden_points(project_id).await?,
    })
}

/// 🧮 Count every functionality into a freshly zeroed flat array.
///
/// `axes`, `generators` and `unlisted` are parallel: `generators[i]` produced `axes[i]`.
pub fn compute_values<G: AxisGenerator>(
    functionalities: &[Functionality],
    axes: &[Axis],
    generators: &[G],
    unlisted: &[UnlistedPoints],
) -> Result<Vec<u32>> {
    let size = axes.iter().try_fold(1usize, |size, axis| {
        size.checked_mul(axis.len())
            .context("💀 The coverage cube has more cells than this machine can count")
    })?;
    let mut values = vec![0u32; size];

    for functionality in functionalities {
        let mut coordinate_sets = Vec::with_capacity(axes.len());
        for ((axis, generator), unlisted) in axes.iter().zip(generators).zip(unlisted) {
            coordinate_sets.push(coordinates_on_axis(
                axis,
                generator.value_points(functionality),
                unlisted,
            )?);
        }
        trace!(
            "🎯 Functionality {} lands on {:?}",
            functionality.id, coordinate_sets
        );
        increment_cells(&mut values, axes, &coordinate_sets);
    }

    Ok(values)
}

/// 🎯 Where does a functionality sit on one axis? Always at ALL (index 0),
/// plus at each matched point. Duplicate matches count once.
///
/// An id missing from the axis is a bug in the generator and fails the
/// computation, unless `unlisted` says that axis counts such values under ALL only.
pub fn coordinates_on_axis(
    axis: &Axis,
    value_points: Option<Vec<String>>,
    unlisted: &UnlistedPoints,
) -> Result<Vec<usize>> {
    let mut coordinates = vec![0];
    for id in value_points.unwrap_or_default() {
        match index_of(&axis.points, &id) {
            Some(index) => {
                if !coordinates.contains(&index) {
                    coordinates.push(index);
                }
            }
            None => match unlisted {
                UnlistedPoints::CountUnderAll { hidden } if hidden.contains(&id) => {
                    trace!("🙈 '{}' is hidden from the {} axis, counting under ALL only", id, axis.code);
                }
                UnlistedPoints::CountUnderAll { .. } => {
                    warn!(
                        "⚠️ '{}' matches nothing known to the {} axis (deleted? another project?), \
                         counting under ALL only",
                        id, axis.code
                    );
                }
                UnlistedPoints::Fail => bail!(
                    "💀 Point '{}' is not on the {} axis. Ids come from the axis generator itself, \
                     so this is a bug in that generator",
                    id,
                    axis.code
                ),
            },
        }
    }
    Ok(coordinates)
}

/// ➕ Increment every cell of the Cartesian product of `coordinate_sets`.
///
/// Walks the product like an odometer: the first axis ticks fastest, and carries
/// roll over into the next. One increment per combination.
pub fn increment_cells(values: &mut [u32], axes: &[Axis], coordinate_sets: &[Vec<usize>]) {
    if coordinate_sets.iter().any(|set| set.is_empty()) {
        return;
    }
    let mut odometer = vec![0usize; coordinate_sets.len()];
    let mut coordinates = vec![0usize; coordinate_sets.len()];
    loop {
        for (level, set) in coordinate_sets.iter().enumerate() {
            coordinates[level] = set[odometer[level]];
        }
        values[flat_index(axes, &coordinates)] += 1;

        let mut level = 0;
        loop {
            if level == odometer.len() {
                return;
            }
            odometer[level] += 1;
            if odometer[level] < coordinate_sets[level].len() {
                break;
            }
            odometer[level] = 0;
            level += 1;
        }
    }
}

/// 🔍 Position of the point with this id, if any.
pub fn index_of(points: &[AxisPoint], id: &str) -> Option<usize> {
    points.iter().position(|point| point.id == id)
}

/// 🔢 Mixed-radix flat index, axis 0 varying fastest.
pub fn flat_index(axes: &[Axis], coordinates: &[usize]) -> usize {
    let mut index = 0;
    let mut multiplier = 1;
    for (axis, &coordinate) in axes.iter().zip(coordinates) {
        index += coordinate * multiplier;
        multiplier *= axis.len();
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::common::{FunctionalitySeverity, Scenario, Team};
    use crate::repositories::{Dataset, InMemoryStore};

    const A_PROJECT_ID: i64 = 42;

    /// 🎭 A generator that says whatever the test tells it to say.
    #[derive(Debug, Default)]
    struct ScriptedGenerator {
        points: Vec<&'static str>,
        value_points: Option<Vec<&'static str>>,
    }

    #[async_trait]
    impl AxisGenerator for ScriptedGenerator {
        fn code(&self) -> &'static str {
            "scripted"
        }

        fn name(&self) -> &'static str {
            "Scripted"
        }

        async fn points(&self, _project_id: i64) -> Result<Vec<AxisPoint>> {
            Ok(self
                .points
                .iter()
                .map(|id| AxisPoint::new(*id, *id, None))
                .collect())
        }

        fn value_points(&self, _functionality: &Functionality) -> Option<Vec<String>> {
            self.value_points
                .as_ref()
                .map(|ids| ids.iter().map(|id| id.to_string()).collect())
        }
    }

    fn axis(ids: &[&str]) -> Axis {
        let mut points = vec![AxisPoint::all()];
        points.extend(ids.iter().map(|id| AxisPoint::new(*id, *id, None)));
        Axis {
            code: "test".to_string(),
            name: "Test".to_string(),
            points,
        }
    }

    fn dimension_of_size(size: usize) -> Axis {
        Axis {
            code: "dim".to_string(),
            name: "Dim".to_string(),
            points: (0..size)
                .map(|i| AxisPoint::new(i.to_string(), i.to_string(), None))
                .collect(),
        }
    }

    fn ids(ids: &[&str]) -> Option<Vec<String>> {
        Some(ids.iter().map(|id| id.to_string()).collect())
    }

    #[tokio::test]
    async fn the_one_where_all_shows_up_first_and_the_rest_keep_their_order() -> Result<()> {
        let generator = ScriptedGenerator {
            points: vec!["Z", "A"],
            ..ScriptedGenerator::default()
        };

        let points = all_points(&generator, A_PROJECT_ID).await?;
        let ids: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["*", "Z", "A"]);
        Ok(())
    }

    #[test]
    fn the_one_where_compute_values_increments_all_and_value_points() -> Result<()> {
        let functionality = Functionality::new(1, A_PROJECT_ID, "f");
        let generators = vec![
            ScriptedGenerator {
                value_points: Some(vec!["A"]),
                ..ScriptedGenerator::default()
            },
            ScriptedGenerator {
                value_points: Some(vec![]),
                ..ScriptedGenerator::default()
            },
        ];
        let axes = vec![axis(&["A", "B"]), axis(&["1"])];

        let values = compute_values(
            &[functionality],
            &axes,
            &generators,
            &[UnlistedPoints::Fail, UnlistedPoints::Fail],
        )?;

        assert_eq!(
            values,
            vec![
                1, // ALL, ALL
                1, // "A", ALL
                0, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn the_one_where_two_matches_on_one_axis_fan_out_across_the_other() -> Result<()> {
        let axes = vec![axis(&["A", "B"]), axis(&["1", "2", "3"])];
        let sets = vec![
            coordinates_on_axis(&axes[0], ids(&["A"]), &UnlistedPoints::Fail)?,
            coordinates_on_axis(&axes[1], ids(&["1", "3"]), &UnlistedPoints::Fail)?,
        ];
        let mut values = vec![0; 3 * 4];

        increment_cells(&mut values, &axes, &sets);

        assert_eq!(
            values,
            vec![
                1, // ALL, ALL
                1, // "A", ALL
                0, //
                1, // ALL, "1"
                1, // "A", "1"
                0, 0, 0, 0, //
                1, // ALL, "3"
                1, // "A", "3"
                0,
            ]
        );
        Ok(())
    }

    #[test]
    fn the_one_where_no_match_means_all_and_nothing_else() -> Result<()> {
        let axes = vec![axis(&["A"])];
        let sets = vec![coordinates_on_axis(&axes[0], None, &UnlistedPoints::Fail)?];
        let mut values = vec![0; 2];

        increment_cells(&mut values, &axes, &sets);

        assert_eq!(values, vec![1, 0]);
        Ok(())
    }

    #[test]
    fn the_one_where_a_duplicated_match_is_still_counted_once() -> Result<()> {
        let set = coordinates_on_axis(&axis(&["fr", "us"]), ids(&["fr", "fr"]), &UnlistedPoints::Fail)?;
        assert_eq!(set, vec![0, 1]);
        Ok(())
    }

    #[test]
    fn the_one_where_an_unknown_point_is_a_bug_and_says_so() {
        let result = coordinates_on_axis(&axis(&["A"]), ids(&["404"]), &UnlistedPoints::Fail);

        let err = result.expect_err("💀 an unknown id must not be silently dropped");
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn the_one_where_a_lenient_axis_shrugs_at_unknown_points() -> Result<()> {
        let lenient = UnlistedPoints::CountUnderAll {
            hidden: vec!["7".to_string()],
        };

        assert_eq!(coordinates_on_axis(&axis(&["A"]), ids(&["7"]), &lenient)?, vec![0]);
        // -- not hidden on purpose either: still ALL only, just with a warning in the logs
        assert_eq!(coordinates_on_axis(&axis(&["A"]), ids(&["404"]), &lenient)?, vec![0]);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_only_the_team_axis_is_lenient_and_knows_who_it_hid() -> Result<()> {
        let store = Arc::new(InMemoryStore::new(Dataset {
            teams: vec![team(1, "Buy", true), team(2, "Infrastructure", false)],
            ..Dataset::default()
        }));
        let generators = AxisGeneratorKind::standard(store.clone(), store);

        let mut policies = Vec::new();
        for generator in &generators {
            policies.push(unlisted_points(generator, A_PROJECT_ID).await?);
        }

        assert_eq!(
            policies,
            vec![
                UnlistedPoints::Fail,
                UnlistedPoints::Fail,
                UnlistedPoints::CountUnderAll {
                    hidden: vec!["2".to_string()],
                },
                UnlistedPoints::Fail,
            ]
        );
        Ok(())
    }

    #[test]
    fn the_one_where_index_of_finds_things_at_the_start_and_in_the_middle() {
        let points = vec![
            AxisPoint::new("1", "1", None),
            AxisPoint::new("2", "2", None),
            AxisPoint::new("3", "3", None),
        ];
        assert_eq!(index_of(&points, "1"), Some(0));
        assert_eq!(index_of(&points, "3"), Some(2));
        assert_eq!(index_of(&[], "404"), None);
    }

    #[test]
    fn the_one_where_flat_index_works_in_one_two_and_three_dimensions() {
        assert_eq!(flat_index(&[dimension_of_size(3)], &[2]), 2);
        // -- (1) * 2 + (1*4) * 3
        assert_eq!(
            flat_index(&[dimension_of_size(4), dimension_of_size(5)], &[2, 3]),
            14
        );
        // -- (1) * 3 + (1*6) * 4 + (1*6*7) * 5
        assert_eq!(
            flat_index(
                &[dimension_of_size(6), dimension_of_size(7), dimension_of_size(8)],
                &[3, 4, 5]
            ),
            237
        );
    }

    // ===== End to end, through the standard four axes =====

    fn service_over(dataset: Dataset) -> CoverageService {
        let store = Arc::new(InMemoryStore::new(dataset));
        CoverageService::new(store.clone(), store.clone(), store)
    }

    fn team(id: i64, name: &str, assignable: bool) -> Team {
        Team {
            id,
            project_id: A_PROJECT_ID,
            name: name.to_string(),
            assigned_to_problems: true,
            assignable_to_functionalities: assignable,
        }
    }

    fn country(code: &str, name: &str) -> crate::common::Country {
        crate::common::Country {
            project_id: A_PROJECT_ID,
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn the_one_where_an_empty_project_still_gets_a_full_cube_of_zeros() -> Result<()> {
        let cube = service_over(Dataset {
            countries: vec![country("be", "Belgium")],
            ..Dataset::default()
        })
        .compute_coverage(A_PROJECT_ID)
        .await?;

        let sizes: Vec<usize> = cube.axes.iter().map(Axis::len).collect();
        assert_eq!(sizes, vec![2, 4, 1, 7]);
        assert_eq!(cube.values.len(), 2 * 4 * 7);
        assert!(cube.values.iter().all(|&v| v == 0));
        assert!(cube.axes.iter().all(|axis| axis.points[0].is_all()));
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_a_bare_functionality_touches_exactly_two_cells() -> Result<()> {
        let cube = service_over(Dataset {
            countries: vec![country("be", "Belgium")],
            teams: vec![team(1, "Buy", true)],
            functionalities: vec![Functionality::new(1, A_PROJECT_ID, "Lonely")],
        })
        .compute_coverage(A_PROJECT_ID)
        .await?;

        let not_covered = 6; // -- ALL + five levels before it
        assert_eq!(cube.values.iter().filter(|&&v| v > 0).count(), 2);
        assert_eq!(cube.value_at(&[0, 0, 0, 0]), Some(1));
        assert_eq!(cube.value_at(&[0, 0, 0, not_covered]), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_be_and_cn_each_get_their_count_and_all_gets_one() -> Result<()> {
        let cube = service_over(Dataset {
            countries: vec![country("be", "Belgium"), country("cn", "China"), country("fr", "France")],
            teams: vec![team(1, "Buy", true)],
            functionalities: vec![Functionality {
                country_codes: Some("be,cn".to_string()),
                severity: Some(FunctionalitySeverity::High),
                team_id: Some(1),
                scenarios: vec![Scenario {
                    id: 1,
                    name: "s".to_string(),
                    ignored: false,
                }],
                ..Functionality::new(1, A_PROJECT_ID, "Checkout")
            }],
        })
        .compute_coverage(A_PROJECT_ID)
        .await?;

        // -- {ALL, be, cn} × {ALL, HIGH} × {ALL, Buy} × {ALL, COVERED}
        assert_eq!(cube.values.iter().sum::<u32>(), 3 * 2 * 2 * 2);
        assert!(cube.values.iter().all(|&v| v <= 1));
        assert_eq!(cube.axis_totals(0), Some(vec![1, 1, 1, 0]));
        assert_eq!(cube.value_at(&[2, 1, 1, 1]), Some(1));
        assert_eq!(cube.value_at(&[3, 0, 0, 0]), Some(0));
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_a_team_that_cannot_own_functionalities_is_only_counted_in_all() -> Result<()> {
        let cube = service_over(Dataset {
            teams: vec![team(1, "Buy", true), team(2, "Infrastructure", false)],
            functionalities: vec![
                Functionality {
                    team_id: Some(2),
                    ..Functionality::new(1, A_PROJECT_ID, "Servers")
                },
                Functionality {
                    team_id: Some(99),
                    ..Functionality::new(2, A_PROJECT_ID, "Owned by a deleted team")
                },
            ],
            ..Dataset::default()
        })
        .compute_coverage(A_PROJECT_ID)
        .await?;

        let team_axis = cube.axis_index("team").expect("💀 the team axis went missing");
        assert_eq!(cube.axes[team_axis].len(), 2);
        assert_eq!(cube.axis_totals(team_axis), Some(vec![2, 0]));
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_a_trailing_comma_in_the_country_list_is_just_a_comma() -> Result<()> {
        let cube = service_over(Dataset {
            countries: vec![country("fr", "France"), country("us", "United States")],
            functionalities: vec![Functionality {
                country_codes: Some("fr,".to_string()),
                ..Functionality::new(1, A_PROJECT_ID, "Checkout")
            }],
            ..Dataset::default()
        })
        .compute_coverage(A_PROJECT_ID)
        .await?;

        assert_eq!(cube.axis_totals(0), Some(vec![1, 1, 0]));
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_a_country_nobody_declared_aborts_the_whole_thing() {
        let result = service_over(Dataset {
            countries: vec![country("be", "Belgium")],
            functionalities: vec![Functionality {
                country_codes: Some("xx".to_string()),
                ..Functionality::new(1, A_PROJECT_ID, "Atlantis")
            }],
            ..Dataset::default()
        })
        .compute_coverage(A_PROJECT_ID)
        .await;

        let err = result.expect_err("💀 an undeclared country must fail loudly");
        assert!(format!("{err:#}").contains("'xx'"));
    }

    #[tokio::test]
    async fn the_one_where_all_equals_the_sum_of_single_valued_axes() -> Result<()> {
        let functionalities = (0..9)
            .map(|i| Functionality {
                severity: match i % 3 {
                    0 => Some(FunctionalitySeverity::High),
                    1 => Some(FunctionalitySeverity::Low),
                    _ => None,
                },
                started: Some(i % 2 == 0),
                ..Functionality::new(i, A_PROJECT_ID, format!("f{i}"))
            })
            .collect();
        let service = service_over(Dataset {
            functionalities,
            ..Dataset::default()
        });

        let cube = service.compute_coverage(A_PROJECT_ID).await?;
        let again = service.compute_coverage(A_PROJECT_ID).await?;
        assert_eq!(cube, again);

        assert_eq!(cube.total(), 9);
        let severities = cube.axis_totals(1).expect("💀 severity axis");
        assert_eq!(severities, vec![9, 3, 0, 3]);
        let levels = cube.axis_totals(3).expect("💀 coverage axis");
        assert_eq!(levels[0], levels[1..].iter().sum::<u32>());
        Ok(())
    }
}

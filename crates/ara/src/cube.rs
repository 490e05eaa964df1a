//! 🧊 The coverage cube: what the frontend gets, what the CLI prints.
//!
//! A list of axes and one flat array of counts. The array is a multi-dimensional
//! table squashed into one dimension with mixed-radix encoding, axis 0 varying fastest:
//!
//! ```text
//! index = c0 + c1 * len(axis0) + c2 * len(axis0) * len(axis1) + ...
//! ```
//!
//! Point 0 of every axis is [`AxisPoint::all`]. Holding every axis at 0 gives the
//! total number of functionalities. Holding all but one axis at 0 gives that axis's
//! breakdown.

use serde::{Deserialize, Serialize};

/// 📍 One discrete value on an axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisPoint {
    pub id: String,
    pub name: String,
    pub tooltip: Option<String>,
}

impl AxisPoint {
    /// 🏷️ The reserved id of the aggregate point. Generators never hand it out.
    pub const ALL_ID: &'static str = "*";

    pub fn new(id: impl Into<String>, name: impl Into<String>, tooltip: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tooltip,
        }
    }

    /// 🌐 The "everything" point, prepended to every axis by the coverage service.
    pub fn all() -> Self {
        Self::new(Self::ALL_ID, "All", None)
    }

    pub fn is_all(&self) -> bool {
        self.id == Self::ALL_ID
    }
}

/// 📏 One dimension of the cube.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub code: String,
    pub name: String,
    pub points: Vec<AxisPoint>,
}

impl Axis {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 🧊 Axes plus the flattened counts. Built fresh per computation, never mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCube {
    pub axes: Vec<Axis>,
    pub values: Vec<u32>,
}

impl CoverageCube {
    /// 🔢 Mixed-radix encode a coordinate tuple. `None` when any coordinate is out of
    /// its axis's bounds, or when the tuple has the wrong number of dimensions.
    pub fn flat_index(&self, coordinates: &[usize]) -> Option<usize> {
        if coordinates.len() != self.axes.len() {
            return None;
        }
        let mut index = 0;
        let mut multiplier = 1;
        for (axis, &coordinate) in self.axes.iter().zip(coordinates) {
            if coordinate >= axis.len() {
                return None;
            }
            index += coordinate * multiplier;
            multiplier *= axis.len();
        }
        Some(index)
    }

    /// 🔓 The inverse of [`Self::flat_index`]. `None` past the end, or when the cube
    /// is malformed (an empty axis, or `values` not sized to the axes).
    pub fn coordinates_of(&self, flat_index: usize) -> Option<Vec<usize>> {
        if flat_index >= self.values.len() || !self.is_well_formed() {
            return None;
        }
        let mut remainder = flat_index;
        let mut coordinates = Vec::with_capacity(self.axes.len());
        for axis in &self.axes {
            coordinates.push(remainder % axis.len());
            remainder /= axis.len();
        }
        Some(coordinates)
    }

    /// 📐 Every axis has points and `values` holds exactly one count per cell.
    pub fn is_well_formed(&self) -> bool {
        let expected_len = self
            .axes
            .iter()
            .try_fold(1usize, |len, axis| len.checked_mul(axis.len()));
        !self.axes.iter().any(Axis::is_empty) && expected_len == Some(self.values.len())
    }

    pub fn value_at(&self, coordinates: &[usize]) -> Option<u32> {
        self.flat_index(coordinates)
            .and_then(|index| self.values.get(index).copied())
    }

    /// 🌐 The ALL/ALL/.../ALL cell: how many functionalities were counted at all.
    pub fn total(&self) -> u32 {
        self.values.first().copied().unwrap_or(0)
    }

    /// 📊 Count per point of one axis, every other axis held at ALL.
    ///
    /// Index 0 of the result is the ALL point, same as the axis itself.
    pub fn axis_totals(&self, axis_index: usize) -> Option<Vec<u32>> {
        let axis = self.axes.get(axis_index)?;
        let mut coordinates = vec![0; self.axes.len()];
        (0..axis.len())
            .map(|point_index| {
                coordinates[axis_index] = point_index;
                self.value_at(&coordinates)
            })
            .collect()
    }

    /// 🔍 Find an axis by its code (`"country"`, `"team"`, ...).
    pub fn axis_index(&self, code: &str) -> Option<usize> {
        self.axes.iter().position(|axis| axis.code == code)
    }
}

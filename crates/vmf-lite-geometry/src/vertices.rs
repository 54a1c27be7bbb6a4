// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex extraction from bounding planes
//!
//! A brush is the intersection of half-spaces `{p : p·n <= d}`. Its vertices
//! are found by intersecting every triple of planes and keeping the points that
//! lie inside all remaining half-spaces. The search is O(n³) in the number of
//! sides, produces vertices in triple order, and keeps duplicates where more
//! than three planes meet.

use crate::{Error, Point3, Result, Vector3};
use log::warn;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use vmf_lite_model::{Plane, Vec3};

/// Triple products at or below this magnitude mark parallel planes
pub const DEFAULT_DEGENERATE_EPSILON: f64 = 1e-6;

/// Slack allowed when testing a candidate against the other half-spaces
pub const DEFAULT_CONTAINMENT_EPSILON: f64 = 1e-5;

/// Numerical tolerances for vertex extraction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    /// Skip plane triples whose normals' triple product is within this of zero
    pub degenerate: f64,
    /// Accept candidates up to this far outside a half-space
    pub containment: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            degenerate: DEFAULT_DEGENERATE_EPSILON,
            containment: DEFAULT_CONTAINMENT_EPSILON,
        }
    }
}

/// Which side of a plane counts as inside
///
/// Plane normals follow the winding of the three stored points. Files written
/// by the Hammer editor list points so that this normal faces into the brush;
/// hand-built planes often face out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Winding {
    /// Normals face out of the brush as computed
    AsDefined,
    /// Normals face into the brush and are flipped before use
    Reversed,
    /// Decide per solid from the centroid of its plane points
    ///
    /// Every plane whose boundary is further than the containment tolerance
    /// from the centroid votes. A strict majority of planes seeing the centroid
    /// outside selects [`Winding::Reversed`]; ties, including solids where no
    /// plane votes, resolve to [`Winding::AsDefined`].
    #[default]
    Auto,
}

/// Options for vertex extraction
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExtractionOptions {
    pub tolerances: Tolerances,
    pub winding: Winding,
    /// Fan plane triples out over the rayon thread pool
    pub parallel: bool,
}

impl ExtractionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the numerical tolerances
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Set the winding convention
    pub fn with_winding(mut self, winding: Winding) -> Self {
        self.winding = winding;
        self
    }

    /// Set whether to use the rayon thread pool
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

/// Half-space `{p : p·normal <= distance}` with a unit normal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfSpace {
    pub normal: Vector3<f64>,
    pub distance: f64,
}

impl HalfSpace {
    /// Create from a normal (normalized here) and a distance along it
    ///
    /// A zero normal yields a half-space that contains everything and never
    /// takes part in an intersection.
    pub fn new(normal: Vector3<f64>, distance: f64) -> Self {
        let len = normal.norm();
        if len <= f64::EPSILON {
            return Self::unbounded();
        }
        Self {
            normal: normal / len,
            distance: distance / len,
        }
    }

    /// Half-space containing all of space
    pub fn unbounded() -> Self {
        Self {
            normal: Vector3::zeros(),
            distance: 0.0,
        }
    }

    /// Half-space of a three-point plane, `None` if the points are collinear
    ///
    /// The normal is `(v2 - v1) × (v3 - v2)` normalized, so it follows the
    /// winding of the stored points.
    pub fn from_plane(plane: &Plane) -> Option<Self> {
        let [v1, v2, v3] = plane.points().map(to_point);
        let normal = (v2 - v1).cross(&(v3 - v2)).try_normalize(f64::EPSILON)?;
        Some(Self {
            normal,
            distance: v1.coords.dot(&normal),
        })
    }

    /// The complementary half-space sharing the same boundary plane
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    /// `p·n - d`: negative inside, positive outside
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        point.coords.dot(&self.normal) - self.distance
    }

    /// Check `p·n <= d + slack`
    #[inline]
    pub fn contains(&self, point: &Point3<f64>, slack: f64) -> bool {
        point.coords.dot(&self.normal) <= self.distance + slack
    }
}

/// Model vector as an nalgebra point
#[inline]
pub fn to_point(v: Vec3) -> Point3<f64> {
    Point3::new(v.x, v.y, v.z)
}

/// Point shared by three planes, `None` if they do not meet in one point
///
/// Solves the 3x3 system in closed form:
/// `p = (d₁(n₂×n₃) + d₂(n₃×n₁) + d₃(n₁×n₂)) / (n₁·(n₂×n₃))`.
#[inline]
pub fn intersect(
    a: &HalfSpace,
    b: &HalfSpace,
    c: &HalfSpace,
    degenerate: f64,
) -> Option<Point3<f64>> {
    let bc = b.normal.cross(&c.normal);
    let t = a.normal.dot(&bc);
    if t.abs() <= degenerate || !t.is_finite() {
        return None;
    }

    let ca = c.normal.cross(&a.normal);
    let ab = a.normal.cross(&b.normal);
    let p = (bc * a.distance + ca * b.distance + ab * c.distance) / t;
    Some(Point3::from(p))
}

/// All vertices produced by triples whose lowest index is `i`
fn vertices_from(i: usize, spaces: &[HalfSpace], tolerances: &Tolerances) -> Vec<Point3<f64>> {
    let n = spaces.len();
    let mut out = Vec::new();

    for j in i + 1..n {
        for k in j + 1..n {
            let Some(point) = intersect(&spaces[i], &spaces[j], &spaces[k], tolerances.degenerate)
            else {
                continue;
            };

            let inside = spaces
                .iter()
                .enumerate()
                .filter(|(m, _)| *m != i && *m != j && *m != k)
                .all(|(_, space)| space.contains(&point, tolerances.containment));

            if inside {
                out.push(point);
            }
        }
    }

    out
}

/// Vertices of the intersection of `spaces`
///
/// Sequential, in triple order `(i, j, k)` with `i < j < k`.
pub fn extract_vertices(spaces: &[HalfSpace], tolerances: &Tolerances) -> Vec<Point3<f64>> {
    (0..spaces.len())
        .flat_map(|i| vertices_from(i, spaces, tolerances))
        .collect()
}

/// Vertices of the intersection of `spaces`, with options and cancellation
///
/// The result is identical to [`extract_vertices`] whether or not the work is
/// spread over threads. `cancel` is polled once per first-plane index.
pub fn extract_vertices_with(
    spaces: &[HalfSpace],
    options: &ExtractionOptions,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<Point3<f64>>> {
    let tolerances = &options.tolerances;
    let cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));

    let batches: Option<Vec<Vec<Point3<f64>>>> = if options.parallel {
        (0..spaces.len())
            .into_par_iter()
            .map(|i| (!cancelled()).then(|| vertices_from(i, spaces, tolerances)))
            .collect()
    } else {
        (0..spaces.len())
            .map(|i| (!cancelled()).then(|| vertices_from(i, spaces, tolerances)))
            .collect()
    };

    batches
        .map(|b| b.into_iter().flatten().collect())
        .ok_or(Error::Cancelled)
}

/// Detect the winding of a set of planes
///
/// The average of all plane-defining points lies inside a closed convex
/// brush. Each plane votes on whether that point is on its inner side,
/// abstaining when it lies within `tolerances.containment` of the boundary;
/// a strict majority of outer votes selects [`Winding::Reversed`], anything
/// else [`Winding::AsDefined`].
pub fn detect_winding<'a>(
    planes: impl IntoIterator<Item = &'a Plane>,
    tolerances: &Tolerances,
) -> Winding {
    let planes: Vec<&Plane> = planes.into_iter().collect();
    if planes.is_empty() {
        return Winding::AsDefined;
    }

    let sum: Vector3<f64> = planes
        .iter()
        .flat_map(|p| p.points())
        .map(|v| to_point(v).coords)
        .sum();
    let centroid = Point3::from(sum / (planes.len() * 3) as f64);

    let (mut inside, mut outside) = (0usize, 0usize);
    for space in planes.iter().filter_map(|p| HalfSpace::from_plane(p)) {
        let s = space.signed_distance(&centroid);
        if s < -tolerances.containment {
            inside += 1;
        } else if s > tolerances.containment {
            outside += 1;
        }
    }

    if outside > inside {
        Winding::Reversed
    } else {
        Winding::AsDefined
    }
}

/// Half-spaces of `planes` oriented according to `winding`
///
/// Collinear planes become unbounded half-spaces and are logged.
pub fn half_spaces<'a>(
    planes: impl IntoIterator<Item = &'a Plane> + Clone,
    winding: Winding,
    tolerances: &Tolerances,
) -> Vec<HalfSpace> {
    let flip = match winding {
        Winding::AsDefined => false,
        Winding::Reversed => true,
        Winding::Auto => detect_winding(planes.clone(), tolerances) == Winding::Reversed,
    };

    planes
        .into_iter()
        .map(|plane| match HalfSpace::from_plane(plane) {
            Some(space) if flip => space.flipped(),
            Some(space) => space,
            None => {
                warn!("degenerate plane {} has no normal, ignoring it", plane);
                HalfSpace::unbounded()
            }
        })
        .collect()
}

/// Merge points closer than `tolerance`, keeping first occurrences in order
///
/// Points are bucketed on a grid of cell size `tolerance`; each point is
/// compared against the 27 surrounding cells.
pub fn weld_vertices(points: &[Point3<f64>], tolerance: f64) -> Vec<Point3<f64>> {
    let cell = tolerance.max(f64::EPSILON);
    let key = |p: &Point3<f64>| {
        (
            (p.x / cell).floor() as i64,
            (p.y / cell).floor() as i64,
            (p.z / cell).floor() as i64,
        )
    };

    let mut grid: FxHashMap<(i64, i64, i64), Vec<usize>> = FxHashMap::default();
    let mut out: Vec<Point3<f64>> = Vec::new();

    for point in points {
        let (x, y, z) = key(point);
        let mut duplicate = false;

        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(bucket) = grid.get(&(x + dx, y + dy, z + dz)) {
                        if bucket
                            .iter()
                            .any(|&idx| (out[idx] - *point).norm() <= tolerance)
                        {
                            duplicate = true;
                            break 'search;
                        }
                    }
                }
            }
        }

        if !duplicate {
            grid.entry((x, y, z)).or_default().push(out.len());
            out.push(*point);
        }
    }

    out
}

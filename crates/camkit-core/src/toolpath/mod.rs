//! Canonical toolpath model.
//!
//! A [`Toolpath`] is an append-only sequence of [`MotionPoint`]s. Bounds,
//! length and per-type counts are derived on every read rather than kept up
//! to date incrementally.

mod point;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use point::{ArcDirection, ArcForm, ArcParams, DrillCycle, Motion, MotionPoint, MotionType};

/// Feed assumed for time estimates when no feed was ever given (units/min)
pub const DEFAULT_FEED_RATE: f64 = 1000.0;

/// Rapids run this many times faster than the current feed
pub const RAPID_FACTOR: f64 = 3.0;

/// Axis-aligned bounding box of a toolpath.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    /// Degenerate box holding one position.
    pub fn at(position: [f64; 3]) -> Self {
        Self {
            min_x: position[0],
            max_x: position[0],
            min_y: position[1],
            max_y: position[1],
            min_z: position[2],
            max_z: position[2],
        }
    }

    /// Grows the box to include `position`.
    pub fn include(&mut self, position: [f64; 3]) {
        self.min_x = self.min_x.min(position[0]);
        self.max_x = self.max_x.max(position[0]);
        self.min_y = self.min_y.min(position[1]);
        self.max_y = self.max_y.max(position[1]);
        self.min_z = self.min_z.min(position[2]);
        self.max_z = self.max_z.max(position[2]);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut merged = *self;
        merged.include([other.min_x, other.min_y, other.min_z]);
        merged.include([other.max_x, other.max_y, other.max_z]);
        merged
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }

    pub fn contains(&self, position: [f64; 3]) -> bool {
        (self.min_x..=self.max_x).contains(&position[0])
            && (self.min_y..=self.max_y).contains(&position[1])
            && (self.min_z..=self.max_z).contains(&position[2])
    }
}

/// A complete toolpath made up of ordered motion points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Toolpath {
    points: Vec<MotionPoint>,
    /// Tool that produced the path, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<u32>,
    /// Cutter diameter, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_diameter: Option<f64>,
}

impl Toolpath {
    /// Creates a new empty toolpath.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty toolpath tagged with the tool that will cut it.
    pub fn for_tool(tool_id: u32, tool_diameter: f64) -> Self {
        debug_assert!(
            tool_diameter.is_finite() && tool_diameter > 0.0,
            "tool_diameter must be positive and finite, got {tool_diameter}"
        );
        Self {
            points: Vec::new(),
            tool_id: Some(tool_id),
            tool_diameter: Some(tool_diameter),
        }
    }

    pub fn from_points(points: Vec<MotionPoint>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Adds a point to the toolpath.
    pub fn push(&mut self, point: MotionPoint) {
        self.points.push(point);
    }

    pub fn extend<I: IntoIterator<Item = MotionPoint>>(&mut self, points: I) {
        self.points.extend(points);
    }

    pub fn points(&self) -> &[MotionPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MotionPoint> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<MotionPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&MotionPoint> {
        self.points.last()
    }

    /// Axis-aligned bounds over every spatial point; `None` when empty.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut spatial = self.points.iter().filter(|p| !p.is_dwell());
        let first = spatial.next()?;
        let mut bounds = Bounds::at(first.position());
        for point in spatial {
            bounds.include(point.position());
        }
        Some(bounds)
    }

    /// Sum of Euclidean distances between consecutive points.
    ///
    /// Dwells hold position and contribute nothing.
    pub fn length(&self) -> f64 {
        let mut previous: Option<&MotionPoint> = None;
        let mut total = 0.0;
        for point in self.points.iter().filter(|p| !p.is_dwell()) {
            if let Some(prev) = previous {
                total += prev.distance_to(point);
            }
            previous = Some(point);
        }
        total
    }

    /// Number of points per motion type.
    pub fn count_by_type(&self) -> BTreeMap<MotionType, usize> {
        let mut counts = BTreeMap::new();
        for point in &self.points {
            *counts.entry(point.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_of(&self, kind: MotionType) -> usize {
        self.points.iter().filter(|p| p.kind() == kind).count()
    }

    /// Distinct tool ids in order of first use.
    pub fn tool_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = Vec::new();
        for point in &self.points {
            if !ids.contains(&point.tool_id) {
                ids.push(point.tool_id);
            }
        }
        ids
    }

    /// Splits the path into runs of consecutive points sharing a tool id.
    pub fn split_by_tool(&self) -> Vec<Toolpath> {
        let mut runs: Vec<Toolpath> = Vec::new();
        for point in &self.points {
            match runs.last_mut() {
                Some(run) if run.tool_id == Some(point.tool_id) => run.push(point.clone()),
                _ => {
                    let mut run = Toolpath::new();
                    run.tool_id = Some(point.tool_id);
                    run.push(point.clone());
                    runs.push(run);
                }
            }
        }
        runs
    }

    /// Estimated run time in seconds.
    ///
    /// Starts at the origin. Cutting moves take `distance / feed`, rapids
    /// `distance / (feed * 3)`, and dwells add their seconds. Feeds are in
    /// units per minute; a point without a feed inherits the last one seen,
    /// falling back to [`DEFAULT_FEED_RATE`].
    pub fn machining_time_secs(&self) -> f64 {
        let mut position = [0.0, 0.0, 0.0];
        let mut feed = DEFAULT_FEED_RATE;
        let mut total = 0.0;

        for point in &self.points {
            if let Some(f) = point.feed_rate.filter(|f| *f > 0.0) {
                feed = f;
            }
            if let Some(seconds) = point.dwell_seconds() {
                total += seconds.max(0.0);
            }
            if point.is_dwell() {
                continue;
            }

            let target = point.position();
            let distance = ((target[0] - position[0]).powi(2)
                + (target[1] - position[1]).powi(2)
                + (target[2] - position[2]).powi(2))
            .sqrt();
            let per_second = feed / 60.0;
            total += match point.kind() {
                MotionType::Rapid => distance / (per_second * RAPID_FACTOR),
                _ => distance / per_second,
            };
            position = target;
        }
        total
    }

    /// Appends another toolpath's points.
    pub fn append(&mut self, other: Toolpath) {
        self.points.extend(other.points);
    }
}

impl<'a> IntoIterator for &'a Toolpath {
    type Item = &'a MotionPoint;
    type IntoIter = std::slice::Iter<'a, MotionPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<MotionPoint> for Toolpath {
    fn from_iter<I: IntoIterator<Item = MotionPoint>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::range::TimeRange;
use crate::core::types::DataPoint;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Chart kind shared by every series of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    Line,
    Bar,
    Area,
}

/// Stable series identity used for selection toggles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(String);

impl SeriesId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SeriesId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: SeriesId,
    pub name: String,
    pub color: Color,
    pub kind: ChartKind,
    pub points: Vec<DataPoint>,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl Series {
    #[must_use]
    pub fn new(
        id: impl Into<SeriesId>,
        name: impl Into<String>,
        color: Color,
        kind: ChartKind,
        points: Vec<DataPoint>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            kind,
            points,
            selected: true,
        }
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl From<String> for SeriesId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Validated multi-series dataset.
///
/// Every series has the same `x` sequence, so values are looked up by index.
/// Only the per-series `selected` flag is mutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRecord")]
pub struct Dataset {
    name: String,
    dual_y_axis: bool,
    percentage: bool,
    stacked: bool,
    series: Vec<Series>,
    #[serde(default)]
    details: BTreeMap<i64, Dataset>,
}

/// Unvalidated wire shape of [`Dataset`].
#[derive(Deserialize)]
struct DatasetRecord {
    name: String,
    #[serde(default)]
    dual_y_axis: bool,
    #[serde(default)]
    percentage: bool,
    #[serde(default)]
    stacked: bool,
    series: Vec<Series>,
    #[serde(default)]
    details: BTreeMap<i64, Dataset>,
}

impl TryFrom<DatasetRecord> for Dataset {
    type Error = ChartError;

    fn try_from(record: DatasetRecord) -> ChartResult<Self> {
        let mut dataset = Self::new(record.name, record.series)?
            .with_dual_y_axis(record.dual_y_axis)
            .with_percentage(record.percentage)
            .with_stacked(record.stacked);
        dataset.details = record.details;
        Ok(dataset)
    }
}

impl Dataset {
    /// Builds a dataset after checking the shared-axis invariants.
    pub fn new(name: impl Into<String>, series: Vec<Series>) -> ChartResult<Self> {
        validate_series(&series)?;
        Ok(Self {
            name: name.into(),
            dual_y_axis: false,
            percentage: false,
            stacked: false,
            series,
            details: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn with_dual_y_axis(mut self, enabled: bool) -> Self {
        self.dual_y_axis = enabled;
        self
    }

    #[must_use]
    pub fn with_stacked(mut self, enabled: bool) -> Self {
        self.stacked = enabled;
        self
    }

    #[must_use]
    pub fn with_percentage(mut self, enabled: bool) -> Self {
        self.percentage = enabled;
        self
    }

    /// Attaches a drill-down dataset for the day starting at `timestamp`.
    #[must_use]
    pub fn with_detail(mut self, timestamp: f64, detail: Dataset) -> Self {
        self.details.insert(detail_key(timestamp), detail);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dual_y_axis(&self) -> bool {
        self.dual_y_axis
    }

    #[must_use]
    pub fn percentage(&self) -> bool {
        self.percentage
    }

    #[must_use]
    pub fn stacked(&self) -> bool {
        self.stacked
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.series[0].kind
    }

    /// Number of points per series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series[0].points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn timestamp(&self, index: usize) -> f64 {
        self.series[0].points[index].x
    }

    pub fn timestamps(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.series[0].points.iter().map(|point| point.x)
    }

    /// Full `[first, last]` timestamp range.
    #[must_use]
    pub fn time_range(&self) -> TimeRange {
        let points = &self.series[0].points;
        TimeRange::new(points[0].x, points[points.len() - 1].x)
    }

    /// Distance between the first two timestamps, or `0` for one point.
    #[must_use]
    pub fn point_spacing(&self) -> f64 {
        let points = &self.series[0].points;
        if points.len() < 2 {
            0.0
        } else {
            points[1].x - points[0].x
        }
    }

    /// Series scaled by the second Y axis: the last one, in dual mode with
    /// more than one series.
    #[must_use]
    pub fn second_axis_series(&self) -> Option<usize> {
        (self.dual_y_axis && self.series.len() > 1).then(|| self.series.len() - 1)
    }

    #[must_use]
    pub fn series_index(&self, id: &SeriesId) -> Option<usize> {
        self.series.iter().position(|series| &series.id == id)
    }

    /// Updates a selection flag and reports whether it changed.
    pub fn set_series_selected(&mut self, id: &SeriesId, selected: bool) -> bool {
        match self.series.iter_mut().find(|series| &series.id == id) {
            Some(series) if series.selected != selected => {
                series.selected = selected;
                true
            }
            _ => false,
        }
    }

    /// Indices of series with `selected == true`, in dataset order.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        self.series
            .iter()
            .enumerate()
            .filter_map(|(index, series)| series.selected.then_some(index))
            .collect()
    }

    #[must_use]
    pub fn detail_at(&self, timestamp: f64) -> Option<&Dataset> {
        self.details.get(&detail_key(timestamp))
    }

    #[must_use]
    pub fn detail_count(&self) -> usize {
        self.details.len()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse dataset: {e}")))
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize dataset: {e}")))
    }

    /// Same name and series identities, ignoring values and selection flags.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.name == other.name
            && self.series.len() == other.series.len()
            && self
                .series
                .iter()
                .zip(&other.series)
                .all(|(left, right)| left.id == right.id && left.color == right.color)
    }
}

fn detail_key(timestamp: f64) -> i64 {
    timestamp.round() as i64
}

fn validate_series(series: &[Series]) -> ChartResult<()> {
    let Some(first) = series.first() else {
        return Err(ChartError::InvalidData(
            "dataset must contain at least one series".to_owned(),
        ));
    };
    if first.points.is_empty() {
        return Err(ChartError::InvalidData(format!(
            "series `{}` must contain at least one point",
            first.id.as_str()
        )));
    }
    for window in first.points.windows(2) {
        if !(window[1].x > window[0].x) {
            return Err(ChartError::InvalidData(format!(
                "timestamps of series `{}` must be strictly ascending",
                first.id.as_str()
            )));
        }
    }
    if first.points.iter().any(|point| !point.x.is_finite()) {
        return Err(ChartError::InvalidData(
            "timestamps must be finite".to_owned(),
        ));
    }

    for (index, candidate) in series.iter().enumerate().skip(1) {
        if candidate.kind != first.kind {
            return Err(ChartError::InvalidData(format!(
                "series `{}` kind {:?} differs from dataset kind {:?}",
                candidate.id.as_str(),
                candidate.kind,
                first.kind
            )));
        }
        if candidate.points.len() != first.points.len() {
            return Err(ChartError::InvalidData(format!(
                "series `{}` has {} points, expected {}",
                candidate.id.as_str(),
                candidate.points.len(),
                first.points.len()
            )));
        }
        if candidate
            .points
            .iter()
            .zip(&first.points)
            .any(|(left, right)| left.x != right.x)
        {
            return Err(ChartError::InvalidData(format!(
                "series `{}` is not aligned with the first series",
                candidate.id.as_str()
            )));
        }
        if series[..index].iter().any(|other| other.id == candidate.id) {
            return Err(ChartError::InvalidData(format!(
                "duplicate series id `{}`",
                candidate.id.as_str()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ChartKind, Dataset, Series, SeriesId};
    use crate::core::DataPoint;
    use crate::render::Color;

    fn series(id: &str, kind: ChartKind, xs: &[f64]) -> Series {
        Series::new(
            id,
            id,
            Color::rgb(0.0, 0.0, 0.0),
            kind,
            xs.iter().map(|&x| DataPoint::new(x, 1)).collect(),
        )
    }

    #[test]
    fn rejects_empty_misaligned_and_mixed_datasets() {
        assert!(Dataset::new("empty", Vec::new()).is_err());
        assert!(Dataset::new("no points", vec![series("a", ChartKind::Line, &[])]).is_err());
        assert!(
            Dataset::new(
                "descending",
                vec![series("a", ChartKind::Line, &[2.0, 1.0])]
            )
            .is_err()
        );
        assert!(
            Dataset::new(
                "misaligned",
                vec![
                    series("a", ChartKind::Line, &[1.0, 2.0]),
                    series("b", ChartKind::Line, &[1.0, 3.0]),
                ]
            )
            .is_err()
        );
        assert!(
            Dataset::new(
                "mixed",
                vec![
                    series("a", ChartKind::Line, &[1.0, 2.0]),
                    series("b", ChartKind::Bar, &[1.0, 2.0]),
                ]
            )
            .is_err()
        );
        assert!(
            Dataset::new(
                "duplicate",
                vec![
                    series("a", ChartKind::Line, &[1.0, 2.0]),
                    series("a", ChartKind::Line, &[1.0, 2.0]),
                ]
            )
            .is_err()
        );
    }

    #[test]
    fn selection_toggle_reports_changes() {
        let mut dataset = Dataset::new(
            "lines",
            vec![
                series("a", ChartKind::Line, &[1.0, 2.0]),
                series("b", ChartKind::Line, &[1.0, 2.0]),
            ],
        )
        .expect("valid dataset");

        let id = SeriesId::new("b");
        assert!(dataset.set_series_selected(&id, false));
        assert!(!dataset.set_series_selected(&id, false));
        assert_eq!(dataset.visible_indices(), vec![0]);
        assert!(!dataset.set_series_selected(&SeriesId::new("missing"), false));
    }

    #[test]
    fn details_are_addressed_by_rounded_timestamp() {
        let detail = Dataset::new("day", vec![series("a", ChartKind::Line, &[0.0, 60.0])])
            .expect("detail");
        let dataset = Dataset::new("root", vec![series("a", ChartKind::Line, &[0.0, 86_400.0])])
            .expect("root")
            .with_detail(86_400.0, detail);

        assert!(dataset.detail_at(86_400.2).is_some());
        assert!(dataset.detail_at(0.0).is_none());
        assert_eq!(dataset.point_spacing(), 86_400.0);
    }

    #[test]
    fn json_round_trip_revalidates() {
        let dataset = Dataset::new(
            "lines",
            vec![
                series("a", ChartKind::Area, &[1.0, 2.0]),
                series("b", ChartKind::Area, &[1.0, 2.0]).with_selected(false),
            ],
        )
        .expect("valid dataset")
        .with_stacked(true);

        let json = dataset.to_json().expect("serialize");
        assert_eq!(Dataset::from_json_str(&json).expect("parse"), dataset);

        let empty = r#"{ "name": "empty", "series": [] }"#;
        assert!(Dataset::from_json_str(empty).is_err());
    }
}

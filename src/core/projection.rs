use smallvec::SmallVec;

use crate::core::dataset::Dataset;

/// Per-column values, one entry per visible series.
pub type ColumnValues<T> = SmallVec<[T; 8]>;

#[derive(Debug, Clone, PartialEq)]
pub struct StackedColumn {
    pub x: f64,
    pub values: ColumnValues<i64>,
}

impl StackedColumn {
    #[must_use]
    pub fn sum(&self) -> i64 {
        self.values.iter().copied().fold(0_i64, i64::saturating_add)
    }
}

/// Raw (unrounded) percent shares of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentColumn {
    pub x: f64,
    pub shares: ColumnValues<f64>,
}

/// Selection-dependent projections of a dataset.
///
/// Rebuilt whenever the dataset or any selection flag changes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreparedDataset {
    visible: Vec<usize>,
    stacked: Vec<StackedColumn>,
    percent: Vec<PercentColumn>,
}

impl PreparedDataset {
    #[must_use]
    pub fn new(dataset: &Dataset) -> Self {
        let visible = dataset.visible_indices();
        let mut prepared = Self {
            visible,
            stacked: Vec::new(),
            percent: Vec::new(),
        };
        if !dataset.stacked() || prepared.visible.is_empty() {
            return prepared;
        }

        let series = dataset.series();
        for index in 0..dataset.len() {
            let x = dataset.timestamp(index);
            let values: ColumnValues<i64> = prepared
                .visible
                .iter()
                .map(|&series_index| series[series_index].points[index].y)
                .collect();
            if dataset.percentage() {
                prepared.percent.push(PercentColumn {
                    x,
                    shares: percent_shares(&values),
                });
            } else {
                prepared.stacked.push(StackedColumn { x, values });
            }
        }
        prepared
    }

    /// Indices of selected series in dataset order.
    #[must_use]
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// Stacked columns; empty unless the dataset is stacked without percentage.
    #[must_use]
    pub fn stacked_values(&self) -> &[StackedColumn] {
        &self.stacked
    }

    /// Raw percent columns; empty unless the dataset is percent-stacked.
    #[must_use]
    pub fn stacked_percent_values(&self) -> &[PercentColumn] {
        &self.percent
    }

    /// Values of the visible series at one point index.
    #[must_use]
    pub fn column(&self, dataset: &Dataset, index: usize) -> ColumnValues<i64> {
        let series = dataset.series();
        self.visible
            .iter()
            .map(|&series_index| series[series_index].points[index].y)
            .collect()
    }

    /// Rounded percents of the visible series at one point index, when the
    /// dataset is a percentage chart.
    #[must_use]
    pub fn percents_at(&self, dataset: &Dataset, index: usize) -> Option<ColumnValues<i64>> {
        if !dataset.percentage() || self.visible.is_empty() {
            return None;
        }
        Some(apportion_percentages(&self.column(dataset, index)))
    }
}

fn percent_shares(values: &[i64]) -> ColumnValues<f64> {
    // Summed as floats: the total of huge columns does not fit in i64.
    let total: f64 = values.iter().map(|value| (*value).max(0) as f64).sum();
    if total == 0.0 {
        let even = 100.0 / values.len() as f64;
        return values.iter().map(|_| even).collect();
    }
    let multiplier = 100.0 / total;
    values
        .iter()
        .map(|value| (*value).max(0) as f64 * multiplier)
        .collect()
}

/// Largest-remainder rounding of the values' shares to integer percents.
///
/// Every share is floored, then the missing points go to the largest
/// fractional remainders (ties by position). Negative inputs count as zero and
/// an all-zero column is split evenly. The result sums to 100 for any
/// non-empty input.
#[must_use]
pub fn apportion_percentages(values: &[i64]) -> ColumnValues<i64> {
    if values.is_empty() {
        return ColumnValues::new();
    }
    let shares = percent_shares(values);
    let mut percents: ColumnValues<i64> = shares.iter().map(|share| share.floor() as i64).collect();
    let assigned: i64 = percents.iter().sum();
    let leftover = usize::try_from(100 - assigned).unwrap_or(0);

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&left, &right| {
        let left_remainder = shares[left] - shares[left].floor();
        let right_remainder = shares[right] - shares[right].floor();
        right_remainder
            .total_cmp(&left_remainder)
            .then(left.cmp(&right))
    });
    for index in order.into_iter().cycle().take(leftover) {
        percents[index] += 1;
    }
    percents
}

#[cfg(test)]
mod tests {
    use super::{PreparedDataset, apportion_percentages};
    use crate::core::{ChartKind, DataPoint, Dataset, Series, SeriesId};
    use crate::render::Color;

    fn stacked_dataset(percentage: bool) -> Dataset {
        let series = [("a", [40, 10]), ("b", [35, 20]), ("c", [26, 30])]
            .into_iter()
            .map(|(id, ys)| {
                Series::new(
                    id,
                    id,
                    Color::rgb(0.1, 0.2, 0.3),
                    ChartKind::Area,
                    ys.iter()
                        .enumerate()
                        .map(|(i, &y)| DataPoint::new(i as f64 * 86_400.0, y))
                        .collect(),
                )
            })
            .collect();
        Dataset::new("stacked", series)
            .expect("valid dataset")
            .with_stacked(true)
            .with_percentage(percentage)
    }

    #[test]
    fn largest_remainder_gains_points_first() {
        assert_eq!(apportion_percentages(&[40, 35, 26]).as_slice(), &[39, 35, 26]);
        assert_eq!(apportion_percentages(&[1, 1, 1]).as_slice(), &[34, 33, 33]);
        assert_eq!(apportion_percentages(&[0, 0]).as_slice(), &[50, 50]);
        assert_eq!(apportion_percentages(&[7]).as_slice(), &[100]);
        assert!(apportion_percentages(&[]).is_empty());
    }

    #[test]
    fn huge_columns_do_not_overflow() {
        let half = i64::MAX / 2;
        let percents = apportion_percentages(&[half, half, half]);
        assert_eq!(percents.as_slice(), &[34, 33, 33]);

        let column = super::StackedColumn {
            x: 0.0,
            values: [half, half, half].into_iter().collect(),
        };
        assert_eq!(column.sum(), i64::MAX);
    }

    #[test]
    fn percent_projection_holds_raw_shares() {
        let dataset = stacked_dataset(true);
        let prepared = PreparedDataset::new(&dataset);
        assert!(prepared.stacked_values().is_empty());

        let first = &prepared.stacked_percent_values()[0];
        assert!((first.shares[0] - 39.603_960_396).abs() <= 1e-6);
        assert!((first.shares.iter().sum::<f64>() - 100.0).abs() <= 1e-9);
        assert_eq!(
            prepared.percents_at(&dataset, 0).expect("percent").as_slice(),
            &[39, 35, 26]
        );
    }

    #[test]
    fn selection_changes_projection_width() {
        let mut dataset = stacked_dataset(false);
        dataset.set_series_selected(&SeriesId::new("b"), false);
        let prepared = PreparedDataset::new(&dataset);

        assert_eq!(prepared.visible(), &[0, 2]);
        assert_eq!(prepared.stacked_values()[1].values.as_slice(), &[10, 30]);
        assert_eq!(prepared.stacked_values()[1].sum(), 40);
        assert!(prepared.percents_at(&dataset, 0).is_none());
    }
}
